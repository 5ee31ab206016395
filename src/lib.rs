//! Playtime-gated TNT placement
//!
//! Hosts embed [`GateContext`]: it resolves the playtime and permission
//! services, loads the required playtime from a flat config file, and wraps
//! every connected player's interaction handler so TNT placement is checked
//! before it reaches the world.

pub mod admin;
pub mod config;
pub mod context;
pub mod error;
pub mod gate;
pub mod local;
pub mod storage;

pub use admin::{AdminCommand, CommandSender};
pub use config::GateConfig;
pub use context::{Collaborators, GateContext};
pub use error::GateError;
