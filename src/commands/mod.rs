pub mod admin;
pub mod local;
pub mod utils;

pub use admin::run_admin_command;
pub use local::{run_init, run_place, run_status};
