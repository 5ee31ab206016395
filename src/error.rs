//! Error types for the gate
//!
//! Library operations return `GateError` so hosts can tell a missing
//! collaborator from a bad admin argument. File access in the binary and
//! the config layer uses `anyhow` with context instead.

use thiserror::Error;

use crate::gate::PlayerId;

/// Unified error type for gate operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    /// A config line carried a value that could not be parsed
    #[error("Invalid value for '{key}': '{value}'")]
    ConfigParse { key: String, value: String },

    /// The playtime or permission service is missing or unreachable
    #[error("Collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),

    /// The playtime service has no record of this player
    #[error("Unknown player: {0}")]
    UnknownPlayer(PlayerId),

    /// The interceptor could not be attached to a player's handler
    #[error("Failed to hook player {player}: {reason}")]
    Binding { player: PlayerId, reason: String },

    /// Non-numeric or out of range admin argument
    #[error("Invalid number: '{0}'")]
    InvalidAdminInput(String),
}

impl GateError {
    pub fn unavailable(what: impl Into<String>) -> Self {
        Self::CollaboratorUnavailable(what.into())
    }

    pub fn binding(player: &PlayerId, reason: impl Into<String>) -> Self {
        Self::Binding {
            player: player.clone(),
            reason: reason.into(),
        }
    }
}
