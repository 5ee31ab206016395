// Ports to the services the gate consumes but does not own.
//
// The host server provides implementations; the CLI provides file-backed ones
// in `crate::local`.

use std::sync::Arc;
use std::time::Duration;

use crate::error::GateError;
use crate::gate::types::{BlockFace, BlockPos, ItemStack, PlayerId};

/// Capability that exempts a player from the playtime check
pub const BYPASS_CAPABILITY: &str = "blastgate.bypass";

/// Capability required to run the admin command
pub const ADMIN_CAPABILITY: &str = "blastgate.admin";

/// Whether a known player is currently connected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Online,
    Offline,
}

/// Read-only view of the playtime tracking service
#[cfg_attr(test, mockall::automock)]
pub trait PlaytimeSource: Send + Sync {
    /// Total credited playtime for any player, online or offline
    fn total_playtime(&self, player: &PlayerId) -> Result<Duration, GateError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait PermissionSource: Send + Sync {
    fn has_capability(&self, player: &PlayerId, capability: &str) -> bool;
}

/// Resolves identities to online or offline player records
#[cfg_attr(test, mockall::automock)]
pub trait PlayerDirectory: Send + Sync {
    fn presence(&self, player: &PlayerId) -> Option<Presence>;
}

/// Delivers chat messages to a player
#[cfg_attr(test, mockall::automock)]
pub trait Messenger: Send + Sync {
    fn send_message(&self, player: &PlayerId, message: &str);
}

/// Low-level handler for world interactions
///
/// Returning `false` means the interaction was not committed to the world.
#[cfg_attr(test, mockall::automock)]
pub trait ActionHandler: Send + Sync {
    fn interact(
        &self,
        actor: &PlayerId,
        item: Option<ItemStack>,
        target: BlockPos,
        face: BlockFace,
    ) -> bool;

    /// True when this handler already routes through the gate
    fn is_intercepted(&self) -> bool {
        false
    }
}

/// Per-player hook point exposed by the host
///
/// Stands in for swapping out a player's live interaction manager: the host
/// hands out the current handler and accepts a replacement.
#[cfg_attr(test, mockall::automock)]
pub trait InteractionHost: Send + Sync {
    fn online_players(&self) -> Vec<PlayerId>;

    fn handler(&self, player: &PlayerId) -> Result<Arc<dyn ActionHandler>, GateError>;

    fn replace_handler(
        &self,
        player: &PlayerId,
        handler: Arc<dyn ActionHandler>,
    ) -> Result<(), GateError>;
}
