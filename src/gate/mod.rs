/// Playtime gate for TNT placement
///
/// This module provides:
/// - The eligibility decision against a player's accumulated playtime
/// - The interceptor that vetoes gated placements before they hit the world
/// - Idempotent installation of that interceptor on each player
/// - The ports the host implements (playtime, permissions, chat, handlers)

pub mod binding;
pub mod collaborators;
pub mod interceptor;
pub mod policy;
pub mod types;

pub use binding::{BindOutcome, BindReport, HookBinder};
pub use collaborators::{
    ADMIN_CAPABILITY, ActionHandler, BYPASS_CAPABILITY, InteractionHost, Messenger,
    PermissionSource, PlayerDirectory, PlaytimeSource, Presence,
};
pub use interceptor::{ActionInterceptor, InterceptingHandler, MESSAGE_PREFIX};
pub use policy::{EligibilityPolicy, SharedThreshold};
pub use types::{
    BlockFace, BlockPos, Eligibility, GatedActionRequest, ItemStack, ItemType, PlayerId,
};
