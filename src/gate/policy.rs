use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::GateError;
use crate::gate::collaborators::{
    BYPASS_CAPABILITY, PermissionSource, PlayerDirectory, PlaytimeSource,
};
use crate::gate::types::{Eligibility, PlayerId};

/// Process-wide required playtime, shared between the policy and the admin command
///
/// Writes are last-write-wins. An evaluation racing a write may see either value.
#[derive(Debug, Clone)]
pub struct SharedThreshold(Arc<AtomicU64>);

impl SharedThreshold {
    pub fn new(required: Duration) -> Self {
        Self(Arc::new(AtomicU64::new(to_millis(required))))
    }

    pub fn get(&self) -> Duration {
        Duration::from_millis(self.0.load(Ordering::Relaxed))
    }

    pub fn set(&self, required: Duration) {
        self.0.store(to_millis(required), Ordering::Relaxed);
    }
}

fn to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Decides whether a player has played long enough for the gated action
#[derive(Clone)]
pub struct EligibilityPolicy {
    threshold: SharedThreshold,
    playtime: Arc<dyn PlaytimeSource>,
    permissions: Arc<dyn PermissionSource>,
    directory: Arc<dyn PlayerDirectory>,
}

impl EligibilityPolicy {
    pub fn new(
        threshold: SharedThreshold,
        playtime: Arc<dyn PlaytimeSource>,
        permissions: Arc<dyn PermissionSource>,
        directory: Arc<dyn PlayerDirectory>,
    ) -> Self {
        Self {
            threshold,
            playtime,
            permissions,
            directory,
        }
    }

    /// Evaluate the gate for one actor
    ///
    /// Fails closed: an unresolvable actor or a failed playtime lookup is a
    /// denial with the full threshold remaining. A bypass grant allows without
    /// touching the playtime service.
    pub fn evaluate(&self, actor: &PlayerId) -> Eligibility {
        let threshold = self.threshold.get();

        if self.directory.presence(actor).is_none() {
            debug!("No player record for {}, denying", actor);
            return Eligibility::deny(threshold);
        }

        if self.permissions.has_capability(actor, BYPASS_CAPABILITY) {
            return Eligibility::allow();
        }

        match self.playtime.total_playtime(actor) {
            Ok(accumulated) => decide(accumulated, threshold),
            Err(e) => {
                warn!("Failed to check playtime for {}: {}", actor, e);
                Eligibility::deny(threshold)
            }
        }
    }

    /// Raw playtime lookup, for reporting
    pub fn playtime(&self, actor: &PlayerId) -> Result<Duration, GateError> {
        self.playtime.total_playtime(actor)
    }

    pub fn has_bypass(&self, actor: &PlayerId) -> bool {
        self.permissions.has_capability(actor, BYPASS_CAPABILITY)
    }

    pub fn threshold(&self) -> Duration {
        self.threshold.get()
    }
}

/// Compare accumulated playtime against the threshold
pub fn decide(accumulated: Duration, threshold: Duration) -> Eligibility {
    if accumulated >= threshold {
        Eligibility::allow()
    } else {
        Eligibility::deny(threshold.saturating_sub(accumulated))
    }
}
