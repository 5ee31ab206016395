use std::sync::Arc;
use tracing::{error, info, warn};

use crate::error::GateError;
use crate::gate::collaborators::InteractionHost;
use crate::gate::interceptor::{ActionInterceptor, InterceptingHandler};
use crate::gate::types::PlayerId;

/// Result of binding the interceptor to one player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    Hooked,
    AlreadyHooked,
}

/// Summary of a bulk bind over every online player
#[derive(Debug, Default)]
pub struct BindReport {
    pub hooked: Vec<PlayerId>,
    pub already_hooked: Vec<PlayerId>,
    pub failed: Vec<PlayerId>,
}

/// Installs the interceptor on each player's interaction handler
pub struct HookBinder {
    interceptor: Arc<ActionInterceptor>,
}

impl HookBinder {
    pub fn new(interceptor: Arc<ActionInterceptor>) -> Self {
        Self { interceptor }
    }

    /// Wrap the player's current handler, unless it is already wrapped
    pub fn bind(
        &self,
        host: &dyn InteractionHost,
        player: &PlayerId,
    ) -> Result<BindOutcome, GateError> {
        let current = host.handler(player)?;
        if current.is_intercepted() {
            return Ok(BindOutcome::AlreadyHooked);
        }

        let wrapped = InterceptingHandler::new(current, self.interceptor.clone());
        host.replace_handler(player, Arc::new(wrapped))?;

        info!("Hooked interaction handler for player: {}", player);
        Ok(BindOutcome::Hooked)
    }

    /// Bind every currently connected player
    ///
    /// A failure leaves only that player unhooked.
    pub fn bind_all(&self, host: &dyn InteractionHost) -> BindReport {
        let mut report = BindReport::default();

        for player in host.online_players() {
            match self.try_bind(host, &player) {
                Some(BindOutcome::Hooked) => report.hooked.push(player),
                Some(BindOutcome::AlreadyHooked) => report.already_hooked.push(player),
                None => report.failed.push(player),
            }
        }

        report
    }

    /// Bind a newly connected player
    pub fn on_connect(&self, host: &dyn InteractionHost, player: &PlayerId) -> Option<BindOutcome> {
        self.try_bind(host, player)
    }

    fn try_bind(&self, host: &dyn InteractionHost, player: &PlayerId) -> Option<BindOutcome> {
        match self.bind(host, player) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                error!("{}", e);
                warn!(
                    "Player {} is not gated until reconnect; TNT placement is unchecked for them",
                    player
                );
                None
            }
        }
    }
}
