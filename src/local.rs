// Local, file-backed host for running the gate from the command line.
//
// A YAML ledger lists players with their playtime, connection state and
// capabilities. `LocalHost` serves that ledger through every collaborator port
// and keeps an interaction handler per online player, the way a game server
// would.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info};

use crate::context::Collaborators;
use crate::error::GateError;
use crate::gate::types::minutes;
use crate::gate::{
    ActionHandler, BlockFace, BlockPos, InteractionHost, ItemStack, Messenger, PermissionSource,
    PlayerDirectory, PlayerId, PlaytimeSource, Presence,
};

/// Players known to the local host
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Ledger {
    #[serde(default)]
    pub players: Vec<LedgerPlayer>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LedgerPlayer {
    pub name: PlayerId,

    #[serde(default)]
    pub playtime_minutes: u64,

    #[serde(default)]
    pub online: bool,

    #[serde(default)]
    pub capabilities: Vec<String>,
}

impl Ledger {
    pub fn get(&self, player: &PlayerId) -> Option<&LedgerPlayer> {
        self.players.iter().find(|p| &p.name == player)
    }
}

/// Get the default ledger path, next to the config file
pub fn get_ledger_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "blast-gate")
        .context("Could not determine ledger file location")?;

    Ok(dirs.data_dir().join("ledger.yaml"))
}

/// Load ledger from YAML file
pub fn load_ledger(path: &Path) -> Result<Ledger> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read ledger file: {}", path.display()))?;

    let ledger: Ledger = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse YAML ledger file: {}", path.display()))?;

    validate_ledger(&ledger)?;

    Ok(ledger)
}

/// Validate ledger
pub fn validate_ledger(ledger: &Ledger) -> Result<()> {
    let mut names = HashSet::new();
    for player in &ledger.players {
        if player.name.as_str().is_empty() {
            anyhow::bail!("Player name cannot be empty");
        }
        if !names.insert(&player.name) {
            anyhow::bail!("Duplicate player in ledger: {}", player.name);
        }
    }

    Ok(())
}

/// Example ledger file content
pub const EXAMPLE_LEDGER: &str = include_str!("../example-ledger.yaml");

/// Default world handler: commits every interaction it receives
pub struct WorldPlacement;

impl ActionHandler for WorldPlacement {
    fn interact(
        &self,
        actor: &PlayerId,
        item: Option<ItemStack>,
        target: BlockPos,
        face: BlockFace,
    ) -> bool {
        match item {
            Some(stack) => info!(
                "{} placed {}x item {} at {} ({:?} face)",
                actor, stack.amount, stack.item, target, face
            ),
            None => debug!("{} interacted with {} empty-handed", actor, target),
        }
        true
    }
}

/// Host backed by a ledger
pub struct LocalHost {
    ledger: Ledger,
    handlers: Mutex<HashMap<PlayerId, Arc<dyn ActionHandler>>>,
    outbox: Mutex<Vec<(PlayerId, String)>>,
}

impl LocalHost {
    /// Build the host with a default handler for every online player
    pub fn new(ledger: Ledger) -> Self {
        let handlers = ledger
            .players
            .iter()
            .filter(|p| p.online)
            .map(|p| {
                let handler: Arc<dyn ActionHandler> = Arc::new(WorldPlacement);
                (p.name.clone(), handler)
            })
            .collect();

        Self {
            ledger,
            handlers: Mutex::new(handlers),
            outbox: Mutex::new(Vec::new()),
        }
    }

    /// Every collaborator port, served by this host
    pub fn collaborators(self: &Arc<Self>) -> Collaborators {
        Collaborators {
            playtime: Some(self.clone()),
            permissions: Some(self.clone()),
            directory: Some(self.clone()),
            messenger: Some(self.clone()),
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Connect a player with a fresh default handler
    ///
    /// Returns false for players missing from the ledger.
    pub fn connect(&self, player: &PlayerId) -> Result<bool, GateError> {
        if self.ledger.get(player).is_none() {
            return Ok(false);
        }

        let mut handlers = self
            .handlers
            .lock()
            .map_err(|_| GateError::binding(player, "handler table poisoned"))?;
        handlers
            .entry(player.clone())
            .or_insert_with(|| Arc::new(WorldPlacement) as Arc<dyn ActionHandler>);
        Ok(true)
    }

    /// Send one interaction through the player's installed handler
    pub fn interact(
        &self,
        player: &PlayerId,
        item: Option<ItemStack>,
        target: BlockPos,
        face: BlockFace,
    ) -> Result<bool, GateError> {
        let handler = self.handler(player)?;
        Ok(handler.interact(player, item, target, face))
    }

    /// Drain the messages sent to players so far
    pub fn take_messages(&self) -> Vec<(PlayerId, String)> {
        match self.outbox.lock() {
            Ok(mut outbox) => std::mem::take(&mut *outbox),
            Err(_) => Vec::new(),
        }
    }
}

impl PlaytimeSource for LocalHost {
    fn total_playtime(&self, player: &PlayerId) -> Result<Duration, GateError> {
        self.ledger
            .get(player)
            .map(|p| minutes(p.playtime_minutes))
            .ok_or_else(|| GateError::UnknownPlayer(player.clone()))
    }
}

impl PermissionSource for LocalHost {
    fn has_capability(&self, player: &PlayerId, capability: &str) -> bool {
        self.ledger
            .get(player)
            .is_some_and(|p| p.capabilities.iter().any(|c| c == capability))
    }
}

impl PlayerDirectory for LocalHost {
    fn presence(&self, player: &PlayerId) -> Option<Presence> {
        let online = self
            .handlers
            .lock()
            .map(|handlers| handlers.contains_key(player))
            .unwrap_or(false);

        match self.ledger.get(player) {
            Some(_) if online => Some(Presence::Online),
            Some(_) => Some(Presence::Offline),
            None => None,
        }
    }
}

impl Messenger for LocalHost {
    fn send_message(&self, player: &PlayerId, message: &str) {
        debug!("-> {}: {}", player, message);
        if let Ok(mut outbox) = self.outbox.lock() {
            outbox.push((player.clone(), message.to_string()));
        }
    }
}

impl InteractionHost for LocalHost {
    fn online_players(&self) -> Vec<PlayerId> {
        let mut players: Vec<PlayerId> = self
            .handlers
            .lock()
            .map(|handlers| handlers.keys().cloned().collect())
            .unwrap_or_default();
        players.sort();
        players
    }

    fn handler(&self, player: &PlayerId) -> Result<Arc<dyn ActionHandler>, GateError> {
        let handlers = self
            .handlers
            .lock()
            .map_err(|_| GateError::binding(player, "handler table poisoned"))?;

        handlers
            .get(player)
            .cloned()
            .ok_or_else(|| GateError::binding(player, "player is not connected"))
    }

    fn replace_handler(
        &self,
        player: &PlayerId,
        handler: Arc<dyn ActionHandler>,
    ) -> Result<(), GateError> {
        let mut handlers = self
            .handlers
            .lock()
            .map_err(|_| GateError::binding(player, "handler table poisoned"))?;

        match handlers.get_mut(player) {
            Some(slot) => {
                *slot = handler;
                Ok(())
            }
            None => Err(GateError::binding(player, "player is not connected")),
        }
    }
}
