use std::fmt;
use thiserror::Error;
use tracing::{error, info};

use crate::config::MAX_REQUIRED_MINUTES;
use crate::context::GateContext;
use crate::error::GateError;
use crate::gate::types::whole_minutes;
use crate::gate::{ADMIN_CAPABILITY, MESSAGE_PREFIX, PermissionSource, PlayerId};

const USAGE: &str = "/blastgate <settime|check> [minutes|player]";
const SETTIME_USAGE: &str = "/blastgate settime <minutes>";
const CHECK_USAGE: &str = "/blastgate check <player>";

/// Who issued an admin command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSender {
    /// Server console; holds every capability
    Console,
    Player(PlayerId),
}

impl CommandSender {
    pub fn has_capability(&self, permissions: &dyn PermissionSource, capability: &str) -> bool {
        match self {
            Self::Console => true,
            Self::Player(player) => permissions.has_capability(player, capability),
        }
    }
}

impl fmt::Display for CommandSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Console => f.write_str("CONSOLE"),
            Self::Player(player) => write!(f, "{}", player),
        }
    }
}

/// Parsed admin subcommand
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    SetTime { minutes: u64 },
    Check { player: PlayerId },
}

/// Rejection shown to the sender; no state is changed
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("{} You don't have permission to use this command!", MESSAGE_PREFIX)]
    PermissionDenied,

    #[error("{} Usage: {}", MESSAGE_PREFIX, .0)]
    Usage(&'static str),

    #[error("{} Invalid number!", MESSAGE_PREFIX)]
    Invalid(#[from] GateError),
}

impl AdminCommand {
    /// Parse `settime <minutes>` or `check <player>`; the action is case-insensitive
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self, CommandError> {
        let Some(action) = args.first() else {
            return Err(CommandError::Usage(USAGE));
        };
        let argument = args.get(1).map(|arg| arg.as_ref());

        match action.as_ref().to_lowercase().as_str() {
            "settime" => {
                let value = argument.ok_or(CommandError::Usage(SETTIME_USAGE))?;
                let minutes = value
                    .parse::<u64>()
                    .ok()
                    .filter(|minutes| *minutes <= MAX_REQUIRED_MINUTES)
                    .ok_or_else(|| GateError::InvalidAdminInput(value.to_string()))?;
                Ok(Self::SetTime { minutes })
            }
            "check" => {
                let player = argument.ok_or(CommandError::Usage(CHECK_USAGE))?;
                Ok(Self::Check {
                    player: PlayerId::new(player),
                })
            }
            _ => Err(CommandError::Usage(USAGE)),
        }
    }
}

/// Run the admin command and return the lines to show the sender
pub fn execute<S: AsRef<str>>(
    context: &GateContext,
    sender: &CommandSender,
    args: &[S],
) -> Vec<String> {
    if !sender.has_capability(context.permissions(), ADMIN_CAPABILITY) {
        return vec![CommandError::PermissionDenied.to_string()];
    }

    match AdminCommand::parse(args) {
        Ok(AdminCommand::SetTime { minutes }) => set_time(context, sender, minutes),
        Ok(AdminCommand::Check { player }) => check(context, &player),
        Err(e) => vec![e.to_string()],
    }
}

fn set_time(context: &GateContext, sender: &CommandSender, minutes: u64) -> Vec<String> {
    let mut lines = vec![format!(
        "{} Required playtime set to {} minutes",
        MESSAGE_PREFIX, minutes
    )];

    if let Err(e) = context.set_required_minutes(minutes) {
        error!("Failed to save config after settime {}: {:#}", minutes, e);
        lines.push(format!(
            "{} Could not save the config file; the change is lost on restart",
            MESSAGE_PREFIX
        ));
    }

    info!("{} set required playtime to {} minutes", sender, minutes);
    lines
}

fn check(context: &GateContext, player: &PlayerId) -> Vec<String> {
    let policy = context.policy();
    let eligibility = policy.evaluate(player);

    let mut lines = vec![format!("{} Player: {}", MESSAGE_PREFIX, player)];

    match policy.playtime(player) {
        Ok(played) => lines.push(format!("  Playtime: {} minutes", whole_minutes(played))),
        Err(e) => lines.push(format!("  Playtime: unavailable ({})", e)),
    }
    lines.push(format!(
        "  Required: {} minutes",
        whole_minutes(policy.threshold())
    ));

    if policy.has_bypass(player) {
        lines.push("  Bypass: yes".to_string());
    }

    if eligibility.allowed {
        lines.push("  Status: Can use TNT".to_string());
    } else {
        lines.push(format!(
            "  Status: Cannot use TNT ({} more minutes)",
            eligibility.remaining_minutes()
        ));
    }

    lines
}
