use anyhow::Result;
use blast_gate::admin::{self, CommandSender};
use blast_gate::gate::PlayerId;

use super::utils::{Paths, open_gate};

/// Run `settime` or `check` through the admin command, as the console or a player
pub fn run_admin_command(paths: &Paths, sender: Option<String>, args: &[&str]) -> Result<()> {
    let (_host, context) = open_gate(paths)?;

    let sender = match sender {
        Some(name) => CommandSender::Player(PlayerId::new(name)),
        None => CommandSender::Console,
    };

    for line in admin::execute(&context, &sender, args) {
        println!("{}", line);
    }

    context.shutdown()
}
