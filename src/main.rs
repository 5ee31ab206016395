use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{Args, Commands};
use blast_gate::gate::{ItemStack, ItemType};
use commands::utils::{Paths, init_logging};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose);

    let paths = Paths::resolve(args.config, args.ledger)?;

    match args.command {
        Commands::Init { force } => commands::run_init(&paths, force),
        Commands::Settime { minutes } => {
            commands::run_admin_command(&paths, args.sender, &["settime", minutes.as_str()])
        }
        Commands::Check { player } => {
            commands::run_admin_command(&paths, args.sender, &["check", player.as_str()])
        }
        Commands::Place {
            player,
            item,
            amount,
            at,
            face,
        } => commands::run_place(
            &paths,
            player,
            ItemStack::new(ItemType(item), amount),
            at,
            face,
        ),
        Commands::Status => commands::run_status(&paths),
    }
}
