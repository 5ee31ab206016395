use anyhow::Context;
use blast_gate::gate::{BlockFace, BlockPos};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Playtime-gated TNT placement
///
/// Administers the gate and runs placements against a local player ledger
/// that stands in for the server's playtime and permission services.
#[derive(Parser, Debug)]
#[command(name = "blast-gate")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the local player ledger (YAML)
    #[arg(short, long, global = true)]
    pub ledger: Option<PathBuf>,

    /// Issue admin commands as this player instead of the console
    #[arg(long = "as", value_name = "PLAYER", global = true)]
    pub sender: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the default config and an example ledger
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },
    /// Set the required playtime in minutes
    Settime {
        /// Minutes of playtime required before placing TNT
        #[arg(allow_hyphen_values = true)]
        minutes: String,
    },
    /// Report a player's playtime against the requirement
    Check {
        /// Player name
        player: String,
    },
    /// Attempt a block placement as a player
    Place {
        /// Player name
        #[arg(long)]
        player: String,

        /// Item id held by the player
        #[arg(long, default_value_t = 46)]
        item: u16,

        /// Number of items in the held stack
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..))]
        amount: u8,

        /// Target block as X,Y,Z
        #[arg(long, value_parser = parse_block_pos, allow_hyphen_values = true)]
        at: BlockPos,

        /// Clicked face index: 0 down, 1 up, 2 north, 3 south, 4 west, 5 east
        #[arg(long, default_value = "1", value_parser = parse_block_face)]
        face: BlockFace,
    },
    /// Show the requirement and every ledger player's eligibility
    Status,
}

fn parse_block_pos(value: &str) -> anyhow::Result<BlockPos> {
    let coords = value
        .split(',')
        .map(|part| part.trim().parse::<i32>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Invalid coordinate in '{}'", value))?;

    match coords.as_slice() {
        [x, y, z] => Ok(BlockPos::new(*x, *y, *z)),
        _ => anyhow::bail!("Expected X,Y,Z, got '{}'", value),
    }
}

fn parse_block_face(value: &str) -> anyhow::Result<BlockFace> {
    let index = value
        .trim()
        .parse::<u8>()
        .with_context(|| format!("Invalid face index '{}'", value))?;

    BlockFace::from_index(index)
        .with_context(|| format!("Face index must be 0-5, got {}", index))
}
