use anyhow::{Context, Result};
use blast_gate::config::{GateConfig, save_config};
use blast_gate::gate::{BlockFace, BlockPos, ItemStack, PlayerId, types::whole_minutes};
use blast_gate::local::EXAMPLE_LEDGER;
use blast_gate::storage::atomic_write;

use super::utils::{Paths, open_gate};

/// Write the default config and the example ledger
pub fn run_init(paths: &Paths, force: bool) -> Result<()> {
    for path in [&paths.config, &paths.ledger] {
        if path.exists() && !force {
            anyhow::bail!(
                "File already exists: {}\nUse --force to overwrite",
                path.display()
            );
        }
    }

    save_config(&paths.config, &GateConfig::default())?;
    println!("✓ Created config file: {}", paths.config.display());

    atomic_write(&paths.ledger, EXAMPLE_LEDGER.as_bytes())
        .with_context(|| format!("Failed to write ledger file: {}", paths.ledger.display()))?;
    println!("✓ Created ledger file: {}", paths.ledger.display());

    println!("\nEdit the ledger to describe your players, then try:");
    println!("  blast-gate place --player Steve --at 0,64,0");

    Ok(())
}

/// Attempt one placement as a player
///
/// Offline players are connected first, which hooks them the way a join would.
pub fn run_place(
    paths: &Paths,
    player: String,
    stack: ItemStack,
    at: BlockPos,
    face: BlockFace,
) -> Result<()> {
    let (host, context) = open_gate(paths)?;
    let player = PlayerId::new(player);

    if !host.connect(&player)? {
        anyhow::bail!("Player '{}' is not in the ledger", player);
    }
    context.on_player_join(&*host, &player);

    let placed = host.interact(&player, Some(stack), at, face)?;

    for (_, message) in host.take_messages() {
        println!("  {}", message);
    }
    if placed {
        println!("✓ {} placed item {} at {}", player, stack.item, at);
    } else {
        println!(
            "✗ {} was blocked from placing item {} at {}",
            player, stack.item, at
        );
    }

    context.shutdown()
}

/// Show the requirement and each ledger player's eligibility
pub fn run_status(paths: &Paths) -> Result<()> {
    let (host, context) = open_gate(paths)?;
    let policy = context.policy();

    println!("\n=== Blast Gate Status ===\n");
    println!("Config:   {}", context.config_path().display());
    println!("Required: {} minutes", whole_minutes(context.required_playtime()));
    println!();

    for entry in &host.ledger().players {
        let eligibility = policy.evaluate(&entry.name);
        let state = if entry.online { "online" } else { "offline" };
        let verdict = if eligibility.allowed {
            "can use TNT".to_string()
        } else {
            format!("needs {} more minutes", eligibility.remaining_minutes())
        };

        println!(
            "  {} ({}): {} minutes played, {}",
            entry.name, state, entry.playtime_minutes, verdict
        );
    }

    context.shutdown()
}
