use anyhow::{Context, Result};
use blast_gate::config::get_config_path;
use blast_gate::local::{LocalHost, get_ledger_path, load_ledger};
use blast_gate::GateContext;
use std::path::PathBuf;
use std::sync::Arc;

/// Initialize logging on stderr, leaving stdout for command replies
///
/// `RUST_LOG` overrides the default, which only raises this crate's level.
pub fn init_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let directive = if verbose {
        "warn,blast_gate=debug"
    } else {
        "warn,blast_gate=info"
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(verbose)
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive)))
        .init();
}

/// Config and ledger locations, from flags or the platform defaults
pub struct Paths {
    pub config: PathBuf,
    pub ledger: PathBuf,
}

impl Paths {
    pub fn resolve(config: Option<PathBuf>, ledger: Option<PathBuf>) -> Result<Self> {
        let config = match config {
            Some(path) => path,
            None => get_config_path()?,
        };
        let ledger = match ledger {
            Some(path) => path,
            None => get_ledger_path()?,
        };
        Ok(Self { config, ledger })
    }
}

/// Load the ledger and start the gate over it
pub fn open_gate(paths: &Paths) -> Result<(Arc<LocalHost>, GateContext)> {
    let ledger = load_ledger(&paths.ledger)
        .context("Failed to load ledger. Run 'blast-gate init' first.")?;
    let host = Arc::new(LocalHost::new(ledger));

    let context = GateContext::start(host.collaborators(), &*host, &paths.config)
        .context("Failed to start the gate")?;

    Ok((host, context))
}
