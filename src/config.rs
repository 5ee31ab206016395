use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::GateError;
use crate::gate::types::{minutes, whole_minutes};

/// Required playtime used when the file is missing or the value is malformed
pub const DEFAULT_REQUIRED_MINUTES: u64 = 60;

/// Largest threshold whose millisecond value fits the live threshold store
pub const MAX_REQUIRED_MINUTES: u64 = u64::MAX / 60_000;

const REQUIRED_PLAYTIME_KEY: &str = "required-playtime-minutes";

/// Gate configuration persisted as a flat `key: value` file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateConfig {
    pub required_minutes: u64,
}

impl GateConfig {
    pub fn new(required_minutes: u64) -> Self {
        Self { required_minutes }
    }

    pub fn from_duration(required: Duration) -> Self {
        Self::new(whole_minutes(required))
    }

    pub fn required_playtime(&self) -> Duration {
        minutes(self.required_minutes)
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self::new(DEFAULT_REQUIRED_MINUTES)
    }
}

/// Get the default config file path
pub fn get_config_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "blast-gate")
        .context("Could not determine config file location")?;

    Ok(dirs.data_dir().join("config.txt"))
}

/// Parse config file content
///
/// Never fails: blank lines and `#` comments are skipped, unknown keys are
/// ignored, and a malformed value falls back to the default with a warning.
pub fn parse_config(content: &str) -> GateConfig {
    let mut config = GateConfig::default();

    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            warn!("Ignoring config line {}: expected 'key: value'", index + 1);
            continue;
        };

        let (key, value) = (key.trim(), value.trim());
        if key != REQUIRED_PLAYTIME_KEY {
            debug!("Ignoring unknown config key '{}'", key);
            continue;
        }

        match parse_minutes(key, value) {
            Ok(required_minutes) => {
                info!("Loaded required playtime: {} minutes", required_minutes);
                config.required_minutes = required_minutes;
            }
            Err(e) => {
                warn!(
                    "{}, using default: {} minutes",
                    e, DEFAULT_REQUIRED_MINUTES
                );
                config.required_minutes = DEFAULT_REQUIRED_MINUTES;
            }
        }
    }

    config
}

fn parse_minutes(key: &str, value: &str) -> Result<u64, GateError> {
    value
        .parse::<u64>()
        .ok()
        .filter(|minutes| *minutes <= MAX_REQUIRED_MINUTES)
        .ok_or_else(|| GateError::ConfigParse {
            key: key.to_string(),
            value: value.to_string(),
        })
}

/// Render config file content, including the header comments
pub fn render_config(config: &GateConfig) -> String {
    format!(
        "# Blast Gate configuration\n\
         # Required playtime in minutes before players can place TNT\n\
         {}: {}\n",
        REQUIRED_PLAYTIME_KEY, config.required_minutes
    )
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<GateConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    Ok(parse_config(&content))
}

/// Load configuration, writing the default file first if none exists
pub fn load_or_create_config(path: &Path) -> Result<GateConfig> {
    if !path.exists() {
        info!("Creating default config file: {}", path.display());
        let config = GateConfig::default();
        save_config(path, &config)?;
        return Ok(config);
    }

    let config = load_config(path)?;
    info!("Config loaded from {}", path.display());
    Ok(config)
}

/// Save configuration to file
pub fn save_config(path: &Path, config: &GateConfig) -> Result<()> {
    crate::storage::atomic_write(path, render_config(config).as_bytes())
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    info!("Config saved to {}", path.display());
    Ok(())
}
