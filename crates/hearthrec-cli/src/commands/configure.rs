//! Configure command implementation.

use std::path::Path;

use anyhow::{Context, Result, bail};
use hearthrec_core::{Config, GameLogger, configure_loggers};
use strum::IntoEnumIterator;

/// Enable the loggers the recorder needs in the client's log.config.
pub fn run(config: &Config, log_config: Option<&Path>) -> Result<()> {
    let Some(path) = log_config.or(config.log_config_file.as_deref()) else {
        bail!("No log.config given. Pass --log-config or set log_config_file in the config file.");
    };

    configure_loggers(path).with_context(|| format!("Failed to update {}", path.display()))?;

    let loggers: Vec<&str> = GameLogger::iter().map(|logger| logger.tag()).collect();
    println!("Updated {}: {}", path.display(), loggers.join(" "));
    println!("Restart the game for the change to take effect.");
    Ok(())
}
