//! CLI argument definitions for hearthrec.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hearthrec_core::Config;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "hearthrec")]
#[command(about = "Hearthstone game recorder", version)]
pub struct Args {
    /// Path to config file (default: <config dir>/hearthrec/config.toml)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Game log file to tail
    #[arg(long, value_name = "FILE", global = true, env = "HEARTHREC_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Directory for games that could not be uploaded
    #[arg(long, value_name = "DIR", global = true, env = "HEARTHREC_SPOOL_DIR")]
    pub spool_dir: Option<PathBuf>,

    /// Collector endpoint
    #[arg(long, value_name = "URL", global = true, env = "HEARTHREC_UPLOAD_URL")]
    pub upload_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Tail the game log and upload finished games (default)
    Watch {
        /// Rewrite this log.config before tailing
        #[arg(long, value_name = "FILE")]
        log_config: Option<PathBuf>,
        /// Read the log from the beginning instead of the end
        #[arg(long)]
        from_start: bool,
    },
    /// Upload spooled games once and exit
    Replay,
    /// Enable the game loggers in the client's log.config
    Configure {
        /// Path to log.config (default: log_config_file from the config)
        #[arg(long, value_name = "FILE")]
        log_config: Option<PathBuf>,
    },
    /// Print a spooled game
    Inspect {
        /// Spool file (game_<start>_<end>.chl)
        file: PathBuf,
    },
    /// List spooled games
    List,
}

impl Args {
    /// Resolve the configuration: file first, then command-line overrides.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match self.config_path() {
            Some(path) => {
                let config = Config::load(&path)
                    .with_context(|| format!("Failed to load config from {}", path.display()))?;
                info!("Loaded config from {}", path.display());
                config
            }
            None => {
                debug!("No config file, using defaults");
                Config::default()
            }
        };

        if let Some(log_file) = &self.log_file {
            config.log_file = log_file.clone();
        }
        if let Some(spool_dir) = &self.spool_dir {
            config.spool_dir = spool_dir.clone();
        }
        if let Some(upload_url) = &self.upload_url {
            config.upload_url = Some(upload_url.clone());
        }
        Ok(config)
    }

    fn config_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config {
            return Some(path.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join("hearthrec").join("config.toml"))
            .filter(|path| path.exists())
    }
}
