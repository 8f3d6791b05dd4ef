use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::config::{polling, queue, upload};
use crate::error::Result;

/// Runtime configuration.
///
/// Every field has a default, so an empty file (or no file at all) is valid.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Game log file to tail.
    pub log_file: PathBuf,
    /// Game `log.config` to rewrite before tailing.
    pub log_config_file: Option<PathBuf>,
    /// Directory holding games that could not be uploaded.
    pub spool_dir: PathBuf,
    /// Collector endpoint. Required by commands that upload.
    pub upload_url: Option<String>,
    pub client_version: i32,
    pub upload_timeout_secs: u64,
    pub poll_interval_ms: u64,
    /// Start tailing at the end of the log instead of the beginning.
    pub tail_from_end: bool,
    /// Maximum number of payload fingerprints kept for dedup (unbounded if unset).
    pub dedup_capacity: Option<usize>,
    pub queue_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from("output_log.txt"),
            log_config_file: None,
            spool_dir: std::env::temp_dir(),
            upload_url: None,
            client_version: upload::CLIENT_VERSION,
            upload_timeout_secs: upload::TIMEOUT_SECS,
            poll_interval_ms: polling::POLL_INTERVAL_MS,
            tail_from_end: true,
            dedup_capacity: None,
            queue_capacity: queue::CAPACITY,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
