//! CLI command implementations.
//!
//! This module contains the implementation of each CLI command.

pub mod configure;
pub mod inspect;
pub mod list;
pub mod replay;
pub mod watch;

use std::sync::Arc;

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use hearthrec_core::{Config, DedupGuard, Delivery, HttpUploader, Spooler};

/// Build the upload pipeline from the resolved configuration.
fn build_delivery(config: &Config) -> Result<Delivery<HttpUploader>> {
    let Some(url) = config.upload_url.as_deref() else {
        bail!(
            "No upload URL configured. Set upload_url in the config file, pass --upload-url, or set HEARTHREC_UPLOAD_URL."
        );
    };

    let uploader = HttpUploader::new(url, config.client_version, config.upload_timeout());
    let dedup = Arc::new(DedupGuard::with_limit(config.dedup_capacity));
    Ok(Delivery::new(uploader, Spooler::new(&config.spool_dir), dedup))
}

/// Render epoch milliseconds for humans.
fn format_millis(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| millis.to_string())
}
