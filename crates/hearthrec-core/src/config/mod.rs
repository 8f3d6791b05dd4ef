//! Configuration.
//!
//! This module contains:
//! - `Config` - user configuration loaded from a TOML file
//! - Polling, upload, spool and queue constants

mod settings;

pub use settings::*;

/// Log file polling configuration.
pub mod polling {
    /// Delay (in ms) between two reads of the game log.
    pub const POLL_INTERVAL_MS: u64 = 1000;
}

/// Upload configuration.
pub mod upload {
    /// Global timeout (in seconds) for a single upload request.
    ///
    /// A timeout is treated as a connectivity failure, so the game is spooled.
    pub const TIMEOUT_SECS: u64 = 30;

    /// Protocol version sent with every upload request.
    pub const CLIENT_VERSION: i32 = 5;
}

/// Spool configuration.
pub mod spool {
    /// Extension of spooled game files.
    pub const EXTENSION: &str = "chl";

    /// File name prefix of spooled game files.
    pub const PREFIX: &str = "game";
}

/// Delivery worker configuration.
pub mod queue {
    /// Number of finished games that may wait for the delivery worker.
    pub const CAPACITY: usize = 16;
}
