use sha2::{Digest, Sha256};

use crate::codec;
use crate::error::Result;
use crate::game::GameMode;

/// Hash of a compressed payload, used as the duplicate detection key.
pub type Fingerprint = [u8; 32];

/// A finished game, ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    /// zlib-compressed game text.
    pub payload: Vec<u8>,
    /// Epoch milliseconds at which the game was created.
    pub start_time: i64,
    /// Epoch milliseconds at which the game reached its final state.
    pub end_time: i64,
    pub mode: GameMode,
    /// Only set when a ranked game reported the player's rank.
    pub rank: Option<i32>,
}

impl GameRecord {
    /// Compress `text` into a new record.
    pub fn from_text(
        text: &str,
        start_time: i64,
        end_time: i64,
        mode: GameMode,
        rank: Option<i32>,
    ) -> Result<Self> {
        Ok(Self {
            payload: codec::compress(text)?,
            start_time,
            end_time,
            mode,
            rank,
        })
    }

    /// Rebuild a record whose mode is not known, e.g. from the spool.
    pub fn from_payload(payload: Vec<u8>, start_time: i64, end_time: i64) -> Self {
        Self {
            payload,
            start_time,
            end_time,
            mode: GameMode::Unknown,
            rank: None,
        }
    }

    pub fn fingerprint(&self) -> Fingerprint {
        Sha256::digest(&self.payload).into()
    }

    /// Decompressed game text.
    pub fn text(&self) -> Result<String> {
        codec::decompress(&self.payload)
    }

    pub fn duration_millis(&self) -> i64 {
        self.end_time.saturating_sub(self.start_time)
    }
}
