use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use tracing::debug;

use crate::game::{Fingerprint, GameRecord};

#[derive(Default)]
struct Seen {
    fingerprints: HashSet<Fingerprint>,
    order: VecDeque<Fingerprint>,
}

/// Remembers which payloads were already handed to the uploader in this run.
///
/// Shared between live delivery and spool replay. Without a limit the set
/// only grows; with one, the oldest fingerprints are forgotten first.
#[derive(Default)]
pub struct DedupGuard {
    seen: Mutex<Seen>,
    limit: Option<usize>,
}

impl DedupGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `limit` fingerprints. `None` or zero means unbounded.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            seen: Mutex::new(Seen::default()),
            limit: limit.filter(|&l| l > 0),
        }
    }

    /// Record the payload and report whether it is new.
    pub fn should_upload(&self, record: &GameRecord) -> bool {
        let fingerprint = record.fingerprint();
        let mut seen = self.seen.lock().unwrap_or_else(|e| e.into_inner());

        if !seen.fingerprints.insert(fingerprint) {
            debug!(
                "Game {}..{} was already processed",
                record.start_time, record.end_time
            );
            return false;
        }

        if let Some(limit) = self.limit {
            seen.order.push_back(fingerprint);
            while seen.order.len() > limit {
                if let Some(oldest) = seen.order.pop_front() {
                    seen.fingerprints.remove(&oldest);
                }
            }
        }
        true
    }

    pub fn len(&self) -> usize {
        self.seen
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .fingerprints
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
