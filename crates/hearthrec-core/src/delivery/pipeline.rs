use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::delivery::DedupGuard;
use crate::game::GameRecord;
use crate::network::{GameUploader, UploadOutcome};
use crate::storage::{SaveOutcome, Spooler};

/// What happened to a record handed to [`Delivery::deliver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    /// The payload was already handled in this run.
    Duplicate,
    /// The collector was unreachable; the game waits in the spool.
    Spooled,
    /// The collector refused the game. It is not retried.
    Rejected,
    /// The collector was unreachable and the spool could not be written.
    Lost,
}

/// Counts from one pass over the spool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub delivered: usize,
    /// Refused by the collector; left in the spool.
    pub rejected: usize,
    /// Payload already handled in this run; left in the spool, not uploaded.
    pub skipped: usize,
    /// Not attempted because the collector became unreachable.
    pub kept: usize,
}

impl ReplaySummary {
    pub fn total(&self) -> usize {
        self.delivered + self.rejected + self.skipped + self.kept
    }
}

impl fmt::Display for ReplaySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} delivered, {} rejected, {} skipped, {} kept",
            self.delivered, self.rejected, self.skipped, self.kept
        )
    }
}

/// Back half of the pipeline: dedup, upload, and spool on connectivity loss.
pub struct Delivery<U: GameUploader> {
    uploader: U,
    spooler: Spooler,
    dedup: Arc<DedupGuard>,
}

impl<U: GameUploader> Delivery<U> {
    pub fn new(uploader: U, spooler: Spooler, dedup: Arc<DedupGuard>) -> Self {
        Self {
            uploader,
            spooler,
            dedup,
        }
    }

    pub fn spooler(&self) -> &Spooler {
        &self.spooler
    }

    pub fn dedup(&self) -> &Arc<DedupGuard> {
        &self.dedup
    }

    pub fn deliver(&self, record: &GameRecord) -> DeliveryOutcome {
        if !self.dedup.should_upload(record) {
            return DeliveryOutcome::Duplicate;
        }

        match self.uploader.upload(record) {
            UploadOutcome::Delivered { .. } => DeliveryOutcome::Delivered,
            UploadOutcome::RejectedByServer(_) => DeliveryOutcome::Rejected,
            UploadOutcome::TransientFailure(_) => {
                // Stays marked: the spooled copy is replayed by the next run.
                match self.spooler.save(record) {
                    Ok(SaveOutcome::Saved(_)) | Ok(SaveOutcome::AlreadySpooled(_)) => {
                        DeliveryOutcome::Spooled
                    }
                    Err(e) => {
                        warn!(
                            "Failed to spool game {}..{}: {}",
                            record.start_time, record.end_time, e
                        );
                        DeliveryOutcome::Lost
                    }
                }
            }
        }
    }

    /// Upload every spooled game, oldest first.
    ///
    /// Delivered entries are deleted. Rejected entries and entries whose
    /// payload was already handled in this run stay in the spool. The pass
    /// stops at the first connectivity failure.
    pub fn replay_spool(&self) -> ReplaySummary {
        let pending = self.spooler.list_pending();
        let mut summary = ReplaySummary::default();
        if pending.is_empty() {
            return summary;
        }
        info!("Uploading {} spooled game(s)", pending.len());

        let mut remaining = pending.len();
        for (record, handle) in pending {
            if !self.dedup.should_upload(&record) {
                debug!("Skipping {}, already handled in this run", handle.file_name());
                summary.skipped += 1;
                remaining -= 1;
                continue;
            }

            match self.uploader.upload(&record) {
                UploadOutcome::Delivered { .. } => {
                    self.spooler.delete(&handle);
                    summary.delivered += 1;
                    remaining -= 1;
                }
                UploadOutcome::RejectedByServer(_) => {
                    summary.rejected += 1;
                    remaining -= 1;
                }
                UploadOutcome::TransientFailure(_) => {
                    info!("Collector unreachable, leaving {} game(s) untried", remaining);
                    summary.kept += remaining;
                    break;
                }
            }
        }

        info!("Spool replay finished: {}", summary);
        summary
    }
}
