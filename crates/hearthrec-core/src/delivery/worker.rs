use std::sync::Arc;
use std::sync::mpsc::{self, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};

use tracing::{debug, error, info, warn};

use crate::delivery::{DedupGuard, Delivery, DeliveryOutcome};
use crate::error::Result;
use crate::game::GameRecord;
use crate::network::GameUploader;
use crate::storage::Spooler;

/// Runs [`Delivery`] on its own thread so the line consumer never waits on
/// the network.
///
/// The thread replays the spool once, then uploads queued records in order.
pub struct DeliveryWorker {
    sender: Option<SyncSender<GameRecord>>,
    handle: Option<JoinHandle<()>>,
    overflow: Spooler,
    dedup: Arc<DedupGuard>,
}

impl DeliveryWorker {
    pub fn spawn<U>(delivery: Delivery<U>, capacity: usize) -> Result<Self>
    where
        U: GameUploader + 'static,
    {
        let (sender, receiver) = mpsc::sync_channel::<GameRecord>(capacity.max(1));
        let overflow = delivery.spooler().clone();
        let dedup = Arc::clone(delivery.dedup());

        let handle = thread::Builder::new()
            .name("delivery".to_string())
            .spawn(move || {
                delivery.replay_spool();

                while let Ok(record) = receiver.recv() {
                    let outcome = delivery.deliver(&record);
                    debug!(
                        "Game {}..{} ({}): {:?}",
                        record.start_time, record.end_time, record.mode, outcome
                    );
                    if outcome == DeliveryOutcome::Lost {
                        error!(
                            "Game {}..{} could not be uploaded or spooled",
                            record.start_time, record.end_time
                        );
                    }
                }
                debug!("Delivery worker stopped");
            })?;

        Ok(Self {
            sender: Some(sender),
            handle: Some(handle),
            overflow,
            dedup,
        })
    }

    /// Queue a record for upload without blocking.
    ///
    /// Returns `false` when the queue was unavailable. The record then goes
    /// straight to the spool, unless its payload was already handled in this
    /// run.
    pub fn submit(&self, record: GameRecord) -> bool {
        let Some(sender) = &self.sender else {
            self.spool_overflow(&record);
            return false;
        };

        match sender.try_send(record) {
            Ok(()) => true,
            Err(TrySendError::Full(record)) => {
                warn!("Upload queue is full, spooling game for later");
                self.spool_overflow(&record);
                false
            }
            Err(TrySendError::Disconnected(record)) => {
                warn!("Delivery worker is gone, spooling game for later");
                self.spool_overflow(&record);
                false
            }
        }
    }

    fn spool_overflow(&self, record: &GameRecord) {
        if !self.dedup.should_upload(record) {
            debug!(
                "Game {}..{} was already handled, not spooling it",
                record.start_time, record.end_time
            );
            return;
        }
        if let Err(e) = self.overflow.save(record) {
            error!(
                "Failed to spool game {}..{}: {}",
                record.start_time, record.end_time, e
            );
        }
    }

    /// Close the queue and wait for queued records to be handled.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        drop(self.sender.take());
        if let Some(handle) = self.handle.take() {
            info!("Waiting for pending uploads to finish");
            if handle.join().is_err() {
                error!("Delivery worker panicked");
            }
        }
    }
}

impl Drop for DeliveryWorker {
    fn drop(&mut self) {
        self.stop();
    }
}
