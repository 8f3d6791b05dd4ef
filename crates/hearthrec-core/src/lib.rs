pub mod codec;
pub mod config;
pub mod delivery;
pub mod error;
pub mod game;
pub mod logger;
pub mod network;
pub mod recorder;
pub mod source;
pub mod storage;

pub use config::Config;
pub use delivery::{DedupGuard, Delivery, DeliveryOutcome, DeliveryWorker, ReplaySummary};
pub use error::{Error, Result};
pub use game::{
    Clock, GameMode, GameRecord, GameSegmenter, ManualClock, ModeClassifier, SegmentState,
    SystemClock,
};
pub use logger::{GameLogger, LineFilter, configure_loggers};
pub use network::{GameUploader, HttpUploader, UploadOutcome};
pub use recorder::GameRecorder;
pub use source::{LineSource, LogTailer};
pub use storage::{SpoolHandle, Spooler};
