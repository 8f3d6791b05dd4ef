//! Line sources feeding the recorder.

mod tailer;

pub use tailer::*;

use crate::error::Result;

/// Supplier of ordered log lines.
///
/// Lines are returned in the order they were written. A source may deliver a
/// prefix again (e.g. after the game truncates its log on restart); consumers
/// must tolerate that.
pub trait LineSource {
    /// Return every complete line that became available since the last call.
    fn poll_lines(&mut self) -> Result<Vec<String>>;
}
