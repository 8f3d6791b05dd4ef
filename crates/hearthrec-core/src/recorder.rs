//! Front half of the pipeline: raw log lines in, finished games out.

use tracing::{error, trace};

use crate::game::{Clock, GameRecord, GameSegmenter, SystemClock};
use crate::logger::LineFilter;

pub struct GameRecorder<C: Clock = SystemClock> {
    filter: LineFilter,
    segmenter: GameSegmenter<C>,
}

impl GameRecorder<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for GameRecorder<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> GameRecorder<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            filter: LineFilter::new(),
            segmenter: GameSegmenter::with_clock(clock),
        }
    }

    /// Feed one raw log line. Irrelevant lines are dropped here.
    pub fn handle_line(&mut self, line: &str) -> Option<GameRecord> {
        if !self.filter.is_relevant(line) {
            return None;
        }
        trace!("{}", line);

        match self.segmenter.push_line(line) {
            Ok(record) => record,
            Err(e) => {
                error!("Failed to encode finished game: {}", e);
                None
            }
        }
    }

    pub fn segmenter(&self) -> &GameSegmenter<C> {
        &self.segmenter
    }

    /// Forget any game in progress.
    pub fn reset(&mut self) {
        self.segmenter.reset();
    }
}
