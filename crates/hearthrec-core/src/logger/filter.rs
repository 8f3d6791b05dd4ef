use strum::IntoEnumIterator;

use crate::logger::GameLogger;

/// Cheap gate in front of the recorder.
///
/// A line is relevant when it is non-empty and carries the tag of a logger
/// together with one of that logger's marker phrases.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFilter;

impl LineFilter {
    pub fn new() -> Self {
        Self
    }

    pub fn is_relevant(&self, line: &str) -> bool {
        if line.is_empty() {
            return false;
        }

        GameLogger::iter().any(|logger| {
            line.contains(logger.tag())
                && logger.markers().iter().any(|marker| line.contains(marker))
        })
    }
}
