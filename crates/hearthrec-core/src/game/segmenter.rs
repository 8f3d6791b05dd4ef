use tracing::{debug, info, warn};

use crate::error::Result;
use crate::game::{Clock, GameRecord, ModeClassifier, SystemClock};

/// Log markers delimiting a game.
pub mod markers {
    /// A new game is created.
    pub const CREATE_GAME: &str = "CREATE_GAME";

    /// The game entity reached its final state.
    pub const GAME_STATE_COMPLETE: &str = "TAG_CHANGE Entity=GameEntity tag=STATE value=COMPLETE";

    /// Last line the client writes for a finished game.
    pub const END_OF_GAME: &str = "---RegisterFriendChallenge---";
}

/// Text of a game being recorded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameBuffer {
    pub text: String,
    pub start_time: i64,
    pub end_time: i64,
}

impl GameBuffer {
    fn open(line: &str, now: i64) -> Self {
        let mut buffer = Self {
            text: String::new(),
            start_time: now,
            end_time: 0,
        };
        buffer.append(line);
        buffer
    }

    fn append(&mut self, line: &str) {
        self.text.push_str(line);
        self.text.push('\n');
    }

    /// Both the creation and the final state of the game are present.
    ///
    /// Guards against truncated buffers independently of the state machine.
    pub fn is_structurally_valid(&self) -> bool {
        self.text.contains(markers::CREATE_GAME) && self.text.contains(markers::GAME_STATE_COMPLETE)
    }
}

/// Segmentation state.
///
/// ## State Transition Rules
///
/// - Idle -> Active (`CREATE_GAME`)
/// - Active -> Completed (game state `COMPLETE`)
/// - Completed -> Idle (end-of-game marker, the buffer is finalized)
/// - Active | Completed -> Active (`CREATE_GAME` again: the stale buffer is abandoned)
///
/// While a buffer is open every line is appended to it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SegmentState {
    #[default]
    Idle,
    Active(GameBuffer),
    Completed(GameBuffer),
}

/// What a single line did to the segmentation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// No buffer is open and the line does not start a game.
    Ignored,
    /// The line was appended to the open buffer.
    Appended,
    /// A new game was opened; `abandoned` holds the buffer it replaced.
    Started { abandoned: Option<GameBuffer> },
    /// The game reached its final state.
    Completed,
    /// The game ended and its buffer passed the structural check.
    Finished(GameBuffer),
    /// The game ended but its buffer is missing a required marker.
    Invalid(GameBuffer),
}

impl SegmentState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    pub fn buffer(&self) -> Option<&GameBuffer> {
        match self {
            Self::Idle => None,
            Self::Active(buffer) | Self::Completed(buffer) => Some(buffer),
        }
    }

    /// Apply one line at time `now`.
    pub fn advance(self, line: &str, now: i64) -> (SegmentState, Transition) {
        if line.contains(markers::CREATE_GAME) {
            let abandoned = match self {
                Self::Idle => None,
                Self::Active(buffer) | Self::Completed(buffer) => Some(buffer),
            };
            return (
                Self::Active(GameBuffer::open(line, now)),
                Transition::Started { abandoned },
            );
        }

        match self {
            Self::Idle => (Self::Idle, Transition::Ignored),
            Self::Active(mut buffer) => {
                buffer.append(line);
                if line.contains(markers::GAME_STATE_COMPLETE) {
                    buffer.end_time = now;
                    (Self::Completed(buffer), Transition::Completed)
                } else {
                    (Self::Active(buffer), Transition::Appended)
                }
            }
            Self::Completed(mut buffer) => {
                buffer.append(line);
                if !line.contains(markers::END_OF_GAME) {
                    return (Self::Completed(buffer), Transition::Appended);
                }
                if buffer.is_structurally_valid() {
                    (Self::Idle, Transition::Finished(buffer))
                } else {
                    (Self::Idle, Transition::Invalid(buffer))
                }
            }
        }
    }
}

/// Turns the relevant lines of the log into finished game records.
///
/// The mode classifier sees every line before the state machine does, so a
/// line that both ends a game and signals a mode is classified first.
pub struct GameSegmenter<C: Clock = SystemClock> {
    state: SegmentState,
    classifier: ModeClassifier,
    clock: C,
}

impl GameSegmenter<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for GameSegmenter<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> GameSegmenter<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            state: SegmentState::Idle,
            classifier: ModeClassifier::new(),
            clock,
        }
    }

    /// Feed one line; returns a record when the line finishes a game.
    pub fn push_line(&mut self, line: &str) -> Result<Option<GameRecord>> {
        self.classifier.observe(line, self.state.is_completed());

        let now = self.clock.now_millis();
        let (next, transition) = std::mem::take(&mut self.state).advance(line, now);
        self.state = next;

        match transition {
            Transition::Started { abandoned } => {
                if let Some(stale) = abandoned {
                    warn!(
                        "New game started before the previous one ended, discarding {} bytes started at {}",
                        stale.text.len(),
                        stale.start_time
                    );
                }
                self.classifier.begin_game();
                debug!("Game started at {}", now);
                Ok(None)
            }
            Transition::Completed => {
                debug!("Game completed at {}", now);
                Ok(None)
            }
            Transition::Finished(buffer) => {
                let mode = self.classifier.mode();
                info!("Detected game mode = {}", mode);
                let record = GameRecord::from_text(
                    &buffer.text,
                    buffer.start_time,
                    buffer.end_time,
                    mode,
                    self.classifier.rank(),
                )?;
                Ok(Some(record))
            }
            Transition::Invalid(buffer) => {
                debug!(
                    "Dropping game buffer without start or final state ({} bytes)",
                    buffer.text.len()
                );
                Ok(None)
            }
            Transition::Appended | Transition::Ignored => Ok(None),
        }
    }

    pub fn state(&self) -> &SegmentState {
        &self.state
    }

    pub fn classifier(&self) -> &ModeClassifier {
        &self.classifier
    }

    /// Drop any open buffer (e.g. when the log source is switched).
    pub fn reset(&mut self) {
        self.state = SegmentState::Idle;
    }
}
