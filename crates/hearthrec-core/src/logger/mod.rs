//! Game client loggers.
//!
//! The client writes one log stream shared by several named loggers. Each line
//! starts with the logger tag, e.g. `[Power] GameState.DebugPrintPower() - ...`.
//! Only a few loggers carry data the recorder needs; the others are enabled in
//! `log.config` for completeness of the uploaded game.

mod filter;
mod log_config;

pub use filter::*;
pub use log_config::*;

use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
pub enum GameLogger {
    /// Everything that happens in the game itself.
    #[strum(serialize = "[Power]")]
    Power,
    /// Asset unloading. The ranked medal unloads after a ranked game.
    #[strum(serialize = "[Asset]")]
    Asset,
    /// Screen registration, used to detect the game mode.
    #[strum(serialize = "[Bob]")]
    Bob,
    /// Scene transitions, also used to detect the game mode.
    #[strum(serialize = "[LoadingScreen]")]
    LoadingScreen,
    #[strum(serialize = "[Achievements]")]
    Achievements,
    #[strum(serialize = "[Arena]")]
    Arena,
    #[strum(serialize = "[Rachelle]")]
    Rachelle,
}

impl GameLogger {
    /// Tag as it appears in the log and in `log.config`.
    pub fn tag(&self) -> &'static str {
        self.into()
    }

    /// Phrases a line of this logger must contain to be recorded.
    ///
    /// Loggers without markers are configured but never recorded.
    pub fn markers(&self) -> &'static [&'static str] {
        match self {
            Self::Power => &["GameState.DebugPrintPower() - "],
            Self::Asset => &["CachedAsset.UnloadAssetObject() - unloading name=Medal_Ranked"],
            Self::Bob => &["---Register"],
            Self::LoadingScreen => &["LoadingScreen.OnSceneLoaded() - prevMode="],
            Self::Achievements | Self::Arena | Self::Rachelle => &[],
        }
    }

    /// Logger whose tag starts the line, if any.
    pub fn of_line(line: &str) -> Option<Self> {
        Self::iter().find(|logger| line.starts_with(logger.tag()))
    }
}

impl std::fmt::Display for GameLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}
