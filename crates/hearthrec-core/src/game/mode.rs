use serde::{Deserialize, Serialize};
use strum::{FromRepr, IntoStaticStr};

/// Mode of a recorded game.
///
/// The discriminant is the value sent to the collector as `gameType`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    FromRepr,
    IntoStaticStr,
)]
#[repr(u8)]
pub enum GameMode {
    #[default]
    #[strum(serialize = "UNKNOWN")]
    Unknown = 0,
    #[strum(serialize = "CASUAL")]
    Casual = 1,
    #[strum(serialize = "RANKED")]
    Ranked = 2,
    #[strum(serialize = "ARENA")]
    Arena = 3,
    #[strum(serialize = "ADVENTURE")]
    Adventure = 4,
    #[strum(serialize = "TAVERN_BRAWL")]
    TavernBrawl = 5,
    #[strum(serialize = "FRIENDLY_CHALLENGE")]
    FriendlyChallenge = 6,
}

impl GameMode {
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::from_repr(value)
    }

    pub fn wire_value(&self) -> u8 {
        *self as u8
    }

    pub fn short_name(&self) -> &'static str {
        self.into()
    }
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short_name())
    }
}
