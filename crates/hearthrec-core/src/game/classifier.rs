use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::game::GameMode;
use crate::logger::GameLogger;

static SCENE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[LoadingScreen\] LoadingScreen\.OnSceneLoaded\(\) - prevMode=(.*) currMode=(.*)")
        .expect("scene transition pattern is valid")
});

const RANKED_MEDAL: &str = "unloading name=Medal_Ranked";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Effect {
    Set(GameMode),
    /// `currMode=` token of a scene transition.
    SceneTransition,
    /// Ranked medal unloaded; only meaningful once the game is complete.
    RankedMedal,
}

struct Rule {
    /// Logger the line must start with; `None` matches any line.
    source: Option<GameLogger>,
    needle: &'static str,
    effect: Effect,
}

/// Evaluated top to bottom, first match wins.
const RULES: &[Rule] = &[
    Rule {
        source: Some(GameLogger::Bob),
        needle: "---RegisterScreenForge---",
        effect: Effect::Set(GameMode::Arena),
    },
    Rule {
        source: Some(GameLogger::Bob),
        needle: "---RegisterScreenTourneys---",
        effect: Effect::Set(GameMode::Casual),
    },
    Rule {
        source: Some(GameLogger::Bob),
        needle: "---RegisterScreenFriendly---",
        effect: Effect::Set(GameMode::FriendlyChallenge),
    },
    Rule {
        source: Some(GameLogger::LoadingScreen),
        needle: "currMode=",
        effect: Effect::SceneTransition,
    },
    Rule {
        source: Some(GameLogger::Asset),
        needle: RANKED_MEDAL,
        effect: Effect::RankedMedal,
    },
    Rule {
        source: None,
        needle: "lo=0]",
        effect: Effect::Set(GameMode::Adventure),
    },
];

/// Map a scene `currMode` token to a game mode.
fn scene_mode(token: &str) -> Option<GameMode> {
    match token {
        "TAVERN_BRAWL" => Some(GameMode::TavernBrawl),
        "TOURNAMENT" => Some(GameMode::Casual),
        "FRIENDLY" => Some(GameMode::FriendlyChallenge),
        "ADVENTURE" => Some(GameMode::Adventure),
        "DRAFT" => Some(GameMode::Arena),
        _ => None,
    }
}

/// Extract the `currMode` token of a scene transition line.
pub fn scene_current_mode(line: &str) -> Option<&str> {
    SCENE_PATTERN
        .captures(line)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str().trim())
}

/// Rank encoded in a medal asset name, e.g. `Medal_Ranked_17`.
fn medal_rank(line: &str) -> Option<i32> {
    let start = line.find(RANKED_MEDAL)? + RANKED_MEDAL.len();
    let digits: String = line[start..]
        .strip_prefix('_')?
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Infers the game mode from the log stream.
///
/// Mode selection screens are registered once per visit, so the mode carries
/// over from one game to the next. The ranked upgrade is the exception: it is
/// tied to a single game and is undone when the next game starts.
#[derive(Debug, Clone, Default)]
pub struct ModeClassifier {
    mode: GameMode,
    rank: Option<i32>,
    /// Mode to restore when a ranked upgrade expires.
    before_ranked: GameMode,
}

impl ModeClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line. `game_completed` tells whether the current game has
    /// already reached its final state.
    pub fn observe(&mut self, line: &str, game_completed: bool) {
        let source = GameLogger::of_line(line);
        let Some(rule) = RULES
            .iter()
            .find(|rule| rule.source.is_none_or(|s| Some(s) == source) && line.contains(rule.needle))
        else {
            return;
        };

        match rule.effect {
            Effect::Set(mode) => self.set(mode),
            Effect::SceneTransition => {
                if let Some(mode) = scene_current_mode(line).and_then(scene_mode) {
                    self.set(mode);
                }
            }
            Effect::RankedMedal => {
                if game_completed {
                    if self.mode != GameMode::Ranked {
                        self.before_ranked = self.mode;
                    }
                    self.mode = GameMode::Ranked;
                    self.rank = medal_rank(line);
                    debug!("Ranked medal unloaded, rank {:?}", self.rank);
                }
            }
        }
    }

    /// A new game started: the previous game's ranked upgrade no longer applies.
    pub fn begin_game(&mut self) {
        if self.mode == GameMode::Ranked {
            self.mode = self.before_ranked;
        }
        self.rank = None;
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn rank(&self) -> Option<i32> {
        self.rank
    }

    fn set(&mut self, mode: GameMode) {
        if mode != self.mode {
            debug!("Game mode {} -> {}", self.mode, mode);
        }
        self.mode = mode;
        self.rank = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEDAL: &str = "[Asset] CachedAsset.UnloadAssetObject() - unloading name=Medal_Ranked_17 family=Medals persistent=False";

    fn scene(curr: &str) -> String {
        format!("[LoadingScreen] LoadingScreen.OnSceneLoaded() - prevMode=HUB currMode={curr}")
    }

    #[test]
    fn test_default_is_unknown() {
        let classifier = ModeClassifier::new();
        assert_eq!(classifier.mode(), GameMode::Unknown);
        assert_eq!(classifier.rank(), None);
    }

    #[test]
    fn test_bob_registration() {
        let mut classifier = ModeClassifier::new();
        classifier.observe("[Bob] ---RegisterScreenForge---", false);
        assert_eq!(classifier.mode(), GameMode::Arena);
        classifier.observe("[Bob] ---RegisterScreenTourneys---", false);
        assert_eq!(classifier.mode(), GameMode::Casual);
        classifier.observe("[Bob] ---RegisterScreenFriendly---", false);
        assert_eq!(classifier.mode(), GameMode::FriendlyChallenge);
    }

    #[test]
    fn test_bob_needle_requires_bob_source() {
        let mut classifier = ModeClassifier::new();
        classifier.observe("[Power] ---RegisterScreenForge---", false);
        assert_eq!(classifier.mode(), GameMode::Unknown);
    }

    #[test]
    fn test_scene_transitions() {
        let cases = [
            ("TAVERN_BRAWL", GameMode::TavernBrawl),
            ("TOURNAMENT", GameMode::Casual),
            ("FRIENDLY", GameMode::FriendlyChallenge),
            ("ADVENTURE", GameMode::Adventure),
            ("DRAFT", GameMode::Arena),
        ];
        for (token, expected) in cases {
            let mut classifier = ModeClassifier::new();
            classifier.observe(&scene(token), false);
            assert_eq!(classifier.mode(), expected, "currMode={token}");
        }
    }

    #[test]
    fn test_unknown_scene_keeps_mode() {
        let mut classifier = ModeClassifier::new();
        classifier.observe(&scene("DRAFT"), false);
        classifier.observe(&scene("HUB"), false);
        classifier.observe(&scene("COLLECTIONMANAGER"), false);
        assert_eq!(classifier.mode(), GameMode::Arena);
    }

    #[test]
    fn test_scene_current_mode_extraction() {
        assert_eq!(scene_current_mode(&scene("GAMEPLAY ")), Some("GAMEPLAY"));
        assert_eq!(scene_current_mode("[LoadingScreen] something else"), None);
    }

    #[test]
    fn test_ranked_medal_before_complete_is_ignored() {
        let mut classifier = ModeClassifier::new();
        classifier.observe("[Bob] ---RegisterScreenTourneys---", false);
        classifier.observe(MEDAL, false);
        assert_eq!(classifier.mode(), GameMode::Casual);
        assert_eq!(classifier.rank(), None);
    }

    #[test]
    fn test_ranked_medal_after_complete_upgrades() {
        let mut classifier = ModeClassifier::new();
        classifier.observe("[Bob] ---RegisterScreenTourneys---", false);
        classifier.observe(MEDAL, true);
        assert_eq!(classifier.mode(), GameMode::Ranked);
        assert_eq!(classifier.rank(), Some(17));
    }

    #[test]
    fn test_ranked_medal_without_number() {
        let mut classifier = ModeClassifier::new();
        classifier.observe(
            "[Asset] CachedAsset.UnloadAssetObject() - unloading name=Medal_Ranked family=Medals",
            true,
        );
        assert_eq!(classifier.mode(), GameMode::Ranked);
        assert_eq!(classifier.rank(), None);
    }

    #[test]
    fn test_ranked_expires_with_next_game() {
        let mut classifier = ModeClassifier::new();
        classifier.observe("[Bob] ---RegisterScreenTourneys---", false);
        classifier.observe(MEDAL, true);
        classifier.begin_game();
        assert_eq!(classifier.mode(), GameMode::Casual);
        assert_eq!(classifier.rank(), None);
    }

    #[test]
    fn test_mode_persists_across_games() {
        let mut classifier = ModeClassifier::new();
        classifier.observe("[Bob] ---RegisterScreenForge---", false);
        classifier.begin_game();
        assert_eq!(classifier.mode(), GameMode::Arena);
    }

    #[test]
    fn test_adventure_marker_from_any_source() {
        let mut classifier = ModeClassifier::new();
        classifier.observe(
            "[Power] GameState.DebugPrintPower() - TAG_CHANGE Entity=[name=x id=4 zone=PLAY zonePos=0 cardId=y player=1 lo=0] tag=x value=1",
            false,
        );
        assert_eq!(classifier.mode(), GameMode::Adventure);
    }

    #[test]
    fn test_later_signal_overwrites_and_clears_rank() {
        let mut classifier = ModeClassifier::new();
        classifier.observe(MEDAL, true);
        assert_eq!(classifier.rank(), Some(17));
        classifier.observe(&scene("TAVERN_BRAWL"), false);
        assert_eq!(classifier.mode(), GameMode::TavernBrawl);
        assert_eq!(classifier.rank(), None);
    }
}
