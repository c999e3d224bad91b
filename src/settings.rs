//! Match configuration
//!
//! Built by the career/league layer before kickoff and read-only to the core.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::skills::SkillTreeState;

/// Errors reading or writing a match configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read match config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid match config: {0}")]
    Json(#[from] serde_json::Error),
}

/// One of the two control slots. Home defends the left goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Side {
    #[default]
    Home,
    Away,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Home, Side::Away];

    /// Index into per-side arrays
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::Home => 0,
            Side::Away => 1,
        }
    }

    #[inline]
    pub fn opponent(self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }

    /// Sign of the x direction this side attacks in
    #[inline]
    pub fn attack_dir(self) -> f32 {
        match self {
            Side::Home => 1.0,
            Side::Away => -1.0,
        }
    }
}

/// AI difficulty tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "med" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Weather assigned to a fixture by the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Weather {
    #[default]
    Sunny,
    Rain,
    Snow,
}

impl Weather {
    pub fn as_str(&self) -> &'static str {
        match self {
            Weather::Sunny => "Sunny",
            Weather::Rain => "Rain",
            Weather::Snow => "Snow",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sunny" | "sun" => Some(Weather::Sunny),
            "rain" | "rainy" => Some(Weather::Rain),
            "snow" | "snowy" => Some(Weather::Snow),
            _ => None,
        }
    }
}

/// Team identity as far as the match core cares
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub id: String,
    pub name: String,
    /// Overall rating, 0-100
    pub strength: u8,
}

impl TeamInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>, strength: u8) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            strength: strength.min(100),
        }
    }
}

/// Everything the core needs to start a match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    pub home: TeamInfo,
    pub away: TeamInfo,
    /// Side driven by the primary input device
    pub human_side: Side,
    /// Match length in seconds (0 = unlimited)
    pub duration_secs: u32,
    /// First to this many goals wins (None or non-positive = disabled)
    pub target_score: Option<i32>,
    /// Both sides human-controlled
    pub multiplayer: bool,
    /// Fixed-path goalkeepers in front of each goal
    pub goalie_mode: bool,
    /// Power-up spawns
    pub fire_mode: bool,
    pub difficulty: Difficulty,
    pub weather: Weather,
    /// Career skill tree (None = friendly, no permanent modifiers)
    #[serde(default)]
    pub skills: Option<SkillTreeState>,
    /// RNG seed for AI rolls, spawns and collision nudges
    #[serde(default)]
    pub seed: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            home: TeamInfo::new("home", "Home", 80),
            away: TeamInfo::new("away", "Away", 80),
            human_side: Side::Home,
            duration_secs: 90,
            target_score: None,
            multiplayer: false,
            goalie_mode: false,
            fire_mode: false,
            difficulty: Difficulty::Normal,
            weather: Weather::Sunny,
            skills: None,
            seed: 0,
        }
    }
}

impl MatchConfig {
    /// Effective target score; non-positive values disable the rule
    pub fn target(&self) -> Option<u32> {
        self.target_score.filter(|&t| t > 0).map(|t| t as u32)
    }

    pub fn team(&self, side: Side) -> &TeamInfo {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    /// Side run by the AI (single-player only)
    pub fn ai_side(&self) -> Option<Side> {
        if self.multiplayer {
            None
        } else {
            Some(self.human_side.opponent())
        }
    }

    /// Side receiving permanent skill-tree modifiers
    pub fn skill_side(&self) -> Option<Side> {
        if self.multiplayer || self.skills.is_none() {
            None
        } else {
            Some(self.human_side)
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a config file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!(
            "Loaded match config: {} vs {} ({})",
            config.home.name,
            config.away.name,
            config.weather.as_str()
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_positive_target_is_disabled() {
        let mut config = MatchConfig::default();
        config.target_score = Some(0);
        assert_eq!(config.target(), None);
        config.target_score = Some(-2);
        assert_eq!(config.target(), None);
        config.target_score = Some(3);
        assert_eq!(config.target(), Some(3));
    }

    #[test]
    fn test_ai_and_skill_sides() {
        let mut config = MatchConfig {
            human_side: Side::Away,
            skills: Some(SkillTreeState::default()),
            ..Default::default()
        };
        assert_eq!(config.ai_side(), Some(Side::Home));
        assert_eq!(config.skill_side(), Some(Side::Away));

        config.multiplayer = true;
        assert_eq!(config.ai_side(), None);
        assert_eq!(config.skill_side(), None);
    }

    #[test]
    fn test_json_roundtrip_keeps_fields() {
        let config = MatchConfig {
            difficulty: Difficulty::Hard,
            weather: Weather::Snow,
            fire_mode: true,
            ..Default::default()
        };
        let json = config.to_json().unwrap();
        let back = MatchConfig::from_json(&json).unwrap();
        assert_eq!(back.difficulty, Difficulty::Hard);
        assert_eq!(back.weather, Weather::Snow);
        assert!(back.fire_mode);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let json = r#"{
            "home": {"id": "gs", "name": "Galatasaray", "strength": 92},
            "away": {"id": "fb", "name": "Fenerbahce", "strength": 91},
            "human_side": "Home",
            "duration_secs": 0,
            "target_score": 3,
            "multiplayer": false,
            "goalie_mode": true,
            "fire_mode": false,
            "difficulty": "Easy",
            "weather": "Rain"
        }"#;
        let config = MatchConfig::from_json(json).unwrap();
        assert!(config.skills.is_none());
        assert_eq!(config.seed, 0);
        assert_eq!(config.target(), Some(3));
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(
            MatchConfig::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_enum_from_str() {
        assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
        assert_eq!(Weather::from_str("rainy"), Some(Weather::Rain));
        assert_eq!(Weather::from_str("fog"), None);
    }
}
