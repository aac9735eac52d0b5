//! Engine configuration
//!
//! Level thresholds, streak milestones and mood timing are data, not code.
//! Everything has a default matching the shipped app, so an empty TOML
//! document (or no file at all) yields the reference behavior.
//!
//! ```toml
//! [levels]
//! thresholds = [0, 10, 25, 45, 70, 100, 135, 175]
//! increment = 40
//!
//! [[streak.milestones]]
//! days = 3
//! bonus_xp = 25
//!
//! [mood]
//! sleepy_after_days = 3
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MascotError, Result};

/// Cumulative XP needed for levels 1..=8.
pub const DEFAULT_THRESHOLDS: [u64; 8] = [0, 10, 25, 45, 70, 100, 135, 175];
/// XP cost of each level past the table.
pub const DEFAULT_INCREMENT: u64 = 40;
pub const DEFAULT_SLEEPY_AFTER_DAYS: i64 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub levels: LevelConfig,
    pub streak: StreakConfig,
    pub mood: MoodConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Cumulative thresholds, index 0 is level 1.
    pub thresholds: Vec<u64>,
    pub increment: u64,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            thresholds: DEFAULT_THRESHOLDS.to_vec(),
            increment: DEFAULT_INCREMENT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreakConfig {
    pub milestones: Vec<StreakMilestone>,
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            milestones: vec![
                StreakMilestone {
                    days: 3,
                    bonus_xp: 25,
                },
                StreakMilestone {
                    days: 7,
                    bonus_xp: 50,
                },
            ],
        }
    }
}

/// One-off bonus for landing exactly on a streak length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakMilestone {
    pub days: u32,
    pub bonus_xp: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoodConfig {
    /// Days away after which opening the app finds the mascot asleep.
    pub sleepy_after_days: i64,
}

impl Default for MoodConfig {
    fn default() -> Self {
        Self {
            sleepy_after_days: DEFAULT_SLEEPY_AFTER_DAYS,
        }
    }
}

impl EngineConfig {
    /// Load and validate a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content)
            .map_err(|e| MascotError::Config(format!("{}: {}", path.display(), e)))?;
        tracing::debug!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate a TOML document.
    pub fn parse(content: &str) -> Result<Self> {
        let config: EngineConfig =
            toml::from_str(content).map_err(|e| MascotError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let thresholds = &self.levels.thresholds;
        match thresholds.first() {
            None => return Err(MascotError::Config("levels.thresholds is empty".into())),
            Some(&first) if first != 0 => {
                return Err(MascotError::Config(format!(
                    "levels.thresholds must start at 0, got {}",
                    first
                )));
            }
            Some(_) => {}
        }
        if thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(MascotError::Config(
                "levels.thresholds must be strictly increasing".into(),
            ));
        }
        if self.levels.increment == 0 {
            return Err(MascotError::Config("levels.increment must be > 0".into()));
        }

        let mut seen = HashSet::new();
        for milestone in &self.streak.milestones {
            // A streak of 1 is a fresh start, not a continuation.
            if milestone.days < 2 {
                return Err(MascotError::Config(format!(
                    "streak milestone at {} days can never be reached",
                    milestone.days
                )));
            }
            if !seen.insert(milestone.days) {
                return Err(MascotError::Config(format!(
                    "duplicate streak milestone at {} days",
                    milestone.days
                )));
            }
        }

        if self.mood.sleepy_after_days < 1 {
            return Err(MascotError::Config(
                "mood.sleepy_after_days must be >= 1".into(),
            ));
        }
        Ok(())
    }
}
