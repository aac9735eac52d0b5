//! Progression engine
//!
//! Turns a [`UserProfile`] plus an [`Action`] into an updated profile and a
//! mood. The engine holds only configuration; profiles go in and come out by
//! value and the caller decides where they live. The current date is always
//! passed in as `today`.
//!
//! Per activity the stages run in a fixed order, each one free to overwrite
//! the mood set by the one before:
//!
//! ```text
//! action mood hint -> streak (bonus XP, Excited on milestone)
//!                  -> XP award (Excited on level-up)
//! ```

use chrono::NaiveDate;

use crate::config::{EngineConfig, StreakMilestone};
use crate::error::{MascotError, Result};
use crate::levels::LevelTable;
use crate::models::{Action, ActionOutcome, Mood, UserProfile};
use crate::xp::{self, StreakUpdate, XpGain};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressionEngine {
    table: LevelTable,
    milestones: Vec<StreakMilestone>,
    sleepy_after_days: i64,
}

impl Default for ProgressionEngine {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self {
            table: LevelTable::from_config(&config.levels),
            milestones: config.streak.milestones,
            sleepy_after_days: config.mood.sleepy_after_days,
        }
    }
}

impl ProgressionEngine {
    pub fn new(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            table: LevelTable::from_config(&config.levels),
            milestones: config.streak.milestones.clone(),
            sleepy_after_days: config.mood.sleepy_after_days,
        })
    }

    pub fn level_table(&self) -> &LevelTable {
        &self.table
    }

    pub fn threshold_for(&self, level: u32) -> Result<u64> {
        self.table.threshold_for(level)
    }

    pub fn level_for(&self, xp: u64, level_hint: u32) -> Result<u32> {
        self.table.level_for(xp, level_hint)
    }

    /// Progress bar value for the profile's current level.
    pub fn level_progress(&self, profile: &UserProfile) -> Result<f64> {
        self.table.level_progress(profile.level, profile.xp)
    }

    pub fn resolve_app_open_mood(&self, last_activity_date: Option<NaiveDate>, today: NaiveDate) -> Mood {
        xp::resolve_app_open_mood(last_activity_date, today, self.sleepy_after_days)
    }

    pub fn resolve_streak(&self, profile: &UserProfile, today: NaiveDate) -> StreakUpdate {
        xp::resolve_streak(
            profile.last_activity_date,
            today,
            profile.streak_count,
            &self.milestones,
        )
    }

    pub fn add_xp(&self, profile: UserProfile, amount: i64) -> Result<XpGain> {
        xp::add_xp(&self.table, profile, amount)
    }

    /// Dispatch one action against `profile` as of `today`.
    pub fn apply_action(
        &self,
        profile: UserProfile,
        action: Action,
        today: NaiveDate,
    ) -> Result<ActionOutcome> {
        if !action.counts_as_activity() {
            let mood = self.resolve_app_open_mood(profile.last_activity_date, today);
            tracing::debug!("App opened, mood resolved to {}", mood.label());
            return Ok(ActionOutcome {
                profile: UserProfile { mood, ..profile },
                mood,
                xp_gained: 0,
                streak_bonus: 0,
                level_up: None,
            });
        }

        let mut mood = action.mood_hint().unwrap_or(profile.mood);

        let streak = self.resolve_streak(&profile, today);
        if let Some(m) = streak.mood_override {
            mood = m;
        }
        let profile = UserProfile {
            streak_count: streak.streak_count,
            longest_streak: profile.longest_streak.max(streak.streak_count),
            last_activity_date: Some(today),
            ..profile
        };

        let xp_gained = streak
            .bonus_xp
            .checked_add(action.base_xp())
            .ok_or(MascotError::XpOverflow)?;
        let amount = i64::try_from(xp_gained).map_err(|_| MascotError::XpOverflow)?;
        let gain = self.add_xp(profile, amount)?;
        if let Some(m) = gain.mood_override {
            mood = m;
        }

        tracing::debug!(
            "{} applied: +{} XP (streak bonus {}), level {}, streak {}, mood {}",
            action.as_str(),
            xp_gained,
            streak.bonus_xp,
            gain.profile.level,
            gain.profile.streak_count,
            mood.label()
        );

        Ok(ActionOutcome {
            profile: UserProfile { mood, ..gain.profile },
            mood,
            xp_gained,
            streak_bonus: streak.bonus_xp,
            level_up: gain.level_up,
        })
    }
}
