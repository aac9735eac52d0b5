use chrono::NaiveDate;

use crate::config::StreakMilestone;
use crate::error::{MascotError, Result};
use crate::levels::LevelTable;
use crate::models::{LevelUp, Mood, UserProfile};

/// Outcome of one streak resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    pub streak_count: u32,
    pub bonus_xp: u64,
    pub mood_override: Option<Mood>,
}

/// Outcome of one XP award.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XpGain {
    pub profile: UserProfile,
    pub level_up: Option<LevelUp>,
    pub mood_override: Option<Mood>,
}

impl XpGain {
    pub fn leveled_up(&self) -> bool {
        self.level_up.is_some()
    }
}

/// Whole calendar days from `last` to `today`; negative if the clock went back.
pub fn days_between(last: NaiveDate, today: NaiveDate) -> i64 {
    (today - last).num_days()
}

pub fn resolve_streak(
    last_activity_date: Option<NaiveDate>,
    today: NaiveDate,
    current_streak: u32,
    milestones: &[StreakMilestone],
) -> StreakUpdate {
    let unchanged = StreakUpdate {
        streak_count: current_streak,
        bonus_xp: 0,
        mood_override: None,
    };
    let fresh = StreakUpdate {
        streak_count: 1,
        ..unchanged
    };

    let Some(last_date) = last_activity_date else {
        return fresh; // first activity
    };

    match days_between(last_date, today) {
        // same day, or a clock that moved backwards
        diff if diff <= 0 => unchanged,
        1 => {
            let streak_count = current_streak.saturating_add(1);
            let bonus_xp: u64 = milestones
                .iter()
                .filter(|m| m.days == streak_count)
                .map(|m| m.bonus_xp)
                .sum();
            if bonus_xp > 0 {
                tracing::info!("Streak milestone reached: {} days (+{} XP)", streak_count, bonus_xp);
            }
            StreakUpdate {
                streak_count,
                bonus_xp,
                mood_override: (bonus_xp > 0).then_some(Mood::Excited),
            }
        }
        _ => fresh, // missed, reset
    }
}

/// Add `amount` XP and resolve every level it unlocks in one pass.
pub fn add_xp(table: &LevelTable, profile: UserProfile, amount: i64) -> Result<XpGain> {
    if amount < 0 {
        return Err(MascotError::InvalidArgument { amount });
    }
    let xp = profile
        .xp
        .checked_add(amount as u64)
        .ok_or(MascotError::XpOverflow)?;

    let old_level = profile.level;
    let new_level = table.level_for(xp, old_level)?;
    let level_up = (new_level > old_level).then_some(LevelUp {
        from: old_level,
        to: new_level,
    });
    if let Some(up) = level_up {
        tracing::info!("Level up: {} -> {}", up.from, up.to);
    }

    Ok(XpGain {
        profile: UserProfile {
            xp,
            level: new_level,
            ..profile
        },
        level_up,
        mood_override: level_up.map(|_| Mood::Excited),
    })
}

/// Mood on app launch, from time away alone.
pub fn resolve_app_open_mood(
    last_activity_date: Option<NaiveDate>,
    today: NaiveDate,
    sleepy_after_days: i64,
) -> Mood {
    match last_activity_date {
        Some(last_date) if days_between(last_date, today) >= sleepy_after_days => Mood::Sleepy,
        _ => Mood::Curious,
    }
}
