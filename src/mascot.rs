use chrono::NaiveDate;

use crate::db::ProfileStore;
use crate::engine::ProgressionEngine;
use crate::error::Result;
use crate::models::{Action, ActionOutcome, MascotStage, UserProfile};

/// Caller-side glue: owns a store and runs each action through the engine.
///
/// One action at a time; the store is only written after the engine has
/// accepted the action.
pub struct Mascot<S: ProfileStore> {
    engine: ProgressionEngine,
    store: S,
    profile: UserProfile,
}

impl<S: ProfileStore> Mascot<S> {
    pub fn load(engine: ProgressionEngine, store: S) -> Result<Self> {
        let profile = store.load()?;
        tracing::debug!(
            "Loaded mascot profile: level {}, {} XP, streak {}",
            profile.level,
            profile.xp,
            profile.streak_count
        );
        Ok(Self {
            engine,
            store,
            profile,
        })
    }

    pub fn record(&mut self, action: Action, today: NaiveDate) -> Result<ActionOutcome> {
        let outcome = self
            .engine
            .apply_action(self.profile.clone(), action, today)?;
        self.store.save(&outcome.profile)?;
        if let Err(e) = self.store.log_activity(today, action, &outcome) {
            tracing::warn!("Failed to log {}: {}", action.as_str(), e);
        }
        self.profile = outcome.profile.clone();
        Ok(outcome)
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn stage(&self) -> MascotStage {
        self.profile.stage()
    }

    /// 0.0..1.0 progress within current level
    pub fn progress(&self) -> Result<f64> {
        self.engine.level_progress(&self.profile)
    }

    pub fn engine(&self) -> &ProgressionEngine {
        &self.engine
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::db::{JsonFileStore, SqliteStore};
    use crate::error::MascotError;
    use crate::models::Mood;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, d).unwrap()
    }

    #[test]
    fn test_record_persists_and_logs() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut mascot = Mascot::load(ProgressionEngine::default(), store).unwrap();

        mascot.record(Action::AppOpened, day(1)).unwrap();
        mascot.record(Action::ScanCompleted, day(1)).unwrap();
        let outcome = mascot.record(Action::RecipeSaved, day(1)).unwrap();

        assert_eq!(outcome.profile.xp, 15);
        assert_eq!(outcome.profile.level, 2);
        assert_eq!(mascot.profile(), &outcome.profile);
        assert_eq!(mascot.store().load().unwrap(), outcome.profile);
        assert_eq!(mascot.store().action_count_on(day(1)).unwrap(), 2);
        assert_eq!(mascot.store().total_stats().unwrap(), (2, 15));
    }

    #[test]
    fn test_stage_and_progress() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut mascot = Mascot::load(ProgressionEngine::default(), store).unwrap();
        assert_eq!(mascot.stage(), MascotStage::BabyChef);
        assert!((mascot.progress().unwrap() - 0.0).abs() < f64::EPSILON);

        mascot.record(Action::ScanCompleted, day(1)).unwrap();
        assert!((mascot.progress().unwrap() - 0.5).abs() < 0.01);

        for _ in 0..4 {
            mascot.record(Action::ShareCardExported, day(1)).unwrap();
        }
        // 85 xp
        assert_eq!(mascot.profile().level, 5);
        assert_eq!(mascot.stage(), MascotStage::ApprenticeChef);
    }

    #[test]
    fn test_progress_reports_corrupt_level() {
        let store = JsonFileStore::new(PathBuf::from("unused.json"));
        let mascot = Mascot {
            engine: ProgressionEngine::default(),
            store,
            profile: UserProfile {
                level: 0,
                ..UserProfile::default()
            },
        };
        assert!(matches!(
            mascot.progress(),
            Err(MascotError::OutOfRange { level: 0 })
        ));
    }

    #[test]
    fn test_reload_restores_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapchef.db");
        {
            let store = SqliteStore::open(&path).unwrap();
            let mut mascot = Mascot::load(ProgressionEngine::default(), store).unwrap();
            mascot.record(Action::ScanCompleted, day(1)).unwrap();
            mascot.record(Action::ScanCompleted, day(2)).unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        let mut mascot = Mascot::load(ProgressionEngine::default(), store).unwrap();
        assert_eq!(mascot.profile().streak_count, 2);

        let outcome = mascot.record(Action::ScanCompleted, day(3)).unwrap();
        assert_eq!(outcome.profile.streak_count, 3);
        assert_eq!(outcome.streak_bonus, 25);
        assert_eq!(outcome.mood, Mood::Excited);
    }
}
