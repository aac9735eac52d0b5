use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};

use crate::error::{MascotError, Result};
use crate::models::{Action, ActionOutcome, Mood, UserProfile};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Load/save contract for the single local profile.
pub trait ProfileStore {
    fn load(&self) -> Result<UserProfile>;

    fn save(&self, profile: &UserProfile) -> Result<()>;

    /// Append to the activity history, if the store keeps one.
    fn log_activity(&self, _day: NaiveDate, _action: Action, _outcome: &ActionOutcome) -> Result<()> {
        Ok(())
    }
}

/// app data dir
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("snapchef")
}

fn parse_date(raw: Option<String>) -> Option<NaiveDate> {
    let raw = raw?;
    match NaiveDate::parse_from_str(&raw, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::warn!("Ignoring unparseable last activity date {:?}: {}", raw, e);
            None
        }
    }
}

fn parse_mood(raw: &str) -> Mood {
    Mood::parse(raw).unwrap_or_else(|| {
        tracing::warn!("Unknown stored mood {:?}, falling back to happy", raw);
        Mood::Happy
    })
}

/// Levels start at 1; a stored 0 means the profile is corrupt.
fn check_level(profile: UserProfile) -> Result<UserProfile> {
    if profile.level < 1 {
        return Err(MascotError::OutOfRange {
            level: profile.level,
        });
    }
    Ok(profile)
}

fn xp_to_sql(xp: u64) -> Result<i64> {
    i64::try_from(xp).map_err(|_| MascotError::XpOverflow)
}

const SCHEMA_SQL: &str = "
    CREATE TABLE IF NOT EXISTS user_profile (
        id INTEGER PRIMARY KEY CHECK (id = 1),
        level INTEGER NOT NULL DEFAULT 1,
        xp INTEGER NOT NULL DEFAULT 0,
        streak_count INTEGER NOT NULL DEFAULT 0,
        longest_streak INTEGER NOT NULL DEFAULT 0,
        last_activity_date TEXT,
        mood TEXT NOT NULL DEFAULT 'happy'
    );

    INSERT OR IGNORE INTO user_profile (id, level, xp, streak_count, longest_streak, last_activity_date, mood)
    VALUES (1, 1, 0, 0, 0, NULL, 'happy');

    CREATE TABLE IF NOT EXISTS activity_log (
        id INTEGER PRIMARY KEY,
        day TEXT NOT NULL,
        action TEXT NOT NULL,
        xp_gained INTEGER NOT NULL,
        level_after INTEGER NOT NULL
    );
";

/// SQLite-backed profile plus activity history.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// open db + init tables
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path)?)
    }

    pub fn open_default() -> Result<Self> {
        Self::open(&data_dir().join("snapchef.db"))
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self { conn })
    }

    pub fn record_activity(
        &self,
        day: NaiveDate,
        action: Action,
        xp_gained: u64,
        level_after: u32,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO activity_log (day, action, xp_gained, level_after) VALUES (?1, ?2, ?3, ?4)",
            params![
                day.format(DATE_FORMAT).to_string(),
                action.as_str(),
                xp_to_sql(xp_gained)?,
                level_after,
            ],
        )?;
        Ok(())
    }

    /// actions logged on a day, app opens excluded
    pub fn action_count_on(&self, day: NaiveDate) -> Result<u32> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM activity_log WHERE day = ?1 AND action != ?2",
            params![day.format(DATE_FORMAT).to_string(), Action::AppOpened.as_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// total actions + total xp earned, app opens excluded
    pub fn total_stats(&self) -> Result<(u32, u64)> {
        let (count, xp): (u32, i64) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(xp_gained), 0) FROM activity_log WHERE action != ?1",
            params![Action::AppOpened.as_str()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        let xp = u64::try_from(xp).map_err(|_| MascotError::XpOverflow)?;
        Ok((count, xp))
    }

    /// most recent action on record
    pub fn last_action(&self) -> Result<Option<Action>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT action FROM activity_log ORDER BY id DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(raw.and_then(|s| Action::parse(&s)))
    }
}

impl ProfileStore for SqliteStore {
    fn load(&self) -> Result<UserProfile> {
        let (level, xp, streak_count, longest_streak, last_date, mood): (
            u32,
            i64,
            u32,
            u32,
            Option<String>,
            String,
        ) = self.conn.query_row(
            "SELECT level, xp, streak_count, longest_streak, last_activity_date, mood FROM user_profile WHERE id = 1",
            [],
            |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                ))
            },
        )?;

        check_level(UserProfile {
            level,
            xp: u64::try_from(xp).map_err(|_| MascotError::XpOverflow)?,
            streak_count,
            longest_streak,
            last_activity_date: parse_date(last_date),
            mood: parse_mood(&mood),
        })
    }

    fn save(&self, profile: &UserProfile) -> Result<()> {
        let last_date_str = profile
            .last_activity_date
            .map(|d| d.format(DATE_FORMAT).to_string());
        self.conn.execute(
            "UPDATE user_profile SET level = ?1, xp = ?2, streak_count = ?3, longest_streak = ?4, last_activity_date = ?5, mood = ?6 WHERE id = 1",
            params![
                profile.level,
                xp_to_sql(profile.xp)?,
                profile.streak_count,
                profile.longest_streak,
                last_date_str,
                profile.mood.as_str(),
            ],
        )?;
        Ok(())
    }

    fn log_activity(&self, day: NaiveDate, action: Action, outcome: &ActionOutcome) -> Result<()> {
        self.record_activity(day, action, outcome.xp_gained, outcome.profile.level)
    }
}

/// Profile kept as a single JSON document.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open_default() -> Self {
        Self::new(data_dir().join("profile.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProfileStore for JsonFileStore {
    fn load(&self) -> Result<UserProfile> {
        if !self.path.exists() {
            return Ok(UserProfile::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        check_level(serde_json::from_str(&content)?)
    }

    fn save(&self, profile: &UserProfile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        // write then rename so a crash never leaves half a profile
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(profile)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, d).unwrap()
    }

    #[test]
    fn test_fresh_db_has_default_profile() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.load().unwrap(), UserProfile::default());
    }

    #[test]
    fn test_profile_roundtrip() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut profile = store.load().unwrap();
        profile.xp = 120;
        profile.level = 6;
        profile.streak_count = 3;
        profile.longest_streak = 4;
        profile.last_activity_date = Some(date(19));
        profile.mood = Mood::Excited;
        store.save(&profile).unwrap();

        assert_eq!(store.load().unwrap(), profile);
    }

    #[test]
    fn test_reopen_keeps_single_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("snapchef.db");
        {
            let store = SqliteStore::open(&path).unwrap();
            let profile = UserProfile {
                xp: 30,
                level: 3,
                ..UserProfile::default()
            };
            store.save(&profile).unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.xp, 30);
        assert_eq!(loaded.level, 3);
    }

    #[test]
    fn test_garbage_date_and_mood_fall_back() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .conn
            .execute(
                "UPDATE user_profile SET last_activity_date = 'yesterday', mood = 'grumpy' WHERE id = 1",
                [],
            )
            .unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.last_activity_date, None);
        assert_eq!(loaded.mood, Mood::Happy);
    }

    #[test]
    fn test_activity_stats() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.record_activity(date(19), Action::ScanCompleted, 5, 1).unwrap();
        store.record_activity(date(19), Action::RecipeSaved, 35, 3).unwrap();
        store.record_activity(date(19), Action::AppOpened, 0, 3).unwrap();
        store.record_activity(date(20), Action::ShareCardExported, 20, 4).unwrap();

        assert_eq!(store.action_count_on(date(19)).unwrap(), 2);
        assert_eq!(store.action_count_on(date(21)).unwrap(), 0);
        assert_eq!(store.total_stats().unwrap(), (3, 60));
        assert_eq!(store.last_action().unwrap(), Some(Action::ShareCardExported));
    }

    #[test]
    fn test_empty_log() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.total_stats().unwrap(), (0, 0));
        assert_eq!(store.last_action().unwrap(), None);
    }

    #[test]
    fn test_json_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("profile.json"));
        assert_eq!(store.load().unwrap(), UserProfile::default());

        let profile = UserProfile {
            level: 2,
            xp: 12,
            streak_count: 2,
            longest_streak: 2,
            last_activity_date: Some(date(3)),
            mood: Mood::Proud,
        };
        store.save(&profile).unwrap();
        assert_eq!(store.load().unwrap(), profile);
        assert!(!dir.path().join("profile.json.tmp").exists());
    }

    #[test]
    fn test_level_zero_rejected_on_load() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .conn
            .execute("UPDATE user_profile SET level = 0 WHERE id = 1", [])
            .unwrap();
        assert!(matches!(
            store.load(),
            Err(MascotError::OutOfRange { level: 0 })
        ));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        let profile = UserProfile {
            level: 0,
            ..UserProfile::default()
        };
        std::fs::write(&path, serde_json::to_string(&profile).unwrap()).unwrap();
        assert!(matches!(
            JsonFileStore::new(path).load(),
            Err(MascotError::OutOfRange { level: 0 })
        ));
    }

    #[test]
    fn test_negative_xp_sum_is_an_error() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .conn
            .execute(
                "INSERT INTO activity_log (day, action, xp_gained, level_after) VALUES ('2026-02-19', 'scan_completed', -5, 1)",
                [],
            )
            .unwrap();
        assert!(matches!(store.total_stats(), Err(MascotError::XpOverflow)));
    }

    #[test]
    fn test_json_store_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = JsonFileStore::new(path).load().unwrap_err();
        assert!(matches!(err, MascotError::Json(_)));
    }
}
