//! Progression engine for the SnapChef mascot.
//!
//! User actions (scanning the fridge, saving or sharing recipes) earn the
//! mascot XP, levels, a daily streak and a mood. [`ProgressionEngine`] is
//! pure: profiles go in and out by value and the current date is injected.
//! Persistence lives behind [`ProfileStore`]; [`Mascot`] wires the two
//! together for callers that want it.

pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod levels;
pub mod mascot;
pub mod models;
pub mod xp;

pub use config::EngineConfig;
pub use db::{JsonFileStore, ProfileStore, SqliteStore};
pub use engine::ProgressionEngine;
pub use error::{MascotError, Result};
pub use levels::LevelTable;
pub use mascot::Mascot;
pub use models::{Action, ActionOutcome, LevelUp, MascotStage, Mood, UserProfile};
