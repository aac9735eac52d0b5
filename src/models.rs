use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Mascot mood shown next to the chef.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Excited,
    Proud,
    Sleepy,
    Curious,
    #[default]
    Happy,
}

impl Mood {
    pub fn label(&self) -> &'static str {
        match self {
            Mood::Excited => "Excited",
            Mood::Proud => "Proud",
            Mood::Sleepy => "Sleepy",
            Mood::Curious => "Curious",
            Mood::Happy => "Happy",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Excited => "excited",
            Mood::Proud => "proud",
            Mood::Sleepy => "sleepy",
            Mood::Curious => "curious",
            Mood::Happy => "happy",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "excited" => Some(Mood::Excited),
            "proud" => Some(Mood::Proud),
            "sleepy" => Some(Mood::Sleepy),
            "curious" => Some(Mood::Curious),
            "happy" => Some(Mood::Happy),
            _ => None,
        }
    }
}

/// User actions the mascot reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ScanCompleted,
    RecipeSaved,
    RecipeOpened,
    ShareCardGenerated,
    ShareCardExported,
    /// Observes time away; never counts as activity.
    AppOpened,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::ScanCompleted,
        Action::RecipeSaved,
        Action::RecipeOpened,
        Action::ShareCardGenerated,
        Action::ShareCardExported,
        Action::AppOpened,
    ];

    /// Base XP reward, before any streak bonus.
    pub fn base_xp(&self) -> u64 {
        match self {
            Action::ScanCompleted => 5,
            Action::RecipeSaved => 10,
            Action::RecipeOpened => 5,
            Action::ShareCardGenerated => 15,
            Action::ShareCardExported => 20,
            Action::AppOpened => 0,
        }
    }

    /// Mood set as soon as the action fires; later stages may overwrite it.
    pub fn mood_hint(&self) -> Option<Mood> {
        match self {
            Action::ScanCompleted => Some(Mood::Happy),
            Action::RecipeSaved | Action::ShareCardExported => Some(Mood::Proud),
            Action::RecipeOpened | Action::ShareCardGenerated | Action::AppOpened => None,
        }
    }

    pub fn counts_as_activity(&self) -> bool {
        !matches!(self, Action::AppOpened)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::ScanCompleted => "scan_completed",
            Action::RecipeSaved => "recipe_saved",
            Action::RecipeOpened => "recipe_opened",
            Action::ShareCardGenerated => "share_card_generated",
            Action::ShareCardExported => "share_card_exported",
            Action::AppOpened => "app_opened",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Action::ALL.into_iter().find(|a| a.as_str() == s)
    }
}

/// Persisted mascot progression for the single local user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub level: u32,
    pub xp: u64,
    pub streak_count: u32,
    #[serde(default)]
    pub longest_streak: u32,
    pub last_activity_date: Option<NaiveDate>,
    #[serde(default)]
    pub mood: Mood,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0,
            streak_count: 0,
            longest_streak: 0,
            last_activity_date: None,
            mood: Mood::Happy,
        }
    }
}

impl UserProfile {
    pub fn stage(&self) -> MascotStage {
        MascotStage::for_level(self.level)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MascotStage {
    BabyChef,
    ApprenticeChef,
    MasterChef,
}

impl MascotStage {
    pub fn for_level(level: u32) -> Self {
        match level {
            0..=3 => MascotStage::BabyChef,
            4..=7 => MascotStage::ApprenticeChef,
            _ => MascotStage::MasterChef,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MascotStage::BabyChef => "Baby Chef",
            MascotStage::ApprenticeChef => "Apprentice Chef",
            MascotStage::MasterChef => "Master Chef",
        }
    }
}

/// A level transition produced by a single resolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUp {
    pub from: u32,
    pub to: u32,
}

/// Result of dispatching one action through the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub profile: UserProfile,
    pub mood: Mood,
    /// Total XP awarded, streak bonus included.
    pub xp_gained: u64,
    pub streak_bonus: u64,
    pub level_up: Option<LevelUp>,
}
