use thiserror::Error;

/// Errors surfaced by the progression engine and its stores.
#[derive(Debug, Error)]
pub enum MascotError {
    /// XP awards must be non-negative.
    #[error("invalid XP amount: {amount} (must be >= 0)")]
    InvalidArgument { amount: i64 },

    /// Levels start at 1.
    #[error("level {level} is out of range (levels start at 1)")]
    OutOfRange { level: u32 },

    #[error("XP total overflowed")]
    XpOverflow,

    #[error("invalid engine config: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MascotError>;
