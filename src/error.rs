//! Error types shared by the store, the scheduler and the HTTP layer.

/// Failure reading or writing the record store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database unavailable")]
    LockPoisoned,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Invalid grade {0}: expected 1-4")]
    InvalidGrade(u8),

    #[error("Invalid quality {0}: expected 1-5")]
    InvalidQuality(u8),

    #[error("Card {id} violates scheduling invariants: {reason}")]
    InvalidCard { id: i64, reason: String },

    #[error("A review for card {0} is already in progress")]
    ReviewInFlight(i64),

    #[error("Deck not found: {0}")]
    DeckNotFound(i64),

    #[error("Card not found: {0}")]
    CardNotFound(i64),

    #[error("Unsupported backup format version {0}")]
    UnsupportedBackupVersion(u32),

    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}

impl From<rusqlite::Error> for SchedulerError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Store(StoreError::Database(e))
    }
}
