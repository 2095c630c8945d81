use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// A stored or supplied record that cannot be turned into a domain value.
    #[error("Malformed record: {0}")]
    Malformed(String),

    #[error("Date out of range: {0}")]
    DateOutOfRange(String),

    #[error("A log for {day} already exists ({existing}), update it instead")]
    DuplicateDay { day: NaiveDate, existing: Uuid },

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
