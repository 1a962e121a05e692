//! Store-level errors.

use thiserror::Error;

/// Errors that can occur in habit store operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Habit {0} not found")]
    HabitNotFound(i64),

    #[error("Completion {0} not found")]
    CompletionNotFound(i64),

    #[error("Invalid input: {0}")]
    Invalid(String),

    #[error("Corrupt row: {0}")]
    Corrupt(String),
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
