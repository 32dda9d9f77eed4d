//! Error types for the service.
//!
//! [`InsightsError`] is the top-level error; its variant decides the HTTP status.

use storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightsError {
    /// Malformed webhook payload or request body. Nothing was written.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StorageError> for InsightsError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(what) => InsightsError::NotFound(what),
            other => InsightsError::Database(other.to_string()),
        }
    }
}

impl From<sqlx::Error> for InsightsError {
    fn from(err: sqlx::Error) -> Self {
        StorageError::from(err).into()
    }
}

pub type Result<T> = std::result::Result<T, InsightsError>;
