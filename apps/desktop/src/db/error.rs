//! Database error types.

use study_core::EngineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl From<DbError> for EngineError {
    fn from(e: DbError) -> Self {
        EngineError::StorageUnavailable(e.to_string())
    }
}
