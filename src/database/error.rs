//! Storage error taxonomy.
//!
//! Every store call returns [`StoreError`]; the quiz controller logs it and
//! degrades the current turn to a no-op.

use thiserror::Error;

/// Errors raised by the user and word stores and the bulk word source.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A user or word that the caller required is absent.
    #[error("{0} not found")]
    NotFound(String),

    /// An insert hit a unique constraint.
    #[error("duplicate {0}")]
    Duplicate(String),

    /// The connection or query failed.
    #[error("storage unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    /// The bulk word list is missing or unreadable.
    #[error("bulk word source unusable: {0}")]
    MalformedBulkSource(String),
}

impl StoreError {
    /// Maps a sqlx error raised by an insert, turning unique violations into
    /// [`StoreError::Duplicate`].
    pub fn from_insert(error: sqlx::Error, what: &str) -> Self {
        match &error {
            sqlx::Error::Database(db_error) if is_unique_violation(db_error.code().as_deref()) => {
                StoreError::Duplicate(what.to_string())
            }
            _ => StoreError::Unavailable(error),
        }
    }

    /// Short label used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::NotFound(_) => "not_found",
            StoreError::Duplicate(_) => "duplicate",
            StoreError::Unavailable(_) => "unavailable",
            StoreError::MalformedBulkSource(_) => "malformed_bulk_source",
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => StoreError::NotFound("row".to_string()),
            other => StoreError::Unavailable(other),
        }
    }
}

/// SQLite extended result codes for unique and primary key violations.
const SQLITE_CONSTRAINT_UNIQUE: &str = "2067";
const SQLITE_CONSTRAINT_PRIMARYKEY: &str = "1555";

fn is_unique_violation(code: Option<&str>) -> bool {
    matches!(code, Some(SQLITE_CONSTRAINT_UNIQUE | SQLITE_CONSTRAINT_PRIMARYKEY))
}
