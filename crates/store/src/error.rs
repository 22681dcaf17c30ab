//! Entity store error types.

use thiserror::Error;

/// Entity store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("unresolved reference: {0}")]
    ForeignKey(String),

    #[error("insufficient stock: {available} on hand, adjustment {delta}")]
    InsufficientStock { available: i64, delta: i64 },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Constraint violations recognizable from a database error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DbViolation {
    Unique,
    ForeignKey,
}

/// Sniff the constraint kind out of a database error message.
///
/// SQLite reports "UNIQUE constraint failed" / "FOREIGN KEY constraint
/// failed"; PostgreSQL reports "duplicate key value violates unique
/// constraint" / "violates foreign key constraint".
pub(crate) fn db_violation(err: &sqlx::Error) -> Option<DbViolation> {
    let sqlx::Error::Database(db_err) = err else {
        return None;
    };
    let msg = db_err.message();
    if msg.contains("UNIQUE constraint") || msg.contains("duplicate key") {
        return Some(DbViolation::Unique);
    }
    if msg.contains("FOREIGN KEY constraint") || msg.contains("foreign key constraint") {
        return Some(DbViolation::ForeignKey);
    }
    None
}
