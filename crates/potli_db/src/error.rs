//! Error types for the database client

use potli_common::PotliError;
use thiserror::Error;

/// Errors that can occur when working with the database client
#[derive(Debug, Error)]
pub enum DbError {
    /// Error from SQLx
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    /// Error with the database configuration
    #[error("Database configuration error: {0}")]
    ConfigError(String),

    /// Error with database URL parsing
    #[error("Database URL error: {0}")]
    UrlError(String),

    /// Error with database pool creation
    #[error("Database pool error: {0}")]
    PoolError(String),

    /// Error with database query
    #[error("Database query error: {0}")]
    QueryError(String),

    /// A stored column could not be decoded into its Rust type
    #[error("Database decode error: {0}")]
    DecodeError(String),

    /// Error with database transaction
    #[error("Database transaction error: {0}")]
    TransactionError(String),

    /// The row to update does not exist
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Unique constraint violated
    #[error("Duplicate record: {0}")]
    Duplicate(String),
}

impl From<DbError> for PotliError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(msg) => PotliError::NotFoundError(msg),
            DbError::Duplicate(msg) => PotliError::ConflictError(msg),
            DbError::ConfigError(msg) => PotliError::ConfigError(msg),
            other => PotliError::DatabaseError(other.to_string()),
        }
    }
}
