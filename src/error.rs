//! Crate-wide error type for accountd.

use thiserror::Error;

/// Errors produced below the HTTP boundary.
///
/// The web layer maps these onto API error codes; see `web::error`.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Query or statement failure from the active sqlx backend.
    #[error("database error: {0}")]
    Database(String),

    /// The database could not be opened or connected to.
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Uniqueness conflict, e.g. an already-registered email.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Configuration file missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Database(e.to_string())
    }
}

/// Result type alias for accountd operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
