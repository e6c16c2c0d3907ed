//! Common error types for AdLens

use thiserror::Error;

/// Common result type for AdLens operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the AdLens crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A persisted collection does not exist yet (fresh deployment).
    /// Callers that can produce a zero-filled result recover from this
    /// instead of surfacing it.
    #[error("Schema missing: {0}")]
    SchemaMissing(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
