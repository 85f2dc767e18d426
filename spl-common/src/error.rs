//! Common error types for the SPL ingest workspace

use thiserror::Error;

/// Common result type for ingest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the ingest pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// Store operation error (wraps sqlx::Error)
    #[error("Store error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required scope was absent for the current operation
    #[error("Missing context: {0}")]
    MissingContext(String),

    /// An identifier in the source document failed to parse
    #[error("Malformed reference: {0}")]
    MalformedReference(String),

    /// Requested record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
