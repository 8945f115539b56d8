//! Error types for the store module.

use thiserror::Error;

use warden_core::ValidationError;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Document serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Document not found.
    #[error("document not found: {0}")]
    NotFound(String),

    /// A document with this id already exists.
    #[error("document already exists: {0}")]
    AlreadyExists(String),

    /// Document in storage violates a structural invariant.
    #[error("invalid document: {0}")]
    InvalidDocument(#[from] ValidationError),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
