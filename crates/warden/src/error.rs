//! Error types for the engine.
//!
//! These never cross the public query/mutation boundary: the engine
//! degrades every failure to its negative default (`false`, empty, or
//! `None`). They exist for the internal read/write plumbing and for
//! embedders driving the repository directly.

use thiserror::Error;

use warden_store::StoreError;

/// Errors that can occur inside engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
