//! Error types for the core data model.

use thiserror::Error;

/// Structural violations in a permission document.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("document id is empty")]
    EmptyId,

    #[error("duplicate permission entry: {0}")]
    DuplicatePermission(String),

    #[error("duplicate user {user} in permission entry {permission}")]
    DuplicateUser { permission: String, user: String },
}
