//! # Warden Core
//!
//! Pure data model for the Warden ACL engine: documents, permission
//! entries, and invariant validation.
//!
//! This crate contains no I/O, no storage, no async. It is pure
//! computation over permission records.
//!
//! ## Key Types
//!
//! - [`AclDocument`] - The full permission record for one model
//! - [`PermissionEntry`] - One permission's grantees on one model
//!
//! ## Invariants
//!
//! Two structural invariants hold for every well-formed document:
//!
//! 1. Permission names within one document are unique.
//! 2. A permission entry never lists the same user twice.
//!
//! The mutation methods on [`AclDocument`] preserve both; the
//! [`validation`] module checks them on records coming from storage.

pub mod document;
pub mod error;
pub mod validation;

pub use document::{AclDocument, PermissionEntry};
pub use error::ValidationError;
pub use validation::validate_document;
