//! # Warden
//!
//! The unified API for the Warden ACL engine - per-model permission
//! records with bulk grant/revoke and fail-closed queries.
//!
//! ## Overview
//!
//! Warden answers one question - "may this user do this to this model?" -
//! and keeps the records behind the answer. A *model* is any resource
//! identified by an opaque string id; a *permission* is a free-form name
//! like `"view"`; a *user* is an opaque identifier. Each model's grants
//! live in a single [`AclDocument`] held by a pluggable repository.
//!
//! ## Key Concepts
//!
//! - **Fail-closed**: a missing document, a missing entry, or a storage
//!   fault all read as "not permitted". Queries never surface errors.
//! - **Idempotent mutation**: granting what is already granted and
//!   revoking what was never granted are both no-ops that succeed.
//! - **Cross-product bulk operations**: [`Acl::grant`] and [`Acl::revoke`]
//!   apply every (permission, model, user) combination of their inputs.
//! - **Lazy documents**: a model gets its document the first time a grant
//!   targets it.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use warden::Acl;
//! use warden::store::SqliteStore;
//!
//! async fn example() {
//!     let store = SqliteStore::open("warden.db").unwrap();
//!     let acl = Acl::new(store);
//!
//!     acl.grant_one("view", "com.example.report.1", "alice").await;
//!
//!     assert!(acl.user_can("view", "com.example.report.1", "alice").await);
//!     assert!(!acl.user_can("amend", "com.example.report.1", "alice").await);
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `warden::core` - Data model (AclDocument, PermissionEntry)
//! - `warden::store` - Repository trait and storage backends

pub mod engine;
pub mod error;

// Re-export component crates
pub use warden_core as core;
pub use warden_store as store;

// Re-export main types for convenience
pub use engine::Acl;
pub use error::{EngineError, Result};

// Re-export commonly used component types
pub use warden_core::{AclDocument, PermissionEntry};
pub use warden_store::{DocumentFilter, MemoryStore, Repository, SqliteStore};
