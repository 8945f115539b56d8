//! # Warden Store
//!
//! Storage abstraction for the Warden ACL engine. Provides a trait-based
//! repository interface for ACL documents with SQLite and in-memory
//! implementations.
//!
//! ## Overview
//!
//! The store module abstracts document persistence behind the
//! [`Repository`] trait, keeping the engine storage-agnostic. The
//! persistent implementation is [`SqliteStore`]; [`MemoryStore`] serves
//! tests and transient embeddings.
//!
//! ## Key Types
//!
//! - [`Repository`] - The async trait for all document operations
//! - [`DocumentFilter`] - Bulk-lookup filter shapes for `get_all`
//! - [`SqliteStore`] - SQLite-backed persistent storage
//! - [`MemoryStore`] - In-memory storage
//!
//! ## Usage
//!
//! ```rust,no_run
//! use warden_store::{Repository, SqliteStore};
//! use warden_core::AclDocument;
//!
//! async fn example() {
//!     let store = SqliteStore::open("warden.db").unwrap();
//!
//!     let doc = AclDocument::new("com.example.report.1");
//!     store.create(&doc).await.unwrap();
//!
//!     let loaded = store.get_by_id("com.example.report.1").await.unwrap();
//!     assert!(loaded.is_some());
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Absence is not an error**: `get_by_id` returns `Ok(None)` for
//!   unknown ids. The engine treats that as "no permissions granted".
//! - **`create` vs `save`**: `create` fails on an id collision; `save` is
//!   an upsert that replaces the full document at that id.
//! - **Validation at the boundary**: both backends reject structurally
//!   invalid documents on write and on decode from storage.

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{DocumentFilter, Repository};
