//! # Warden Testkit
//!
//! Testing utilities for the Warden ACL engine.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: Helper structs for setting up engine-plus-store test
//!   scenarios without boilerplate
//! - **Generators**: Proptest strategies for property-based testing over
//!   well-formed documents
//!
//! ## Test Fixtures
//!
//! Quickly set up test scenarios:
//!
//! ```rust,no_run
//! use warden_testkit::fixtures::{document, TestFixture};
//!
//! async fn example() {
//!     let fixture = TestFixture::with_documents([
//!         document("report.1", &[("view", &["alice", "bob"])]),
//!     ]);
//!     assert!(fixture.acl.user_can("view", "report.1", "alice").await);
//! }
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use warden_testkit::generators::acl_document;
//!
//! proptest! {
//!     #[test]
//!     fn documents_are_well_formed(doc in acl_document()) {
//!         prop_assert!(warden_core::validate_document(&doc).is_ok());
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{document, TestFixture};
