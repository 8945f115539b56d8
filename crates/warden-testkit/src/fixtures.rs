//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use warden::{Acl, MemoryStore};
use warden_core::AclDocument;
use warden_store::Repository;

/// Build a document from `(permission, users)` pairs.
///
/// Goes through the regular mutation methods, so the result always
/// satisfies the structural invariants.
pub fn document(id: &str, entries: &[(&str, &[&str])]) -> AclDocument {
    let mut doc = AclDocument::new(id);
    for (permission, users) in entries {
        for user in *users {
            doc.grant(permission, user);
        }
    }
    doc
}

/// A test fixture bundling an engine over an in-memory store.
pub struct TestFixture {
    pub acl: Acl<MemoryStore>,
}

impl TestFixture {
    /// Create a fixture over an empty store.
    pub fn new() -> Self {
        Self {
            acl: Acl::new(MemoryStore::new()),
        }
    }

    /// Create a fixture with pre-seeded documents.
    pub fn with_documents(docs: impl IntoIterator<Item = AclDocument>) -> Self {
        Self {
            acl: Acl::new(MemoryStore::with_documents(docs)),
        }
    }

    /// Insert a document directly into the backing store.
    pub async fn seed(&self, doc: AclDocument) {
        self.acl
            .store()
            .save(&doc)
            .await
            .expect("memory store save cannot fail");
    }

    /// Snapshot every document currently in the store.
    pub async fn all_documents(&self) -> Vec<AclDocument> {
        self.acl
            .store()
            .get_all(warden_store::DocumentFilter::All)
            .await
            .expect("memory store read cannot fail")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
