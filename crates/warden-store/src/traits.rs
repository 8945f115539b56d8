//! Repository trait: the abstract interface for ACL document persistence.
//!
//! This trait is the only capability the ACL engine requires from its
//! backing store. Implementations include SQLite (primary) and in-memory
//! (for tests and transient use).

use async_trait::async_trait;

use warden_core::AclDocument;

use crate::error::Result;

/// Filter shapes accepted by [`Repository::get_all`].
///
/// The engine's bulk grant/revoke path fetches every document whose id is
/// in the operation's model set with a single `IdIn` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentFilter {
    /// Every document in the store.
    All,
    /// Documents whose id is one of the given set.
    IdIn(Vec<String>),
}

impl DocumentFilter {
    /// Build an `IdIn` filter from anything yielding id-like strings.
    pub fn ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::IdIn(ids.into_iter().map(Into::into).collect())
    }

    /// Whether a document id passes this filter.
    pub fn matches(&self, id: &str) -> bool {
        match self {
            Self::All => true,
            Self::IdIn(ids) => ids.iter().any(|i| i == id),
        }
    }
}

/// The Repository trait: async interface for ACL document persistence.
///
/// # Design Notes
///
/// - **Absence is valid state**: `get_by_id` on an unknown id returns
///   `Ok(None)`. A model with no document simply has no permissions.
/// - **`create` is insert-only**: an id collision is an error. Model ids
///   are caller-chosen, so collisions mean two writers raced to create
///   the same document.
/// - **`save` is upsert-by-id**: the full document content at that id is
///   replaced.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Point lookup by document id.
    async fn get_by_id(&self, id: &str) -> Result<Option<AclDocument>>;

    /// Bulk lookup. See [`DocumentFilter`] for the supported shapes.
    async fn get_all(&self, filter: DocumentFilter) -> Result<Vec<AclDocument>>;

    /// Insert a new document. Fails with [`StoreError::AlreadyExists`] if
    /// a document with the same id is present.
    ///
    /// [`StoreError::AlreadyExists`]: crate::error::StoreError::AlreadyExists
    async fn create(&self, doc: &AclDocument) -> Result<AclDocument>;

    /// Upsert a document, replacing the full content at its id.
    async fn save(&self, doc: &AclDocument) -> Result<AclDocument>;

    /// Delete a document by id. Returns `true` if something was removed.
    async fn delete(&self, id: &str) -> Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_matches() {
        assert!(DocumentFilter::All.matches("anything"));

        let filter = DocumentFilter::ids(["a", "b"]);
        assert!(filter.matches("a"));
        assert!(filter.matches("b"));
        assert!(!filter.matches("c"));
    }
}
