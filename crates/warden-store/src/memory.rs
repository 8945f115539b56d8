//! In-memory implementation of the Repository trait.
//!
//! This is primarily for testing and transient embeddings. It has the
//! same observable semantics as SQLite but keeps everything in memory
//! with no persistence.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use warden_core::{validate_document, AclDocument};

use crate::error::{Result, StoreError};
use crate::traits::{DocumentFilter, Repository};

/// In-memory document store.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
#[derive(Default)]
pub struct MemoryStore {
    docs: RwLock<HashMap<String, AclDocument>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with documents.
    ///
    /// Later duplicates of an id replace earlier ones.
    pub fn with_documents(docs: impl IntoIterator<Item = AclDocument>) -> Self {
        let map = docs.into_iter().map(|d| (d.id.clone(), d)).collect();
        Self {
            docs: RwLock::new(map),
        }
    }

    /// Number of documents currently stored.
    pub fn len(&self) -> usize {
        self.docs.read().unwrap().len()
    }

    /// Whether the store holds no documents.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Repository for MemoryStore {
    async fn get_by_id(&self, id: &str) -> Result<Option<AclDocument>> {
        let docs = self.docs.read().unwrap();
        Ok(docs.get(id).cloned())
    }

    async fn get_all(&self, filter: DocumentFilter) -> Result<Vec<AclDocument>> {
        let docs = self.docs.read().unwrap();
        Ok(docs
            .values()
            .filter(|d| filter.matches(&d.id))
            .cloned()
            .collect())
    }

    async fn create(&self, doc: &AclDocument) -> Result<AclDocument> {
        validate_document(doc)?;

        let mut docs = self.docs.write().unwrap();
        if docs.contains_key(&doc.id) {
            return Err(StoreError::AlreadyExists(doc.id.clone()));
        }
        docs.insert(doc.id.clone(), doc.clone());
        Ok(doc.clone())
    }

    async fn save(&self, doc: &AclDocument) -> Result<AclDocument> {
        validate_document(doc)?;

        let mut docs = self.docs.write().unwrap();
        docs.insert(doc.id.clone(), doc.clone());
        Ok(doc.clone())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut docs = self.docs.write().unwrap();
        Ok(docs.remove(id).is_some())
    }
}
