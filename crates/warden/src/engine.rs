//! The ACL engine: fail-closed queries and bulk cross-product mutation.
//!
//! Every operation is a single read-compute-write cycle over documents
//! fetched fresh from the repository. The engine holds no state between
//! calls and never caches documents.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future;

use warden_core::AclDocument;
use warden_store::{DocumentFilter, Repository};

use crate::error::Result;

/// The ACL engine.
///
/// Generic over the backing [`Repository`]; the store is injected at
/// construction and shared behind an `Arc`, so cloning an `Acl` is cheap
/// and clones operate on the same store.
///
/// Queries (`user_can`, `filter`, `permissions`) fail closed: absence of
/// a record and repository faults both read as "not permitted", and no
/// error crosses the public boundary. Mutations (`grant`, `revoke`)
/// report coarse success - `true` only when every write landed.
pub struct Acl<S: Repository> {
    store: Arc<S>,
}

impl<S: Repository> Clone for Acl<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: Repository> Acl<S> {
    /// Create an engine over the given repository.
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Whether `user` holds `permission` on `model`.
    ///
    /// Returns `false` when the model has no document, the document has no
    /// entry for the permission, the entry does not list the user, or the
    /// repository read fails.
    pub async fn user_can(&self, permission: &str, model: &str, user: &str) -> bool {
        match self.store.get_by_id(model).await {
            Ok(Some(doc)) => doc.allows(permission, user),
            Ok(None) => false,
            Err(err) => {
                tracing::debug!(model, error = %err, "read failed, treating as not permitted");
                false
            }
        }
    }

    /// Names of every permission `user` holds on `model`, in document
    /// order. Empty when the model has no document or the read fails.
    pub async fn permissions(&self, user: &str, model: &str) -> Vec<String> {
        match self.store.get_by_id(model).await {
            Ok(Some(doc)) => doc.permissions_for(user),
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::debug!(model, error = %err, "read failed, treating as no permissions");
                Vec::new()
            }
        }
    }

    /// Reduce `models` to those on which `user` holds `permission`.
    ///
    /// Candidates are checked concurrently and independently; one model's
    /// read failure only drops that model. The result preserves the input
    /// order of the surviving candidates.
    pub async fn filter(&self, permission: &str, models: &[&str], user: &str) -> Vec<String> {
        let checks = models.iter().map(|m| self.user_can(permission, m, user));
        let verdicts = future::join_all(checks).await;

        models
            .iter()
            .zip(verdicts)
            .filter_map(|(m, permitted)| permitted.then(|| (*m).to_string()))
            .collect()
    }

    /// Single-candidate form of [`filter`](Self::filter): the model if
    /// permitted, else `None`.
    pub async fn filter_one(&self, permission: &str, model: &str, user: &str) -> Option<String> {
        self.user_can(permission, model, user)
            .await
            .then(|| model.to_string())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutation Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Grant every (permission, model, user) combination of the inputs.
    ///
    /// Inputs are treated as sets; duplicates are ignored. Models without
    /// a document get one synthesized (its `created` stamped now), and
    /// already-held grants are no-ops. Writes are issued concurrently and the
    /// outcome is aggregated after all complete: `true` only if every
    /// write succeeded. There is no partial-success report and no rollback
    /// of writes that did land.
    pub async fn grant(&self, permissions: &[&str], models: &[&str], users: &[&str]) -> bool {
        match self.apply_grant(permissions, models, users).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "grant failed");
                false
            }
        }
    }

    /// Grant a single (permission, model, user) triple.
    pub async fn grant_one(&self, permission: &str, model: &str, user: &str) -> bool {
        self.grant(&[permission], &[model], &[user]).await
    }

    /// Revoke every (permission, model, user) combination of the inputs.
    ///
    /// Never creates documents and never removes an entry, even when its
    /// user set becomes empty. Revoking something never granted is a
    /// no-op that still succeeds. Only documents actually changed are
    /// written back; `true` only if every write succeeded.
    pub async fn revoke(&self, permissions: &[&str], models: &[&str], users: &[&str]) -> bool {
        match self.apply_revoke(permissions, models, users).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "revoke failed");
                false
            }
        }
    }

    /// Revoke a single (permission, model, user) triple.
    pub async fn revoke_one(&self, permission: &str, model: &str, user: &str) -> bool {
        self.revoke(&[permission], &[model], &[user]).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    async fn apply_grant(
        &self,
        permissions: &[&str],
        models: &[&str],
        users: &[&str],
    ) -> Result<()> {
        let permissions = dedup(permissions);
        let models = dedup(models);
        let users = dedup(users);

        // One bulk fetch for every model in the operation.
        let existing = self
            .store
            .get_all(DocumentFilter::ids(models.iter().copied()))
            .await?;

        let mut found = HashSet::new();
        let mut to_save = Vec::new();
        for mut doc in existing {
            found.insert(doc.id.clone());
            let mut changed = false;
            for permission in &permissions {
                for user in &users {
                    changed |= doc.grant(permission, user);
                }
            }
            if changed {
                to_save.push(doc);
            }
        }

        // Models with no document yet get one, created lazily here.
        let mut to_create = Vec::new();
        for model in &models {
            if found.contains(*model) {
                continue;
            }
            let mut doc = AclDocument::new(*model);
            for permission in &permissions {
                for user in &users {
                    doc.grant(permission, user);
                }
            }
            to_create.push(doc);
        }

        self.persist(&to_save, &to_create).await
    }

    async fn apply_revoke(
        &self,
        permissions: &[&str],
        models: &[&str],
        users: &[&str],
    ) -> Result<()> {
        let permissions = dedup(permissions);
        let models = dedup(models);
        let users = dedup(users);

        let existing = self
            .store
            .get_all(DocumentFilter::ids(models.iter().copied()))
            .await?;

        let mut to_save = Vec::new();
        for mut doc in existing {
            let mut changed = false;
            for permission in &permissions {
                for user in &users {
                    changed |= doc.revoke(permission, user);
                }
            }
            if changed {
                to_save.push(doc);
            }
        }

        self.persist(&to_save, &[]).await
    }

    /// Issue all writes concurrently; aggregate outcomes after the join.
    ///
    /// Every write runs to completion regardless of its siblings - the
    /// first error is reported only once all outcomes are known.
    async fn persist(&self, to_save: &[AclDocument], to_create: &[AclDocument]) -> Result<()> {
        let saves = future::join_all(to_save.iter().map(|d| self.store.save(d)));
        let creates = future::join_all(to_create.iter().map(|d| self.store.create(d)));
        let (saved, created) = future::join(saves, creates).await;

        for outcome in saved.into_iter().chain(created) {
            outcome?;
        }
        Ok(())
    }
}

/// Drop duplicate values, keeping first occurrences in order.
fn dedup<'a>(values: &[&'a str]) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    values
        .iter()
        .filter(|v| seen.insert(**v))
        .copied()
        .collect()
}
