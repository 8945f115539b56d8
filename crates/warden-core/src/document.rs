//! ACL documents and permission entries.
//!
//! An [`AclDocument`] is the complete permission record for a single
//! model. It holds an ordered list of [`PermissionEntry`] values, one per
//! permission name. All mutation goes through methods that keep the
//! structural invariants: entry names stay unique, user sets stay
//! duplicate-free.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The users holding one permission on one model.
///
/// `users` is conceptually a set. It is stored as an ordered sequence so
/// the persisted form is stable, but it must never contain the same user
/// id twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionEntry {
    /// Permission identifier, e.g. `"view"` or `"amend"`.
    pub name: String,

    /// User ids holding this permission.
    pub users: Vec<String>,
}

impl PermissionEntry {
    /// Create an empty entry for a permission name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            users: Vec::new(),
        }
    }

    /// Whether the given user holds this permission.
    pub fn contains(&self, user: &str) -> bool {
        self.users.iter().any(|u| u == user)
    }

    /// Add a user, keeping the set duplicate-free.
    ///
    /// Returns `true` if the user was added, `false` if already present.
    pub fn add_user(&mut self, user: &str) -> bool {
        if self.contains(user) {
            return false;
        }
        self.users.push(user.to_string());
        true
    }

    /// Remove a user if present.
    ///
    /// Returns `true` if the user was removed.
    pub fn remove_user(&mut self, user: &str) -> bool {
        let before = self.users.len();
        self.users.retain(|u| u != user);
        self.users.len() != before
    }
}

/// The permission record for exactly one model.
///
/// `id` is the model identifier and doubles as the document's primary
/// key. It is caller-supplied and opaque; documents are never assigned
/// generated ids. `created` is set once when the document is first
/// synthesized and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AclDocument {
    /// Model identifier, also the primary key.
    pub id: String,

    /// Permission entries, unique by name, in grant order.
    pub acl: Vec<PermissionEntry>,

    /// Creation timestamp. Immutable after creation.
    pub created: DateTime<Utc>,
}

impl AclDocument {
    /// Create an empty document for a model, stamped with the current time.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            acl: Vec::new(),
            created: Utc::now(),
        }
    }

    /// Look up a permission entry by name.
    pub fn entry(&self, permission: &str) -> Option<&PermissionEntry> {
        self.acl.iter().find(|e| e.name == permission)
    }

    /// Look up a permission entry by name, creating it if absent.
    ///
    /// Lookup-or-create is keyed by name, so a document can never grow two
    /// entries for the same permission.
    pub fn entry_or_insert(&mut self, permission: &str) -> &mut PermissionEntry {
        let idx = match self.acl.iter().position(|e| e.name == permission) {
            Some(idx) => idx,
            None => {
                self.acl.push(PermissionEntry::new(permission));
                self.acl.len() - 1
            }
        };
        &mut self.acl[idx]
    }

    /// Whether the user holds the permission on this model.
    pub fn allows(&self, permission: &str, user: &str) -> bool {
        self.entry(permission).is_some_and(|e| e.contains(user))
    }

    /// Grant a permission to a user.
    ///
    /// Idempotent: granting an already-held permission changes nothing.
    /// Returns `true` if the document changed.
    pub fn grant(&mut self, permission: &str, user: &str) -> bool {
        self.entry_or_insert(permission).add_user(user)
    }

    /// Revoke a permission from a user.
    ///
    /// A no-op when the entry or the membership does not exist. The entry
    /// itself is kept even when its user set becomes empty. Returns `true`
    /// if the document changed.
    pub fn revoke(&mut self, permission: &str, user: &str) -> bool {
        self.acl
            .iter_mut()
            .find(|e| e.name == permission)
            .is_some_and(|e| e.remove_user(user))
    }

    /// Names of every permission the user holds, in document order.
    pub fn permissions_for(&self, user: &str) -> Vec<String> {
        self.acl
            .iter()
            .filter(|e| e.contains(user))
            .map(|e| e.name.clone())
            .collect()
    }
}
