//! Proptest generators for property-based testing.

use proptest::prelude::*;

use warden_core::AclDocument;

/// Generate a permission name.
pub fn permission_name() -> impl Strategy<Value = String> {
    "[a-z]{3,10}".prop_map(String::from)
}

/// Generate a user identifier.
pub fn user_id() -> impl Strategy<Value = String> {
    "[0-9]{4,9}".prop_map(String::from)
}

/// Generate a model identifier (non-empty, dotted-name style).
pub fn model_id() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,8}(\\.[a-z0-9]{1,8}){0,3}".prop_map(String::from)
}

/// Generate a duplicate-free set of user ids.
pub fn user_set(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set(user_id(), 0..=max)
        .prop_map(|users| users.into_iter().collect())
}

/// Generate a well-formed ACL document.
///
/// Entries are built through the document's own mutation methods, so
/// entry names are unique and user sets duplicate-free by construction.
pub fn acl_document() -> impl Strategy<Value = AclDocument> {
    (
        model_id(),
        prop::collection::btree_map(permission_name(), user_set(5), 0..5),
    )
        .prop_map(|(id, entries)| {
            let mut doc = AclDocument::new(id);
            for (permission, users) in entries {
                // Materialize the entry even when no users follow.
                doc.entry_or_insert(&permission);
                for user in users {
                    doc.grant(&permission, &user);
                }
            }
            doc
        })
}

/// Generate a small universe of distinct values for cross-product tests.
pub fn universe(
    strategy: impl Strategy<Value = String>,
    max: usize,
) -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set(strategy, 1..=max).prop_map(|set| set.into_iter().collect())
}
