//! Structural validation for ACL documents.
//!
//! The mutation methods on [`AclDocument`] cannot produce a malformed
//! document, but records decoded from storage can carry anything. Storage
//! backends run this check when loading and persisting.

use std::collections::HashSet;

use crate::document::AclDocument;
use crate::error::ValidationError;

/// Check the structural invariants of a document.
///
/// - the id is non-empty
/// - permission names are unique within the document
/// - no entry lists the same user twice
pub fn validate_document(doc: &AclDocument) -> Result<(), ValidationError> {
    if doc.id.is_empty() {
        return Err(ValidationError::EmptyId);
    }

    let mut names = HashSet::new();
    for entry in &doc.acl {
        if !names.insert(entry.name.as_str()) {
            return Err(ValidationError::DuplicatePermission(entry.name.clone()));
        }

        let mut users = HashSet::new();
        for user in &entry.users {
            if !users.insert(user.as_str()) {
                return Err(ValidationError::DuplicateUser {
                    permission: entry.name.clone(),
                    user: user.clone(),
                });
            }
        }
    }

    Ok(())
}
