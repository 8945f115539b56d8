//! SQLite implementation of the Repository trait.
//!
//! This is the primary storage backend for the Warden ACL engine. It uses
//! rusqlite with bundled SQLite behind a connection mutex. Documents are
//! stored one row per model, with the permission entries held as the
//! wire-format JSON array.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use warden_core::{validate_document, AclDocument, PermissionEntry};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{DocumentFilter, Repository};

/// Environment variable naming the database file for [`SqliteStore::open_from_env`].
pub const DB_PATH_ENV: &str = "WARDEN_DB_PATH";

/// Default database file when [`DB_PATH_ENV`] is unset.
pub const DEFAULT_DB_PATH: &str = "warden.db";

/// SQLite-based document store.
///
/// Thread-safe via internal Mutex. Connection setup runs migrations, so
/// opening a fresh file yields a ready-to-use schema.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open the database named by the `WARDEN_DB_PATH` environment
    /// variable, falling back to `warden.db`.
    pub fn open_from_env() -> Result<Self> {
        let path = std::env::var(DB_PATH_ENV).unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
        Self::open(path)
    }

    /// Execute a blocking operation on the connection.
    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|e| {
            StoreError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
                Some(format!("mutex poisoned: {}", e)),
            ))
        })?;
        f(&conn)
    }
}

/// Decode one `acl_documents` row into a validated document.
fn decode_row(id: String, created: String, acl: String) -> Result<AclDocument> {
    let created: DateTime<Utc> = DateTime::parse_from_rfc3339(&created)
        .map_err(|e| StoreError::Serialization(format!("bad created timestamp: {}", e)))?
        .with_timezone(&Utc);

    let acl: Vec<PermissionEntry> = serde_json::from_str(&acl)
        .map_err(|e| StoreError::Serialization(format!("bad acl column: {}", e)))?;

    let doc = AclDocument { id, acl, created };
    validate_document(&doc)?;
    Ok(doc)
}

/// Encode a document's entries as the JSON stored in the `acl` column.
fn encode_acl(doc: &AclDocument) -> Result<String> {
    serde_json::to_string(&doc.acl).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

#[async_trait]
impl Repository for SqliteStore {
    async fn get_by_id(&self, id: &str) -> Result<Option<AclDocument>> {
        let row = self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, created, acl FROM acl_documents WHERE id = ?1",
                params![id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()
            .map_err(StoreError::from)
        })?;

        match row {
            Some((id, created, acl)) => Ok(Some(decode_row(id, created, acl)?)),
            None => Ok(None),
        }
    }

    async fn get_all(&self, filter: DocumentFilter) -> Result<Vec<AclDocument>> {
        let rows: Vec<(String, String, String)> = match filter {
            DocumentFilter::All => self.with_conn(|conn| {
                let mut stmt = conn.prepare("SELECT id, created, acl FROM acl_documents")?;
                let rows = stmt
                    .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })?,
            DocumentFilter::IdIn(ids) => {
                if ids.is_empty() {
                    return Ok(Vec::new());
                }
                self.with_conn(|conn| {
                    let placeholders = vec!["?"; ids.len()].join(", ");
                    let sql = format!(
                        "SELECT id, created, acl FROM acl_documents WHERE id IN ({})",
                        placeholders
                    );
                    let mut stmt = conn.prepare(&sql)?;
                    let rows = stmt
                        .query_map(rusqlite::params_from_iter(ids.iter()), |row| {
                            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
                        })?
                        .collect::<rusqlite::Result<Vec<_>>>()?;
                    Ok(rows)
                })?
            }
        };

        rows.into_iter()
            .map(|(id, created, acl)| decode_row(id, created, acl))
            .collect()
    }

    async fn create(&self, doc: &AclDocument) -> Result<AclDocument> {
        validate_document(doc)?;
        let acl = encode_acl(doc)?;

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO acl_documents (id, created, acl) VALUES (?1, ?2, ?3)",
                params![doc.id, doc.created.to_rfc3339(), acl],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::AlreadyExists(doc.id.clone())
                } else {
                    StoreError::Database(e)
                }
            })?;
            Ok(())
        })?;

        Ok(doc.clone())
    }

    async fn save(&self, doc: &AclDocument) -> Result<AclDocument> {
        validate_document(doc)?;
        let acl = encode_acl(doc)?;

        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO acl_documents (id, created, acl) VALUES (?1, ?2, ?3)",
                params![doc.id, doc.created.to_rfc3339(), acl],
            )?;
            Ok(())
        })?;

        Ok(doc.clone())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let removed = self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM acl_documents WHERE id = ?1", params![id])?;
            Ok(n > 0)
        })?;
        Ok(removed)
    }
}
