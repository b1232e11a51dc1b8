//! SQLite database module for papershelf
//!
//! Owns the durable representation: `Settings`, `Tags`, `Papers`,
//! `PaperPaths` and the `PaperTags` association. Every find-or-create
//! primitive is idempotent; a uniqueness violation on a natural key is
//! treated as "already exists" and answered with a lookup.

mod papers;
mod scan;
mod schema;
mod settings;
mod tags;

use crate::error::{Result, ShelfError};
use crate::map_db_err;
use rusqlite::{Connection, ErrorCode, OptionalExtension};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub use schema::{create_schema, CURRENT_SCHEMA_VERSION};

pub type PaperId = i64;
pub type TagId = i64;

/// A logical paper, identified by its file name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paper {
    pub id: PaperId,
    pub name: String,
}

/// One row of the cache warm-up scan.
///
/// `tag` is `None` for paths whose paper carries no tags yet; those rows
/// still tell the cache which paths belong to which paper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagAssociation {
    pub paper_id: PaperId,
    pub path: String,
    pub tag: Option<String>,
}

/// Tag with the number of papers carrying it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagUsage {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub papers: i64,
}

/// Paper located on a device, with its tag names sorted case-insensitively
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DevicePaper {
    pub id: PaperId,
    pub name: String,
    pub tags: Vec<String>,
}

/// SQLite database for papershelf
#[derive(Debug)]
pub struct Database {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Database {
    /// Open or create the database file at the given path
    #[tracing::instrument(skip(db_path), fields(db_path = %db_path.display()))]
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)
            .map_err(|e| ShelfError::io_operation("open database", db_path.display(), e))?;

        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| ShelfError::io_operation("enable WAL on", db_path.display(), e))?;

        Self::init(conn, Some(db_path.to_path_buf()))
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| map_db_err!("open in-memory database", e))?;
        Self::init(conn, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(|e| map_db_err!("enable foreign keys", e))?;

        create_schema(&conn)
            .map_err(|e| map_db_err!("create schema", e))?;

        Ok(Database { conn, path })
    }

    /// Checkpoint and close the connection.
    ///
    /// Consumes the handle, so a database can only be closed once. Dropping a
    /// `Database` without calling this still releases the connection.
    pub fn close(self) -> Result<()> {
        if self.path.is_some() {
            if let Err(e) = self.conn.pragma_update(None, "wal_checkpoint", "TRUNCATE") {
                tracing::warn!(error = %e, "WAL checkpoint before close failed");
            }
        }

        self.conn
            .close()
            .map_err(|(_, e)| ShelfError::db_operation("close database", e))
    }

    pub fn get_paper_count(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM Papers", [], |r| r.get(0))
            .map_err(|e| map_db_err!("count papers", e))
    }

    pub fn get_path_count(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM PaperPaths", [], |r| r.get(0))
            .map_err(|e| map_db_err!("count paths", e))
    }

    pub fn get_tag_count(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM Tags", [], |r| r.get(0))
            .map_err(|e| map_db_err!("count tags", e))
    }

    pub fn get_schema_version(&self) -> Result<i32> {
        self.conn
            .pragma_query_value(None, "user_version", |r| r.get(0))
            .map_err(|e| map_db_err!("read schema version", e))
    }
}

/// Whether a database error is a uniqueness/primary-key collision
fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

/// Look up an id by natural key, inserting the key when it is unknown
fn find_or_insert_id(
    conn: &Connection,
    select_sql: &str,
    insert_sql: &str,
    key: &str,
    what: &str,
) -> Result<i64> {
    match lookup_id(conn, select_sql, key, what)? {
        Some(id) => Ok(id),
        None => insert_or_lookup_id(conn, select_sql, insert_sql, key, what),
    }
}

fn lookup_id(conn: &Connection, select_sql: &str, key: &str, what: &str) -> Result<Option<i64>> {
    conn.query_row(select_sql, [key], |r| r.get(0))
        .optional()
        .map_err(|e| ShelfError::db_operation(&format!("look up {}", what), e))
}

/// Insert a natural key and return its new id.
///
/// A constraint violation means another writer created the row after our
/// lookup; the existing id is looked up instead of failing.
fn insert_or_lookup_id(
    conn: &Connection,
    select_sql: &str,
    insert_sql: &str,
    key: &str,
    what: &str,
) -> Result<i64> {
    match conn.execute(insert_sql, [key]) {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(e) if is_constraint_violation(&e) => {
            tracing::debug!(key, what, "natural key already exists, reusing");
            lookup_id(conn, select_sql, key, what)?.ok_or_else(|| {
                ShelfError::db_operation(&format!("find {}", what), "row vanished after conflict")
            })
        }
        Err(e) => Err(ShelfError::db_operation(&format!("insert {}", what), e)),
    }
}
