//! SQLite database schema for papershelf

use rusqlite::{Connection, Result};

/// Schema version recorded in `PRAGMA user_version`
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

const SCHEMA_SQL: &str = r#"
-- UI preferences (last opened directory, ...)
CREATE TABLE IF NOT EXISTS Settings (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
);

-- Tags, globally unique by (case-sensitive) name
CREATE TABLE IF NOT EXISTS Tags (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    name TEXT NOT NULL UNIQUE,
    colorHint TEXT
);

-- Logical papers, unique by file name
CREATE TABLE IF NOT EXISTS Papers (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    name TEXT NOT NULL UNIQUE
);

-- Observed locations of a paper, per device
CREATE TABLE IF NOT EXISTS PaperPaths (
    paperId INTEGER NOT NULL REFERENCES Papers(id),
    path TEXT NOT NULL,
    deviceId TEXT NOT NULL,
    PRIMARY KEY (paperId, path)
);
CREATE INDEX IF NOT EXISTS idx_paper_paths_path ON PaperPaths(path);
CREATE INDEX IF NOT EXISTS idx_paper_paths_device ON PaperPaths(deviceId);

-- Tags applied to papers (not to individual paths)
CREATE TABLE IF NOT EXISTS PaperTags (
    paperId INTEGER NOT NULL REFERENCES Papers(id),
    tagId INTEGER NOT NULL REFERENCES Tags(id),
    PRIMARY KEY (paperId, tagId)
);
CREATE INDEX IF NOT EXISTS idx_paper_tags_tag ON PaperTags(tagId);
"#;

/// Create the schema if missing and stamp the schema version.
///
/// A database written by a newer schema version is refused, never rebuilt.
pub fn create_schema(conn: &Connection) -> Result<()> {
    let version: i32 = conn.pragma_query_value(None, "user_version", |r| r.get(0))?;

    if version > CURRENT_SCHEMA_VERSION {
        return Err(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_MISMATCH),
            Some(format!(
                "database schema version {} is newer than supported version {}",
                version, CURRENT_SCHEMA_VERSION
            )),
        ));
    }

    conn.execute_batch(SCHEMA_SQL)?;

    if version < CURRENT_SCHEMA_VERSION {
        conn.pragma_update(None, "user_version", CURRENT_SCHEMA_VERSION)?;
        tracing::info!(
            "Database schema updated from version {} to {}",
            version,
            CURRENT_SCHEMA_VERSION
        );
    }

    Ok(())
}

#[cfg(test)]
pub fn force_set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.pragma_update(None, "user_version", version)
}
