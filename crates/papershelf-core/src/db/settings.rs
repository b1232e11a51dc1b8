use crate::error::Result;
use crate::map_db_err;
use rusqlite::{params, OptionalExtension};

impl super::Database {
    /// Insert or replace a setting value
    pub fn upsert_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO Settings (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .map_err(|e| map_db_err!("upsert setting", e))?;
        Ok(())
    }

    /// Get a setting value, `None` when the key was never set
    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM Settings WHERE key = ?1",
                params![key],
                |r| r.get(0),
            )
            .optional()
            .map_err(|e| map_db_err!("get setting", e))
    }
}
