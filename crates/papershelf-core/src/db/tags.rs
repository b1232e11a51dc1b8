use super::{find_or_insert_id, PaperId, TagId, TagUsage};
use crate::error::Result;
use crate::map_db_err;
use rusqlite::{params, OptionalExtension};

impl super::Database {
    /// Find a tag by name, creating it on first use
    pub fn find_or_create_tag(&self, name: &str) -> Result<TagId> {
        find_or_insert_id(
            &self.conn,
            "SELECT id FROM Tags WHERE name = ?1",
            "INSERT INTO Tags (name) VALUES (?1)",
            name,
            "tag",
        )
    }

    /// Look up a tag id without creating it
    pub fn tag_id(&self, name: &str) -> Result<Option<TagId>> {
        self.conn
            .query_row("SELECT id FROM Tags WHERE name = ?1", params![name], |r| {
                r.get(0)
            })
            .optional()
            .map_err(|e| map_db_err!("look up tag", e))
    }

    /// Associate a tag with a paper; returns false when the pair already existed
    pub fn insert_paper_tag(&self, paper_id: PaperId, tag_id: TagId) -> Result<bool> {
        let inserted = self
            .conn
            .execute(
                "INSERT OR IGNORE INTO PaperTags (paperId, tagId) VALUES (?1, ?2)",
                params![paper_id, tag_id],
            )
            .map_err(|e| map_db_err!("insert paper tag", e))?;
        Ok(inserted > 0)
    }

    /// Set or clear the colour hint of a tag, creating the tag if needed
    pub fn set_tag_color(&self, name: &str, color: Option<&str>) -> Result<TagId> {
        let id = self.find_or_create_tag(name)?;
        self.conn
            .execute(
                "UPDATE Tags SET colorHint = ?1 WHERE id = ?2",
                params![color, id],
            )
            .map_err(|e| map_db_err!("set tag color", e))?;
        Ok(id)
    }

    /// Every tag with the number of papers carrying it, most used first
    pub fn tag_usage(&self) -> Result<Vec<TagUsage>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT t.name, t.colorHint, COUNT(pt.paperId) AS freq
                 FROM Tags t
                 LEFT JOIN PaperTags pt ON pt.tagId = t.id
                 GROUP BY t.id
                 ORDER BY freq DESC, t.name",
            )
            .map_err(|e| map_db_err!("prepare tag usage query", e))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(TagUsage {
                    name: row.get(0)?,
                    color: row.get(1)?,
                    papers: row.get(2)?,
                })
            })
            .map_err(|e| map_db_err!("query tag usage", e))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| map_db_err!("read tag usage", e))
    }
}
