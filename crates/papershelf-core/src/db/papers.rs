use super::{find_or_insert_id, DevicePaper, Paper, PaperId};
use crate::cache::sort_tag_names;
use crate::error::Result;
use crate::map_db_err;
use rusqlite::{params, OptionalExtension};

impl super::Database {
    /// Find a paper by file name, creating it on first sight
    pub fn find_or_create_paper(&self, name: &str) -> Result<PaperId> {
        find_or_insert_id(
            &self.conn,
            "SELECT id FROM Papers WHERE name = ?1",
            "INSERT INTO Papers (name) VALUES (?1)",
            name,
            "paper",
        )
    }

    pub fn get_paper(&self, id: PaperId) -> Result<Option<Paper>> {
        self.conn
            .query_row(
                "SELECT id, name FROM Papers WHERE id = ?1",
                params![id],
                |r| {
                    Ok(Paper {
                        id: r.get(0)?,
                        name: r.get(1)?,
                    })
                },
            )
            .optional()
            .map_err(|e| map_db_err!("get paper", e))
    }

    /// Record a location of a paper; returns false when `(paper, path)` was already known.
    ///
    /// The device of an already-registered path is left untouched.
    pub fn insert_paper_path(&self, paper_id: PaperId, path: &str, device_id: &str) -> Result<bool> {
        let inserted = self
            .conn
            .execute(
                "INSERT OR IGNORE INTO PaperPaths (paperId, path, deviceId) VALUES (?1, ?2, ?3)",
                params![paper_id, path, device_id],
            )
            .map_err(|e| map_db_err!("insert paper path", e))?;
        Ok(inserted > 0)
    }

    /// Resolve a canonical path to the paper registered for it
    pub fn paper_id_for_path(&self, path: &str) -> Result<Option<PaperId>> {
        self.conn
            .query_row(
                "SELECT paperId FROM PaperPaths WHERE path = ?1 ORDER BY paperId LIMIT 1",
                params![path],
                |r| r.get(0),
            )
            .optional()
            .map_err(|e| map_db_err!("resolve path", e))
    }

    /// Papers with at least one path on `device_id`, ordered by name
    pub fn papers_on_device(&self, device_id: &str) -> Result<Vec<DevicePaper>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT DISTINCT p.id, p.name, t.name
                 FROM Papers p
                 JOIN PaperPaths pp ON pp.paperId = p.id
                 LEFT JOIN PaperTags pt ON pt.paperId = p.id
                 LEFT JOIN Tags t ON t.id = pt.tagId
                 WHERE pp.deviceId = ?1
                 ORDER BY p.name, p.id",
            )
            .map_err(|e| map_db_err!("prepare device papers query", e))?;

        let rows = stmt
            .query_map(params![device_id], |row| {
                Ok((
                    row.get::<_, PaperId>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            })
            .map_err(|e| map_db_err!("query device papers", e))?;

        let mut papers: Vec<DevicePaper> = Vec::new();
        for row in rows {
            let (id, name, tag) = row.map_err(|e| map_db_err!("read device papers", e))?;

            match papers.last_mut() {
                Some(last) if last.id == id => last.tags.extend(tag),
                _ => papers.push(DevicePaper {
                    id,
                    name,
                    tags: tag.into_iter().collect(),
                }),
            }
        }

        for paper in &mut papers {
            sort_tag_names(&mut paper.tags);
        }

        Ok(papers)
    }
}
