use super::TagAssociation;
use crate::error::Result;
use crate::map_db_err;

impl super::Database {
    /// Full scan for cache warm-up: one row per `(paper, path, tag)`.
    ///
    /// Paths of untagged papers appear once with `tag = None`.
    pub fn tag_associations(&self) -> Result<Vec<TagAssociation>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT pp.paperId, pp.path, t.name
                 FROM PaperPaths pp
                 LEFT JOIN PaperTags pt ON pt.paperId = pp.paperId
                 LEFT JOIN Tags t ON t.id = pt.tagId
                 ORDER BY pp.paperId, pp.path",
            )
            .map_err(|e| map_db_err!("prepare association scan", e))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(TagAssociation {
                    paper_id: row.get(0)?,
                    path: row.get(1)?,
                    tag: row.get(2)?,
                })
            })
            .map_err(|e| map_db_err!("scan associations", e))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| map_db_err!("read associations", e))
    }

    /// Run `f` inside a transaction, committing on success.
    ///
    /// Used by flush so a batch of tag writes lands atomically.
    pub fn in_transaction<T>(&self, op: &str, f: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| map_db_err!(&format!("begin {op} transaction"), e))?;

        let value = f(self)?;

        tx.commit()
            .map_err(|e| map_db_err!(&format!("commit {op} transaction"), e))?;
        Ok(value)
    }
}
