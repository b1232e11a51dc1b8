use std::path::Path;

use super::PaperStore;
use crate::cache::{FlushReport, TagCache};
use crate::db::{DevicePaper, TagId, TagUsage};
use crate::error::{Result, ShelfError};
use crate::paths;

impl PaperStore {
    /// Tags for a file path, sorted; `[]` for unknown paths
    pub fn get_tags(&self, path: &Path) -> Vec<String> {
        self.cache.get_tags(&paths::normalize(path))
    }

    /// Add tags to a path and every registered sibling path of the same paper.
    ///
    /// Memory only until [`PaperStore::flush`].
    pub fn set_tags<I, S>(&mut self, path: &Path, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.cache.set_tags(&paths::normalize(path), tags);
    }

    /// Remove a tag from this one path in memory.
    ///
    /// Siblings keep the tag, and a tag already flushed comes back on the
    /// next reload.
    pub fn remove_tag(&mut self, path: &Path, tag: &str) -> bool {
        self.cache.remove_tag(&paths::normalize(path), tag)
    }

    /// Persist cached tags in one transaction
    pub fn flush(&self) -> Result<FlushReport> {
        let db = self.db()?;
        let report = self.cache.flush(&db)?;
        tracing::debug!(
            written = report.paths_written,
            skipped = report.paths_skipped,
            linked = report.tags_linked,
            "tags flushed"
        );
        Ok(report)
    }

    /// Rebuild the cache from the database, keeping unflushed additions
    #[tracing::instrument(skip(self))]
    pub fn reload(&mut self) -> Result<()> {
        let fresh = {
            let db = self.db()?;
            TagCache::load(&db)?
        };

        let pending = std::mem::replace(&mut self.cache, fresh);
        self.cache.absorb(&pending);
        Ok(())
    }

    /// Tags with the number of papers carrying each, most used first
    pub fn tag_usage(&self) -> Result<Vec<TagUsage>> {
        self.db()?.tag_usage()
    }

    /// Papers with a path registered by this device
    pub fn papers_on_device(&self) -> Result<Vec<DevicePaper>> {
        self.db()?.papers_on_device(self.device().as_str())
    }

    /// Set or clear a tag's color hint, creating the tag if needed
    pub fn set_tag_color(&self, tag: &str, color: Option<&str>) -> Result<TagId> {
        if tag.trim().is_empty() {
            return Err(ShelfError::invalid_value("tag name", "(empty)"));
        }
        self.db()?.set_tag_color(tag, color)
    }
}
