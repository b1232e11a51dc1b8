//! In-memory tag cache
//!
//! The cache is the only read path for "which tags does this path have".
//! It is warmed from the association table once, edited synchronously by
//! the caller, and written back in batches by [`TagCache::flush`].
//!
//! Adding tags propagates to every other known path of the same paper.
//! Removing a tag touches only the given path and is never written back:
//! flush only ever adds associations.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::Instant;

use serde::Serialize;

use crate::db::{Database, PaperId, TagAssociation};
use crate::error::Result;
use crate::trace_time;

/// Sort tag names case-insensitively, ties broken by exact spelling
pub fn sort_tag_names(tags: &mut [String]) {
    tags.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
}

/// Counts from one flush
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlushReport {
    /// Cached paths resolved to a paper and written
    pub paths_written: usize,
    /// Cached paths with no registered paper (never ingested)
    pub paths_skipped: usize,
    /// Paper/tag associations that did not exist before
    pub tags_linked: usize,
}

/// Path to tag-set cache with paper-level sibling lookup
#[derive(Debug, Default, Clone)]
pub struct TagCache {
    path_tags: HashMap<String, HashSet<String>>,
    path_paper: HashMap<String, PaperId>,
    paper_paths: HashMap<PaperId, BTreeSet<String>>,
}

impl TagCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cache from warm-up scan rows
    pub fn warm(rows: impl IntoIterator<Item = TagAssociation>) -> Self {
        let mut cache = Self::new();

        for row in rows {
            cache.path_paper.insert(row.path.clone(), row.paper_id);
            cache
                .paper_paths
                .entry(row.paper_id)
                .or_default()
                .insert(row.path.clone());

            let tags = cache.path_tags.entry(row.path).or_default();
            if let Some(tag) = row.tag {
                tags.insert(tag);
            }
        }

        cache
    }

    /// Warm a cache from the database's full association scan
    #[tracing::instrument(skip(db))]
    pub fn load(db: &Database) -> Result<Self> {
        let start = Instant::now();
        let cache = Self::warm(db.tag_associations()?);
        trace_time!(start, "cache_load", paths = cache.len());
        Ok(cache)
    }

    /// Tags of a path, sorted case-insensitively; empty for unknown paths
    pub fn get_tags(&self, path: &str) -> Vec<String> {
        let mut tags: Vec<String> = self
            .path_tags
            .get(path)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        sort_tag_names(&mut tags);
        tags
    }

    /// Merge `tags` into `path` and into every sibling path of the same paper.
    ///
    /// Names are kept exactly as given; blank names are dropped. Memory only.
    pub fn set_tags<I, S>(&mut self, path: &str, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tags: HashSet<String> = tags
            .into_iter()
            .filter(|t| !t.as_ref().trim().is_empty())
            .map(|t| t.as_ref().to_string())
            .collect();

        let mut targets = vec![path.to_string()];
        targets.extend(self.siblings(path));
        self.merge(targets, &tags);
    }

    fn merge(&mut self, targets: Vec<String>, tags: &HashSet<String>) {
        for target in targets {
            self.path_tags
                .entry(target)
                .or_default()
                .extend(tags.iter().cloned());
        }
    }

    /// Remove one tag from one path only; returns whether it was present
    pub fn remove_tag(&mut self, path: &str, tag: &str) -> bool {
        self.path_tags
            .get_mut(path)
            .is_some_and(|tags| tags.remove(tag))
    }

    /// Persist every cached `(path, tag)` pair as a paper/tag association.
    ///
    /// Paths are resolved through the database, not the cache, so paths
    /// ingested since warm-up are written too. Unregistered paths are
    /// skipped. The batch is one transaction.
    #[tracing::instrument(skip(self, db), fields(paths = self.len()))]
    pub fn flush(&self, db: &Database) -> Result<FlushReport> {
        let start = Instant::now();

        let report = db.in_transaction("flush", |db| {
            let mut report = FlushReport::default();

            for (path, tags) in self.path_tags.iter().filter(|(_, tags)| !tags.is_empty()) {
                let Some(paper_id) = db.paper_id_for_path(path)? else {
                    tracing::debug!(path = %path, "skipping unregistered path");
                    report.paths_skipped += 1;
                    continue;
                };

                for tag in tags {
                    let tag_id = db.find_or_create_tag(tag)?;
                    if db.insert_paper_tag(paper_id, tag_id)? {
                        report.tags_linked += 1;
                    }
                }
                report.paths_written += 1;
            }

            Ok(report)
        })?;

        trace_time!(start, "cache_flush", tags_linked = report.tags_linked);
        Ok(report)
    }

    /// Fold the tag edits of an older cache into this freshly loaded one.
    ///
    /// A path the older cache already knew as registered keeps exactly its
    /// own tags, and passes them only to sibling paths that are new here. A
    /// path that was unregistered then propagates like `set_tags`.
    pub fn absorb(&mut self, older: &TagCache) {
        for (path, tags) in older.path_tags.iter().filter(|(_, tags)| !tags.is_empty()) {
            if !older.path_paper.contains_key(path) {
                self.set_tags(path, tags);
                continue;
            }

            let mut targets = vec![path.clone()];
            targets.extend(
                self.siblings(path)
                    .into_iter()
                    .filter(|p| !older.path_tags.contains_key(p)),
            );
            self.merge(targets, tags);
        }
    }

    /// Other registered paths of the same paper as `path`
    pub fn siblings(&self, path: &str) -> Vec<String> {
        self.path_paper
            .get(path)
            .and_then(|paper| self.paper_paths.get(paper))
            .map(|paths| paths.iter().filter(|p| *p != path).cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.path_tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path_tags.is_empty()
    }
}
