use std::path::Path;
use std::sync::Arc;

use super::PaperStore;
use crate::error::{Result, ShelfError};
use crate::paths;
use crate::scanner::{self, IngestHandle, IngestReport, ScanOptions};

impl PaperStore {
    /// Start registering every document under `dir` in the background.
    ///
    /// The tag cache is not touched; call [`PaperStore::finish_ingest`] (or
    /// [`PaperStore::reload`]) once the handle reports.
    #[tracing::instrument(skip(self, dir), fields(dir = %dir.display()))]
    pub fn ingest_directory(&self, dir: &Path) -> Result<IngestHandle> {
        let dir = scanner::validate_directory(dir)?;

        let db = self
            .db
            .as_ref()
            .map(Arc::clone)
            .ok_or_else(|| ShelfError::StoreUnavailable {
                reason: "database could not be opened".to_string(),
            })?;

        IngestHandle::spawn(
            db,
            self.resolver.clone(),
            dir,
            ScanOptions::from_config(&self.config),
        )
    }

    /// Wait for an ingest and pick up its paths in the cache.
    ///
    /// A scan that ran to completion is remembered as `lastDirectory`.
    pub fn finish_ingest(&mut self, handle: IngestHandle) -> Result<IngestReport> {
        let report = handle.wait()?;
        self.reload()?;
        self.remember_directory(&report)?;
        Ok(report)
    }

    pub(crate) fn remember_directory(&self, report: &IngestReport) -> Result<()> {
        if report.cancelled {
            return Ok(());
        }
        self.set_last_directory(&paths::normalize(&report.directory))
    }
}
