//! Identity resolution: filesystem path to paper
//!
//! A paper is identified by its file name alone. Two files called `a.pdf`
//! in different folders, or on different machines, are the same paper and
//! share its tags.

use std::path::Path;

use crate::db::{Database, PaperId};
use crate::device::DeviceId;
use crate::error::{Result, ShelfError};
use crate::paths;

/// Outcome of registering one observed path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub paper_id: PaperId,
    /// Canonical path key stored in `PaperPaths`
    pub path: String,
    /// False when this `(paper, path)` was already registered
    pub path_added: bool,
}

/// Maps paths seen on the current device to paper identities
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    device: DeviceId,
}

impl IdentityResolver {
    pub fn new(device: DeviceId) -> Self {
        Self { device }
    }

    pub fn device(&self) -> &DeviceId {
        &self.device
    }

    /// Find or create the paper for `path` and record the path for this device.
    ///
    /// Re-registering a known path is a no-op that returns the same paper.
    pub fn register(&self, db: &Database, path: &Path) -> Result<Registration> {
        let key = paths::normalize(path);
        let name = paths::file_name(Path::new(&key))
            .ok_or_else(|| ShelfError::invalid_value("paper path", path.display()))?;

        let paper_id = db.find_or_create_paper(&name)?;
        let path_added = db.insert_paper_path(paper_id, &key, self.device.as_str())?;

        if path_added {
            tracing::debug!(paper_id, path = %key, "registered paper path");
        }

        Ok(Registration {
            paper_id,
            path: key,
            path_added,
        })
    }
}
