//! The paper store
//!
//! [`PaperStore`] is what the application shell talks to. It owns the one
//! database handle of the process, the tag cache warmed from it, and the
//! device identifier used for every path it registers.
//!
//! A store whose database cannot be opened still comes up: its cache is
//! empty, tag queries answer `[]` and settings answer `""`. Operations that
//! must write durably report [`ShelfError::StoreUnavailable`].

mod ingest;
mod settings;
mod tags;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::cache::TagCache;
use crate::config::StoreConfig;
use crate::db::Database;
use crate::device::DeviceId;
use crate::error::{Result, ShelfError};
use crate::resolver::IdentityResolver;

/// Persistent tag/paper store with an in-memory tag cache
#[derive(Debug)]
pub struct PaperStore {
    /// Root directory of the store, `None` for in-memory stores
    root: Option<PathBuf>,
    config: StoreConfig,
    resolver: IdentityResolver,
    db: Option<Arc<Mutex<Database>>>,
    cache: TagCache,
}

impl PaperStore {
    /// Open the store at `root`, reading `config.toml` and resolving the device id
    #[tracing::instrument(skip(root), fields(root = %root.display()))]
    pub fn open(root: &Path) -> Result<Self> {
        let config = StoreConfig::load_or_default(root)?;
        let device = DeviceId::resolve(config.device_id.as_deref())?;
        Ok(Self::open_with(root, config, device))
    }

    /// Open the store at `root` with explicit configuration and device id.
    ///
    /// Never fails: if the database cannot be opened the store is degraded
    /// to an empty, query-only cache.
    pub fn open_with(root: &Path, config: StoreConfig, device: DeviceId) -> Self {
        let db_path = config.database_path(root);

        let db = fs::create_dir_all(root)
            .map_err(|e| ShelfError::io_operation("create store directory", root.display(), e))
            .and_then(|_| Database::open(&db_path));

        let db = match db {
            Ok(db) => Some(db),
            Err(e) => {
                tracing::error!(
                    db_path = %db_path.display(),
                    error = %e,
                    "paper store unavailable, continuing with an empty cache"
                );
                None
            }
        };

        Self::from_parts(Some(root.to_path_buf()), config, device, db)
    }

    /// Store backed by a private in-memory database
    pub fn in_memory(device: DeviceId) -> Result<Self> {
        let db = Database::open_in_memory()?;
        Ok(Self::from_parts(
            None,
            StoreConfig::default(),
            device,
            Some(db),
        ))
    }

    fn from_parts(
        root: Option<PathBuf>,
        config: StoreConfig,
        device: DeviceId,
        db: Option<Database>,
    ) -> Self {
        let cache = match &db {
            Some(db) => TagCache::load(db).unwrap_or_else(|e| {
                tracing::error!(error = %e, "failed to warm tag cache");
                TagCache::new()
            }),
            None => TagCache::new(),
        };

        tracing::debug!(paths = cache.len(), device = %device, "paper store ready");

        PaperStore {
            root,
            config,
            resolver: IdentityResolver::new(device),
            db: db.map(|db| Arc::new(Mutex::new(db))),
            cache,
        }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn device(&self) -> &DeviceId {
        self.resolver.device()
    }

    /// Whether durable storage is available
    pub fn is_available(&self) -> bool {
        self.db.is_some()
    }

    /// Lock the database, or report the store as unavailable
    fn db(&self) -> Result<MutexGuard<'_, Database>> {
        let db = self.db.as_ref().ok_or_else(|| ShelfError::StoreUnavailable {
            reason: "database could not be opened".to_string(),
        })?;

        db.lock()
            .map_err(|_| ShelfError::Other("database lock poisoned".to_string()))
    }

    /// Close the database.
    ///
    /// Consumes the store. If a background ingest still holds the database,
    /// the connection is released when that ingest finishes.
    pub fn close(self) -> Result<()> {
        let Some(shared) = self.db else {
            return Ok(());
        };

        match Arc::try_unwrap(shared) {
            Ok(mutex) => {
                let db = mutex
                    .into_inner()
                    .map_err(|_| ShelfError::Other("database lock poisoned".to_string()))?;
                db.close()
            }
            Err(_) => {
                tracing::warn!("ingest still running, database closes when it finishes");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests;
