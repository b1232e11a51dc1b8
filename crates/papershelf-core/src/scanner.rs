//! Directory ingestion
//!
//! Walks a directory tree, picks documents by extension and registers each
//! one through the [`IdentityResolver`]. The walk runs on a worker thread
//! and reports through an [`IngestHandle`]; it writes only to the database
//! and never touches the tag cache.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use chrono::{DateTime, Utc};
use serde::Serialize;
use walkdir::WalkDir;

use crate::config::StoreConfig;
use crate::db::Database;
use crate::error::{Result, ShelfError};
use crate::resolver::IdentityResolver;

/// Cooperative cancellation checked between per-file insertions
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What the walk picks up
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub config: StoreConfig,
}

impl ScanOptions {
    pub fn from_config(config: &StoreConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

/// Summary of a finished (or cancelled) ingest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// The directory that was scanned
    pub directory: PathBuf,
    /// Documents found by the walk
    pub discovered: usize,
    /// Paths registered for the first time
    pub registered: usize,
    /// Entries that could not be read or registered
    pub skipped: usize,
    pub cancelled: bool,
    pub finished_at: DateTime<Utc>,
}

/// Check that `dir` exists and is a directory
pub fn validate_directory(dir: &Path) -> Result<PathBuf> {
    let metadata = match std::fs::metadata(dir) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ShelfError::DirectoryNotFound {
                path: dir.to_path_buf(),
            })
        }
        Err(e) => return Err(ShelfError::io_operation("read", dir.display(), e)),
    };

    if !metadata.is_dir() {
        return Err(ShelfError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    Ok(dir.to_path_buf())
}

fn lock(db: &Mutex<Database>) -> Result<std::sync::MutexGuard<'_, Database>> {
    db.lock()
        .map_err(|_| ShelfError::Other("database lock poisoned".to_string()))
}

/// Walk `root` and register every document found.
///
/// The database lock is taken per file so the control path can flush
/// while a long scan runs. Unreadable entries and failed registrations
/// are logged and counted, not fatal.
#[tracing::instrument(skip(db, resolver, root, options, cancel), fields(root = %root.display()))]
pub fn scan_directory(
    db: &Mutex<Database>,
    resolver: &IdentityResolver,
    root: &Path,
    options: &ScanOptions,
    cancel: &CancelFlag,
) -> Result<IngestReport> {
    let root = validate_directory(root)?;

    let mut discovered = 0;
    let mut registered = 0;
    let mut skipped = 0;
    let mut cancelled = false;

    for entry in WalkDir::new(&root).follow_links(options.config.follow_links) {
        if cancel.is_cancelled() {
            tracing::info!(discovered, registered, "ingest cancelled");
            cancelled = true;
            break;
        }

        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                skipped += 1;
                continue;
            }
        };

        if !entry.file_type().is_file()
            || !options
                .config
                .is_document(&entry.file_name().to_string_lossy())
        {
            continue;
        }

        discovered += 1;

        let result = {
            let db = lock(db)?;
            resolver.register(&db, entry.path())
        };

        match result {
            Ok(reg) if reg.path_added => registered += 1,
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(path = %entry.path().display(), error = %e, "failed to register paper");
                skipped += 1;
            }
        }
    }

    tracing::info!(discovered, registered, skipped, "ingest finished");

    Ok(IngestReport {
        directory: root,
        discovered,
        registered,
        skipped,
        cancelled,
        finished_at: Utc::now(),
    })
}

/// Handle to a background ingest
///
/// Completion is reported once, through [`IngestHandle::wait`] or
/// [`IngestHandle::try_finish`].
#[derive(Debug)]
pub struct IngestHandle {
    directory: PathBuf,
    cancel: CancelFlag,
    receiver: Receiver<Result<IngestReport>>,
    worker: Option<JoinHandle<()>>,
}

impl IngestHandle {
    /// Start scanning `root` on a worker thread
    pub fn spawn(
        db: Arc<Mutex<Database>>,
        resolver: IdentityResolver,
        root: PathBuf,
        options: ScanOptions,
    ) -> Result<Self> {
        let cancel = CancelFlag::new();
        let (sender, receiver) = mpsc::channel();

        let worker_cancel = cancel.clone();
        let worker_root = root.clone();
        let worker = thread::Builder::new()
            .name("papershelf-ingest".to_string())
            .spawn(move || {
                let result = scan_directory(&db, &resolver, &worker_root, &options, &worker_cancel);
                if let Err(e) = &result {
                    tracing::error!(error = %e, "ingest failed");
                }
                // The receiver may be gone if the handle was dropped
                let _ = sender.send(result);
            })
            .map_err(|e| ShelfError::Other(format!("failed to start ingest worker: {}", e)))?;

        Ok(Self {
            directory: root,
            cancel,
            receiver,
            worker: Some(worker),
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Ask the worker to stop before the next file
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Shared cancellation flag, e.g. for a signal handler
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Non-blocking completion check
    pub fn try_finish(&mut self) -> Option<Result<IngestReport>> {
        match self.receiver.try_recv() {
            Ok(result) => {
                self.join();
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.join();
                Some(Err(self.lost_worker()))
            }
        }
    }

    /// Block until the worker reports
    pub fn wait(mut self) -> Result<IngestReport> {
        let result = self.receiver.recv().map_err(|_| self.lost_worker());
        self.join();
        result?
    }

    fn join(&mut self) {
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!(directory = %self.directory.display(), "ingest worker panicked");
            }
        }
    }

    fn lost_worker(&self) -> ShelfError {
        ShelfError::Other(format!(
            "ingest worker for {} exited without reporting",
            self.directory.display()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceId;
    use std::fs;
    use tempfile::tempdir;

    fn resolver() -> IdentityResolver {
        IdentityResolver::new(DeviceId::new("test-device").unwrap())
    }

    fn shared_db() -> Arc<Mutex<Database>> {
        Arc::new(Mutex::new(Database::open_in_memory().unwrap()))
    }

    fn options() -> ScanOptions {
        ScanOptions::from_config(&StoreConfig::default())
    }

    fn sample_tree(root: &Path) {
        fs::create_dir_all(root.join("2021/finance")).unwrap();
        fs::create_dir_all(root.join("misc")).unwrap();
        fs::write(root.join("a.pdf"), b"%PDF").unwrap();
        fs::write(root.join("2021/finance/a.pdf"), b"%PDF").unwrap();
        fs::write(root.join("2021/finance/REPORT.PDF"), b"%PDF").unwrap();
        fs::write(root.join("misc/notes.txt"), b"not a paper").unwrap();
        fs::write(root.join("misc/pdf"), b"no extension").unwrap();
    }

    #[test]
    fn test_scan_registers_documents_only() {
        let dir = tempdir().unwrap();
        sample_tree(dir.path());
        let db = shared_db();

        let report =
            scan_directory(&db, &resolver(), dir.path(), &options(), &CancelFlag::new()).unwrap();

        assert_eq!(report.discovered, 3);
        assert_eq!(report.registered, 3);
        assert_eq!(report.skipped, 0);
        assert!(!report.cancelled);
        assert_eq!(report.directory, dir.path());

        let db = db.lock().unwrap();
        assert_eq!(db.get_paper_count().unwrap(), 2);
        assert_eq!(db.get_path_count().unwrap(), 3);
    }

    #[test]
    fn test_scan_twice_is_idempotent() {
        let dir = tempdir().unwrap();
        sample_tree(dir.path());
        let db = shared_db();

        scan_directory(&db, &resolver(), dir.path(), &options(), &CancelFlag::new()).unwrap();
        let (papers, paths) = {
            let db = db.lock().unwrap();
            (db.get_paper_count().unwrap(), db.get_path_count().unwrap())
        };

        let second =
            scan_directory(&db, &resolver(), dir.path(), &options(), &CancelFlag::new()).unwrap();

        assert_eq!(second.discovered, 3);
        assert_eq!(second.registered, 0);
        let db = db.lock().unwrap();
        assert_eq!(db.get_paper_count().unwrap(), papers);
        assert_eq!(db.get_path_count().unwrap(), paths);
    }

    #[test]
    fn test_scan_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing");

        let err = scan_directory(&shared_db(), &resolver(), &missing, &options(), &CancelFlag::new())
            .unwrap_err();
        assert!(matches!(err, ShelfError::DirectoryNotFound { .. }));
    }

    #[test]
    fn test_scan_file_instead_of_directory_fails() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.pdf");
        fs::write(&file, b"%PDF").unwrap();

        let err = validate_directory(&file).unwrap_err();
        assert!(matches!(err, ShelfError::NotADirectory { .. }));
    }

    #[test]
    fn test_cancelled_scan_stops_early() {
        let dir = tempdir().unwrap();
        sample_tree(dir.path());
        let db = shared_db();

        let cancel = CancelFlag::new();
        cancel.cancel();
        let report = scan_directory(&db, &resolver(), dir.path(), &options(), &cancel).unwrap();

        assert!(report.cancelled);
        assert_eq!(report.discovered, 0);
        assert_eq!(db.lock().unwrap().get_paper_count().unwrap(), 0);
    }

    #[test]
    fn test_custom_extensions() {
        let dir = tempdir().unwrap();
        sample_tree(dir.path());
        let db = shared_db();

        let config = StoreConfig {
            extensions: vec!["txt".to_string()],
            ..StoreConfig::default()
        };
        let report = scan_directory(
            &db,
            &resolver(),
            dir.path(),
            &ScanOptions::from_config(&config),
            &CancelFlag::new(),
        )
        .unwrap();

        assert_eq!(report.discovered, 1);
    }

    #[test]
    fn test_background_ingest_reports_directory() {
        let dir = tempdir().unwrap();
        sample_tree(dir.path());
        let db = shared_db();

        let handle = IngestHandle::spawn(
            Arc::clone(&db),
            resolver(),
            dir.path().to_path_buf(),
            options(),
        )
        .unwrap();
        assert_eq!(handle.directory(), dir.path());

        let report = handle.wait().unwrap();
        assert_eq!(report.directory, dir.path());
        assert_eq!(report.registered, 3);
        assert_eq!(db.lock().unwrap().get_path_count().unwrap(), 3);
    }

    #[test]
    fn test_background_ingest_error_is_reported() {
        let dir = tempdir().unwrap();
        let handle = IngestHandle::spawn(
            shared_db(),
            resolver(),
            dir.path().join("missing"),
            options(),
        )
        .unwrap();

        let err = handle.wait().unwrap_err();
        assert!(matches!(err, ShelfError::DirectoryNotFound { .. }));
    }

    #[test]
    fn test_try_finish_eventually_reports() {
        let dir = tempdir().unwrap();
        sample_tree(dir.path());

        let mut handle = IngestHandle::spawn(
            shared_db(),
            resolver(),
            dir.path().to_path_buf(),
            options(),
        )
        .unwrap();

        let report = loop {
            if let Some(result) = handle.try_finish() {
                break result.unwrap();
            }
            thread::sleep(std::time::Duration::from_millis(5));
        };
        assert_eq!(report.discovered, 3);
    }
}
