use super::*;
use std::fs;
use tempfile::{tempdir, TempDir};

fn device() -> DeviceId {
    DeviceId::new("test-device").unwrap()
}

fn open_store(root: &Path) -> PaperStore {
    PaperStore::open_with(root, StoreConfig::default(), device())
}

/// Library with `a.pdf` in two folders and `b.pdf` once
fn library() -> TempDir {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("one")).unwrap();
    fs::create_dir_all(dir.path().join("two")).unwrap();
    fs::write(dir.path().join("one/a.pdf"), b"%PDF").unwrap();
    fs::write(dir.path().join("two/a.pdf"), b"%PDF").unwrap();
    fs::write(dir.path().join("one/b.pdf"), b"%PDF").unwrap();
    dir
}

fn ingest(store: &mut PaperStore, dir: &Path) -> crate::scanner::IngestReport {
    let handle = store.ingest_directory(dir).unwrap();
    store.finish_ingest(handle).unwrap()
}

#[test]
fn test_open_creates_store_directory() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("nested/store");

    let store = open_store(&root);

    assert!(store.is_available());
    assert!(root.join("papershelf.db").exists());
    assert_eq!(store.root(), Some(root.as_path()));
    assert_eq!(store.device().as_str(), "test-device");
}

#[test]
fn test_open_reads_device_override_from_config() {
    let dir = tempdir().unwrap();
    let config = StoreConfig {
        device_id: Some("from-config".to_string()),
        ..StoreConfig::default()
    };
    config.save(&dir.path().join(crate::config::CONFIG_FILE)).unwrap();

    let store = PaperStore::open(dir.path()).unwrap();
    assert_eq!(store.device().as_str(), "from-config");
}

#[test]
fn test_ingest_is_idempotent() {
    let lib = library();
    let dir = tempdir().unwrap();
    let mut store = open_store(dir.path());

    let first = ingest(&mut store, lib.path());
    assert_eq!(first.discovered, 3);
    assert_eq!(first.registered, 3);

    let second = ingest(&mut store, lib.path());
    assert_eq!(second.registered, 0);

    let db = store.db().unwrap();
    assert_eq!(db.get_paper_count().unwrap(), 2);
    assert_eq!(db.get_path_count().unwrap(), 3);
}

#[test]
fn test_same_name_shares_tags() {
    let lib = library();
    let dir = tempdir().unwrap();
    let mut store = open_store(dir.path());
    ingest(&mut store, lib.path());

    store.set_tags(&lib.path().join("one/a.pdf"), ["finance"]);

    assert_eq!(store.get_tags(&lib.path().join("one/a.pdf")), vec!["finance"]);
    assert_eq!(store.get_tags(&lib.path().join("two/a.pdf")), vec!["finance"]);
    assert!(store.get_tags(&lib.path().join("one/b.pdf")).is_empty());
}

#[test]
fn test_tags_survive_restart() {
    let lib = library();
    let dir = tempdir().unwrap();

    {
        let mut store = open_store(dir.path());
        ingest(&mut store, lib.path());
        store.set_tags(&lib.path().join("one/a.pdf"), ["ml", "Bayes"]);
        store.flush().unwrap();
        store.close().unwrap();
    }

    let store = open_store(dir.path());
    assert_eq!(store.get_tags(&lib.path().join("one/a.pdf")), vec!["Bayes", "ml"]);
    assert_eq!(store.get_tags(&lib.path().join("two/a.pdf")), vec!["Bayes", "ml"]);
}

#[test]
fn test_unflushed_tags_are_lost_on_restart() {
    let lib = library();
    let dir = tempdir().unwrap();

    {
        let mut store = open_store(dir.path());
        ingest(&mut store, lib.path());
        store.set_tags(&lib.path().join("one/b.pdf"), ["draft"]);
        store.close().unwrap();
    }

    let store = open_store(dir.path());
    assert!(store.get_tags(&lib.path().join("one/b.pdf")).is_empty());
}

#[test]
fn test_tag_names_stay_unique() {
    let lib = library();
    let dir = tempdir().unwrap();
    let mut store = open_store(dir.path());
    ingest(&mut store, lib.path());

    store.set_tags(&lib.path().join("one/a.pdf"), ["finance"]);
    store.set_tags(&lib.path().join("one/b.pdf"), ["finance"]);
    store.flush().unwrap();
    store.flush().unwrap();

    let usage = store.tag_usage().unwrap();
    assert_eq!(usage.len(), 1);
    assert_eq!(usage[0].name, "finance");
    assert_eq!(usage[0].papers, 2);
}

#[test]
fn test_unknown_path_has_no_tags() {
    let dir = tempdir().unwrap();
    let store = open_store(dir.path());
    assert!(store.get_tags(Path::new("/no/such/paper.pdf")).is_empty());
}

#[test]
fn test_tags_on_unregistered_path_are_not_persisted() {
    let dir = tempdir().unwrap();
    let mut store = open_store(dir.path());
    let stray = dir.path().join("stray.pdf");

    store.set_tags(&stray, ["x"]);
    assert_eq!(store.get_tags(&stray), vec!["x"]);

    let report = store.flush().unwrap();
    assert_eq!(report.paths_skipped, 1);

    store.reload().unwrap();
    assert_eq!(store.get_tags(&stray), vec!["x"]);
    assert!(store.tag_usage().unwrap().is_empty());
}

#[test]
fn test_remove_tag_only_affects_one_path() {
    let lib = library();
    let dir = tempdir().unwrap();
    let mut store = open_store(dir.path());
    ingest(&mut store, lib.path());

    let one = lib.path().join("one/a.pdf");
    let two = lib.path().join("two/a.pdf");
    store.set_tags(&one, ["finance"]);
    store.flush().unwrap();

    assert!(store.remove_tag(&one, "finance"));
    assert!(store.get_tags(&one).is_empty());
    assert_eq!(store.get_tags(&two), vec!["finance"]);

    // Removal is never written, so the tag returns from storage
    store.flush().unwrap();
    store.reload().unwrap();
    assert_eq!(store.get_tags(&one), vec!["finance"]);
}

#[test]
fn test_reload_keeps_unflushed_tags() {
    let lib = library();
    let dir = tempdir().unwrap();
    let mut store = open_store(dir.path());
    ingest(&mut store, lib.path());

    store.set_tags(&lib.path().join("one/b.pdf"), ["draft"]);
    store.reload().unwrap();

    assert_eq!(store.get_tags(&lib.path().join("one/b.pdf")), vec!["draft"]);
}

#[test]
fn test_reload_keeps_unflushed_removal() {
    let lib = library();
    let dir = tempdir().unwrap();
    let mut store = open_store(dir.path());
    ingest(&mut store, lib.path());

    let one = lib.path().join("one/a.pdf");
    let two = lib.path().join("two/a.pdf");
    store.set_tags(&one, ["draft"]);
    assert!(store.remove_tag(&one, "draft"));

    store.reload().unwrap();
    assert!(store.get_tags(&one).is_empty());
    assert_eq!(store.get_tags(&two), vec!["draft"]);

    // A later ingest reloads too
    ingest(&mut store, lib.path());
    assert!(store.get_tags(&one).is_empty());
}

#[test]
fn test_tags_set_before_ingest_reach_new_siblings() {
    let lib = library();
    let dir = tempdir().unwrap();
    let mut store = open_store(dir.path());

    store.set_tags(&lib.path().join("one/a.pdf"), ["early"]);
    ingest(&mut store, lib.path());

    assert_eq!(store.get_tags(&lib.path().join("two/a.pdf")), vec!["early"]);

    store.flush().unwrap();
    store.close().unwrap();

    let store = open_store(dir.path());
    assert_eq!(store.get_tags(&lib.path().join("two/a.pdf")), vec!["early"]);
}

#[test]
fn test_completed_ingest_is_remembered() {
    let lib = library();
    let dir = tempdir().unwrap();
    let mut store = open_store(dir.path());

    ingest(&mut store, lib.path());
    assert_eq!(store.last_directory(), crate::paths::normalize(lib.path()));
}

#[test]
fn test_cancelled_ingest_is_not_remembered() {
    let store = PaperStore::in_memory(device()).unwrap();
    store.set_last_directory("/papers").unwrap();

    let report = crate::scanner::IngestReport {
        directory: PathBuf::from("/elsewhere"),
        discovered: 4,
        registered: 1,
        skipped: 0,
        cancelled: true,
        finished_at: chrono::Utc::now(),
    };
    store.remember_directory(&report).unwrap();

    assert_eq!(store.last_directory(), "/papers");
}

#[test]
fn test_settings_round_trip() {
    let dir = tempdir().unwrap();
    let store = open_store(dir.path());

    assert_eq!(store.get_setting("lastDirectory"), "");

    store.set_setting("lastDirectory", "/papers").unwrap();
    store.set_setting("lastDirectory", "/papers/2021").unwrap();
    assert_eq!(store.get_setting("lastDirectory"), "/papers/2021");
    assert_eq!(store.last_directory(), "/papers/2021");

    store.set_last_directory("/elsewhere").unwrap();
    store.close().unwrap();

    let store = open_store(dir.path());
    assert_eq!(store.last_directory(), "/elsewhere");
}

#[test]
fn test_papers_on_device() {
    let lib = library();
    let dir = tempdir().unwrap();
    let mut store = open_store(dir.path());
    ingest(&mut store, lib.path());

    store.set_tags(&lib.path().join("one/a.pdf"), ["finance"]);
    store.flush().unwrap();

    let papers = store.papers_on_device().unwrap();
    let names: Vec<_> = papers.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["a.pdf", "b.pdf"]);
    assert_eq!(papers[0].tags, vec!["finance"]);
    assert!(papers[1].tags.is_empty());
}

#[test]
fn test_ingest_rejects_missing_directory() {
    let dir = tempdir().unwrap();
    let store = open_store(dir.path());

    let err = store.ingest_directory(&dir.path().join("missing")).unwrap_err();
    assert!(matches!(err, ShelfError::DirectoryNotFound { .. }));
}

#[test]
fn test_degraded_store_answers_empty() {
    let dir = tempdir().unwrap();
    // A directory where the database file should be
    fs::create_dir_all(dir.path().join("papershelf.db")).unwrap();
    let lib = library();

    let mut store = open_store(dir.path());
    assert!(!store.is_available());

    let path = lib.path().join("one/a.pdf");
    assert!(store.get_tags(&path).is_empty());
    assert_eq!(store.get_setting("lastDirectory"), "");

    store.set_tags(&path, ["kept"]);
    let err = store.flush().unwrap_err();
    assert!(matches!(err, ShelfError::StoreUnavailable { .. }));
    assert_eq!(store.get_tags(&path), vec!["kept"]);

    assert!(matches!(
        store.set_setting("k", "v").unwrap_err(),
        ShelfError::StoreUnavailable { .. }
    ));
    assert!(matches!(
        store.ingest_directory(lib.path()).unwrap_err(),
        ShelfError::StoreUnavailable { .. }
    ));

    store.close().unwrap();
}

#[test]
fn test_in_memory_store() {
    let lib = library();
    let mut store = PaperStore::in_memory(device()).unwrap();
    assert!(store.root().is_none());

    ingest(&mut store, lib.path());
    store.set_tags(&lib.path().join("one/b.pdf"), ["x"]);
    store.flush().unwrap();

    assert_eq!(store.tag_usage().unwrap()[0].papers, 1);
}

#[test]
fn test_tag_color_shows_in_usage() {
    let store = PaperStore::in_memory(device()).unwrap();

    store.set_tag_color("finance", Some("#ff8800")).unwrap();
    let usage = store.tag_usage().unwrap();
    assert_eq!(usage[0].name, "finance");
    assert_eq!(usage[0].color.as_deref(), Some("#ff8800"));
    assert_eq!(usage[0].papers, 0);

    assert!(matches!(
        store.set_tag_color("  ", None).unwrap_err(),
        ShelfError::InvalidValue { .. }
    ));
}
