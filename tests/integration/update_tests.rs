use fic::commands::run_update;
use fic::logging::MemorySink;
use fic::scanner::{hash_bytes, path_key, Hasher};
use fic::store::{lock_path_for, HashStore};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_update_then_change_replaces_hash() {
    let scan = tempdir().unwrap();
    let db = tempdir().unwrap();
    let db_path = db.path().join("db.json");
    let file = scan.path().join("app.conf");
    fs::write(&file, b"port=80").unwrap();
    let sink = MemorySink::new();

    let mut store = HashStore::new(&db_path);
    run_update(&mut store, &[scan.path()], &Hasher::new(), &sink).unwrap();

    fs::write(&file, b"port=8080").unwrap();
    let mut store = HashStore::new(&db_path);
    let summary = run_update(&mut store, &[scan.path()], &Hasher::new(), &sink).unwrap();

    assert_eq!(summary.replaced, 1);
    let reloaded = HashStore::open(&db_path).unwrap();
    assert_eq!(reloaded.total_files(), 1);
    assert_eq!(
        reloaded.get(&path_key(&file).unwrap()).unwrap().hash,
        hash_bytes(b"port=8080")
    );
}

#[test]
fn test_update_never_removes_entries() {
    let scan = tempdir().unwrap();
    let db = tempdir().unwrap();
    let db_path = db.path().join("db.json");
    let doomed = scan.path().join("doomed");
    fs::write(&doomed, b"bye").unwrap();
    fs::write(scan.path().join("stays"), b"hi").unwrap();
    let sink = MemorySink::new();

    let mut store = HashStore::new(&db_path);
    run_update(&mut store, &[scan.path()], &Hasher::new(), &sink).unwrap();
    fs::remove_file(&doomed).unwrap();
    run_update(&mut store, &[scan.path()], &Hasher::new(), &sink).unwrap();

    let reloaded = HashStore::open(&db_path).unwrap();
    assert_eq!(reloaded.total_files(), 2);
    assert!(reloaded.get(&path_key(&doomed).unwrap()).is_some());
}

#[test]
fn test_update_aborts_on_lock_contention() {
    let scan = tempdir().unwrap();
    let db = tempdir().unwrap();
    let db_path = db.path().join("db.json");
    fs::write(scan.path().join("a"), b"a").unwrap();
    HashStore::create_if_absent(&db_path).unwrap();
    fs::write(lock_path_for(&db_path), b"").unwrap();

    let mut store = HashStore::new(&db_path);
    let err = run_update(&mut store, &[scan.path()], &Hasher::new(), &MemorySink::new())
        .unwrap_err();

    assert!(err.is_contention());
    let on_disk: serde_json::Value =
        serde_json::from_slice(&fs::read(&db_path).unwrap()).unwrap();
    assert_eq!(on_disk["total_files"], 0);
}

#[test]
fn test_update_logs_summary() {
    let scan = tempdir().unwrap();
    let db = tempdir().unwrap();
    fs::write(scan.path().join("one"), b"1").unwrap();
    fs::write(scan.path().join("two"), b"2").unwrap();
    let sink = MemorySink::new();

    let mut store = HashStore::new(db.path().join("db.json"));
    let summary = run_update(&mut store, &[scan.path()], &Hasher::new(), &sink).unwrap();

    assert_eq!(summary.inserted, 2);
    assert!(summary.wrote_baseline());
    assert!(sink.contains("Update complete: 2 new"));
}
