use fic::store::{Fingerprint, HashStore, StoreError, UpsertOutcome};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_create_if_absent_is_idempotent() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("state").join("db.json");

    assert!(HashStore::create_if_absent(&db).unwrap());
    let first = fs::read(&db).unwrap();

    assert!(!HashStore::create_if_absent(&db).unwrap());
    assert_eq!(fs::read(&db).unwrap(), first);
}

#[test]
fn test_load_without_database_is_empty() {
    let dir = tempdir().unwrap();
    let mut store = HashStore::new(dir.path().join("db.json"));

    store.load().unwrap();

    assert!(store.entries().is_empty());
    assert_eq!(store.total_files(), 0);
}

#[test]
fn test_total_files_tracks_upserts() {
    let dir = tempdir().unwrap();
    let mut store = HashStore::new(dir.path().join("db.json"));

    for i in 0..10 {
        store
            .upsert(&format!("/file/{}", i % 4), Fingerprint::new(format!("h{i}")))
            .unwrap();
        assert_eq!(store.total_files(), store.entries().len());
    }
    assert_eq!(store.total_files(), 4);
}

#[test]
fn test_repeated_upsert_is_idempotent() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("db.json");
    let mut store = HashStore::new(&db);

    store.upsert("/p", Fingerprint::new("h")).unwrap();
    let on_disk = fs::read(&db).unwrap();
    let outcome = store.upsert("/p", Fingerprint::new("h")).unwrap();

    assert_eq!(outcome, UpsertOutcome::Unchanged);
    assert_eq!(store.total_files(), 1);
    assert_eq!(fs::read(&db).unwrap(), on_disk);
}

#[test]
fn test_round_trip_preserves_snapshot() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("db.json");
    let mut store = HashStore::new(&db);
    store.upsert("relative/path.txt", Fingerprint::new("aa")).unwrap();
    store.upsert("/absolute/path", Fingerprint::new("bb")).unwrap();
    store.upsert("/with space/ünïcode", Fingerprint::new("cc")).unwrap();

    let reloaded = HashStore::open(&db).unwrap();

    assert_eq!(reloaded.entries(), store.entries());
    assert_eq!(reloaded.total_files(), 3);
}

#[test]
fn test_reads_database_written_elsewhere() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("db.json");
    fs::write(
        &db,
        r#"{
  "files": {
    "/etc/hosts": {
      "path": "/etc/hosts",
      "hash": "2c26b46b68ffc68ff99b453c1d30413413422d706483bfa0f98a5e886266e7ae"
    }
  },
  "total_files": 1,
  "db_path": "/opt/fic/db.json"
}"#,
    )
    .unwrap();

    let store = HashStore::open(&db).unwrap();

    assert_eq!(
        store.get("/etc/hosts").unwrap().hash.as_str(),
        "2c26b46b68ffc68ff99b453c1d30413413422d706483bfa0f98a5e886266e7ae"
    );
}

#[test]
fn test_truncated_database_is_parse_error() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("db.json");
    fs::write(&db, br#"{"files": {"/a": {"path": "/a", "ha"#).unwrap();

    match HashStore::open(&db) {
        Err(StoreError::Parse { path, .. }) => assert_eq!(path, db),
        other => panic!("Expected Parse error, got {:?}", other),
    }
}

#[test]
fn test_persisted_json_layout() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("db.json");
    let mut store = HashStore::new(&db);
    store.upsert("/a", Fingerprint::new("h1")).unwrap();

    let json: serde_json::Value = serde_json::from_slice(&fs::read(&db).unwrap()).unwrap();

    assert_eq!(json["total_files"], 1);
    assert_eq!(json["files"]["/a"]["path"], "/a");
    assert_eq!(json["files"]["/a"]["hash"], "h1");
    assert_eq!(json["db_path"], db.to_string_lossy().as_ref());
}
