use fic::diff::{compare, Classification};
use fic::logging::MemorySink;
use fic::scanner::{path_key, Scanner};
use fic::store::{Fingerprint, HashStore, Snapshot};
use std::fs;
use tempfile::tempdir;

fn snapshot(pairs: &[(&str, &str)]) -> Snapshot {
    pairs
        .iter()
        .map(|(p, h)| (*p, Fingerprint::new(*h)))
        .collect()
}

#[test]
fn test_documented_scenario() {
    let baseline = snapshot(&[("a", "h1"), ("b", "h2")]);
    let reference = snapshot(&[("a", "h1"), ("c", "h3")]);

    let report = compare(&reference, &baseline);

    assert_eq!(report.paths(Classification::Matched), vec!["a"]);
    assert!(report.paths(Classification::Modified).is_empty());
    assert_eq!(report.paths(Classification::New), vec!["c"]);
    assert_eq!(report.paths(Classification::Deleted), vec!["b"]);
    assert_eq!(report.len(), 3);
}

#[test]
fn test_rename_is_delete_plus_new() {
    let dir = tempdir().unwrap();
    let old = dir.path().join("old_name.conf");
    let new = dir.path().join("new_name.conf");
    fs::write(&old, b"contents").unwrap();
    let sink = MemorySink::new();
    let scanner = Scanner::new(&sink);

    let (baseline, _) = scanner.scan(&[dir.path()]);
    fs::rename(&old, &new).unwrap();
    let (reference, _) = scanner.scan(&[dir.path()]);

    let report = compare(&reference, &baseline);

    assert_eq!(report.paths(Classification::Deleted), vec![path_key(&old).unwrap()]);
    assert_eq!(report.paths(Classification::New), vec![path_key(&new).unwrap()]);
    assert!(report.paths(Classification::Modified).is_empty());
}

#[test]
fn test_scan_against_persisted_baseline() {
    let files = tempdir().unwrap();
    let db_dir = tempdir().unwrap();
    let db = db_dir.path().join("db.json");
    let edited = files.path().join("edited");
    let untouched = files.path().join("untouched");
    fs::write(&edited, b"v1").unwrap();
    fs::write(&untouched, b"stable").unwrap();
    let sink = MemorySink::new();
    let scanner = Scanner::new(&sink);

    let (initial, _) = scanner.scan(&[files.path()]);
    let mut store = HashStore::new(&db);
    for entry in &initial {
        store.upsert(&entry.path, entry.hash.clone()).unwrap();
    }

    fs::write(&edited, b"v2").unwrap();
    let (reference, _) = scanner.scan(&[files.path()]);
    let baseline = HashStore::open(&db).unwrap();
    let report = compare(&reference, baseline.entries());

    assert_eq!(report.paths(Classification::Modified), vec![path_key(&edited).unwrap()]);
    assert_eq!(report.paths(Classification::Matched), vec![path_key(&untouched).unwrap()]);
}

#[test]
fn test_emptied_file_reads_as_deleted() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("log");
    fs::write(&file, b"entries").unwrap();
    let sink = MemorySink::new();
    let scanner = Scanner::new(&sink);

    let (baseline, _) = scanner.scan(&[dir.path()]);
    fs::write(&file, b"").unwrap();
    let (reference, _) = scanner.scan(&[dir.path()]);

    let report = compare(&reference, &baseline);
    assert_eq!(report.paths(Classification::Deleted), vec![path_key(&file).unwrap()]);
}
