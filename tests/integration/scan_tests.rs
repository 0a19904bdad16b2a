use fic::logging::MemorySink;
use fic::scanner::{hash_bytes, path_key, Scanner};
use std::fs::{self, File};
use std::io::Write;
use tempfile::tempdir;

#[test]
fn test_scan_multiple_roots() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    fs::write(first.path().join("one.txt"), b"one").unwrap();
    fs::create_dir_all(second.path().join("a").join("b")).unwrap();
    fs::write(second.path().join("a").join("b").join("deep.txt"), b"deep").unwrap();
    let sink = MemorySink::new();

    let (snapshot, stats) = Scanner::new(&sink).scan(&[first.path(), second.path()]);

    assert_eq!(snapshot.len(), 2);
    assert_eq!(stats.files_hashed, 2);
    let deep = path_key(&second.path().join("a").join("b").join("deep.txt")).unwrap();
    assert_eq!(snapshot.get(&deep).unwrap().hash, hash_bytes(b"deep"));
}

#[test]
fn test_overlapping_roots_keep_paths_unique() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub").join("f"), b"f").unwrap();
    let sink = MemorySink::new();

    let (snapshot, stats) = Scanner::new(&sink).scan(&[dir.path(), dir.path()]);

    assert_eq!(snapshot.len(), 1);
    assert_eq!(stats.files_hashed, 2);
}

#[test]
fn test_identical_content_gives_identical_fingerprints() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"same bytes").unwrap();
    fs::write(dir.path().join("b"), b"same bytes").unwrap();
    fs::write(dir.path().join("c"), b"other bytes").unwrap();
    let sink = MemorySink::new();

    let (snapshot, _) = Scanner::new(&sink).scan(&[dir.path()]);
    let hash = |name: &str| {
        let key = path_key(&dir.path().join(name)).unwrap();
        snapshot.get(&key).unwrap().hash.clone()
    };

    assert_eq!(hash("a"), hash("b"));
    assert_ne!(hash("a"), hash("c"));
}

#[test]
fn test_large_file_is_streamed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("large.bin");
    let chunk = vec![0xABu8; 1024 * 1024];
    let mut file = File::create(&path).unwrap();
    for _ in 0..5 {
        file.write_all(&chunk).unwrap();
    }
    drop(file);
    let sink = MemorySink::new();

    let (snapshot, _) = Scanner::new(&sink).scan(&[dir.path()]);

    let expected = hash_bytes(&chunk.repeat(5));
    assert_eq!(snapshot.get(&path_key(&path).unwrap()).unwrap().hash, expected);
}

#[cfg(unix)]
#[test]
fn test_permission_denied_continues() {
    use std::os::unix::fs::PermissionsExt;
    let dir = tempdir().unwrap();
    let sub = dir.path().join("no_access");
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join("hidden.txt"), b"secret").unwrap();
    fs::write(dir.path().join("ok.txt"), b"public").unwrap();

    let mut perms = fs::metadata(&sub).unwrap().permissions();
    perms.set_mode(0o000);
    fs::set_permissions(&sub, perms).unwrap();

    // Privileged users bypass permission bits; nothing to test then.
    let bypassed = fs::read_dir(&sub).is_ok();

    let sink = MemorySink::new();
    let (snapshot, stats) = Scanner::new(&sink).scan(&[dir.path()]);

    let mut perms = fs::metadata(&sub).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&sub, perms).unwrap();

    if bypassed {
        return;
    }
    assert_eq!(snapshot.len(), 1);
    assert!(snapshot.contains(&path_key(&dir.path().join("ok.txt")).unwrap()));
    assert_eq!(stats.traversal_errors, 1);
    assert!(sink.contains("Error accessing path"));
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_logged_and_skipped() {
    use std::os::unix::fs::PermissionsExt;
    let dir = tempdir().unwrap();
    let locked = dir.path().join("locked.txt");
    fs::write(&locked, b"locked").unwrap();
    fs::write(dir.path().join("open.txt"), b"open").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    let bypassed = File::open(&locked).is_ok();

    let sink = MemorySink::new();
    let (snapshot, stats) = Scanner::new(&sink).scan(&[dir.path()]);

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    if bypassed {
        return;
    }
    assert_eq!(snapshot.len(), 1);
    assert_eq!(stats.hash_failures, 1);
    assert!(sink.contains("Failed to hash file"));
}

#[cfg(unix)]
#[test]
fn test_fifo_is_never_opened() {
    let dir = tempdir().unwrap();
    let fifo = dir.path().join("pipe");
    let status = std::process::Command::new("mkfifo").arg(&fifo).status();
    if !status.map(|s| s.success()).unwrap_or(false) {
        return;
    }
    fs::write(dir.path().join("regular"), b"r").unwrap();
    let sink = MemorySink::new();

    // Opening the FIFO for reading would block forever.
    let (snapshot, stats) = Scanner::new(&sink).scan(&[dir.path()]);

    assert_eq!(snapshot.len(), 1);
    assert_eq!(stats.non_regular, 1);
}
