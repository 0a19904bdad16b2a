use figment::providers::{Env, Serialized};
use figment::Figment;
use fic::config::{Config, DEFAULT_INTERVAL_SECS, ENV_PREFIX};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

#[test]
fn test_config_load_defaults() {
    // Use figment directly without Env to avoid interference from other tests
    let figment = Figment::from(Serialized::defaults(Config::default()));
    let config: Config = figment.extract().unwrap();

    assert!(config.database_path.as_os_str().is_empty());
    assert!(config.scan_paths.is_empty());
    assert_eq!(config.interval_secs, DEFAULT_INTERVAL_SECS);
    assert!(config.validate().is_err());
}

#[test]
fn test_config_load_from_json_with_legacy_log_key() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.json");
    fs::write(
        &config_path,
        r#"{
  "database_path": "/var/lib/fic/db.json",
  "fic_log_path": "/var/log/fic/fic.log",
  "scan_paths": ["/etc", "/usr/local/bin"]
}"#,
    )
    .unwrap();

    let config = Config::load(Some(&config_path)).unwrap();

    assert_eq!(config.database_path, PathBuf::from("/var/lib/fic/db.json"));
    assert_eq!(config.log_file(), Some(Path::new("/var/log/fic/fic.log")));
    assert_eq!(
        config.scan_paths,
        vec![PathBuf::from("/etc"), PathBuf::from("/usr/local/bin")]
    );
}

#[test]
fn test_config_load_from_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("fic.toml");
    fs::write(
        &config_path,
        r#"
database_path = "/srv/fic/db.json"
log_file_path = "/srv/fic/fic.log"
scan_paths = ["/opt/app"]
snapshot_path = "/srv/fic/scratch.json"
"#,
    )
    .unwrap();

    let config: Config = Config::figment(Some(&config_path)).extract().unwrap();

    assert_eq!(config.database_path, PathBuf::from("/srv/fic/db.json"));
    assert_eq!(config.log_file(), Some(Path::new("/srv/fic/fic.log")));
    assert_eq!(config.snapshot_path, PathBuf::from("/srv/fic/scratch.json"));
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_env_overrides_file() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.json");
    fs::write(
        &config_path,
        r#"{"database_path": "/from/file.json", "scan_paths": ["/etc"], "interval_secs": 30}"#,
    )
    .unwrap();

    std::env::set_var("FIC_SNAPSHOT_PATH", "/from/env/scratch.json");

    let config: Config = Config::figment(Some(&config_path))
        .merge(Env::prefixed(ENV_PREFIX))
        .extract()
        .unwrap();

    assert_eq!(config.snapshot_path, PathBuf::from("/from/env/scratch.json"));
    assert_eq!(config.database_path, PathBuf::from("/from/file.json"));
    assert_eq!(config.interval_secs, 30);

    // Clean up
    std::env::remove_var("FIC_SNAPSHOT_PATH");
}

#[test]
fn test_config_missing_explicit_file_is_error() {
    let temp_dir = tempdir().unwrap();
    let missing = temp_dir.path().join("nope.json");

    let err = Config::load(Some(&missing)).unwrap_err();

    assert!(err.to_string().contains("Config file not found"));
}

#[test]
fn test_config_without_scan_paths_is_rejected() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.json");
    fs::write(&config_path, r#"{"database_path": "/db.json"}"#).unwrap();

    assert!(Config::load(Some(&config_path)).is_err());
}

#[test]
fn test_config_malformed_file_is_error() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.json");
    fs::write(&config_path, "{ not json").unwrap();

    let err = Config::load(Some(&config_path)).unwrap_err();

    assert!(format!("{err:#}").contains("Invalid configuration"));
}
