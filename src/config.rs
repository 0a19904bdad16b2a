//! Application configuration management.
//!
//! Configuration is layered with figment:
//!
//! 1. Built-in defaults
//! 2. Configuration file (JSON, or TOML when the extension is `.toml`)
//! 3. Environment variables prefixed with `FIC_` (e.g. `FIC_DATABASE_PATH`)
//! 4. CLI overrides, applied by the caller
//!
//! The file is looked up at `--config` if given, else `config/config.json`
//! under the working directory, else `config.json` in the platform config
//! directory. Without any file, defaults and environment still apply.
//!
//! ```json
//! {
//!   "database_path": "/var/lib/fic/db.json",
//!   "fic_log_path": "/var/log/fic/fic.log",
//!   "scan_paths": ["/etc", "/usr/local/bin"]
//! }
//! ```

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use figment::providers::{Env, Format, Json, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file looked up relative to the working directory.
pub const LOCAL_CONFIG_PATH: &str = "config/config.json";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "FIC_";

/// Default seconds between monitor cycle starts.
pub const DEFAULT_INTERVAL_SECS: u64 = 60;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Location of the baseline hash database.
    #[serde(default)]
    pub database_path: PathBuf,

    /// Log file; stderr when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<PathBuf>,

    /// Legacy key for [`Config::log_file_path`].
    #[serde(default, skip_serializing)]
    pub fic_log_path: Option<PathBuf>,

    /// Roots to monitor, in order.
    #[serde(default)]
    pub scan_paths: Vec<PathBuf>,

    /// Scratch file receiving each monitor cycle's scan.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,

    /// Seconds between monitor cycle starts.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

fn default_snapshot_path() -> PathBuf {
    std::env::temp_dir().join("temp_db.json")
}

fn default_interval_secs() -> u64 {
    DEFAULT_INTERVAL_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::new(),
            log_file_path: None,
            fic_log_path: None,
            scan_paths: Vec::new(),
            snapshot_path: default_snapshot_path(),
            interval_secs: DEFAULT_INTERVAL_SECS,
        }
    }
}

impl Config {
    /// Load and validate the configuration.
    ///
    /// # Errors
    ///
    /// Fails if an explicitly given file does not exist, if any layer cannot
    /// be parsed, or if the result does not pass [`Config::validate`].
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.is_file() {
                    bail!("Config file not found: {}", path.display());
                }
                Some(path.to_path_buf())
            }
            None => Self::discover(),
        };

        match &path {
            Some(p) => log::debug!("Loading config from {}", p.display()),
            None => log::debug!("No config file found, using defaults and environment"),
        }

        let config: Config = Self::figment(path.as_deref())
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .with_context(|| match &path {
                Some(p) => format!("Invalid configuration in {}", p.display()),
                None => "Invalid configuration".to_string(),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Defaults merged with the given file, without the environment layer.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let figment = Figment::from(Serialized::defaults(Config::default()));
        match path {
            Some(p) if is_toml(p) => figment.merge(Toml::file(p)),
            Some(p) => figment.merge(Json::file(p)),
            None => figment,
        }
    }

    /// Find a config file in the conventional locations.
    fn discover() -> Option<PathBuf> {
        let local = PathBuf::from(LOCAL_CONFIG_PATH);
        if local.is_file() {
            return Some(local);
        }
        Self::platform_config_path().filter(|p| p.is_file())
    }

    /// Platform-specific config location (`~/.config/fic/config.json` on Linux).
    #[must_use]
    pub fn platform_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "fic", "fic").map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Check the invariants the core relies on.
    ///
    /// # Errors
    ///
    /// Fails if no database path or scan path is configured, or the interval
    /// is zero.
    pub fn validate(&self) -> Result<()> {
        if self.database_path.as_os_str().is_empty() {
            bail!("database_path must be set");
        }
        if self.scan_paths.is_empty() {
            bail!("scan_paths must list at least one path");
        }
        if self.interval_secs == 0 {
            bail!("interval_secs must be at least 1");
        }
        Ok(())
    }

    /// Effective log file, honouring the legacy `fic_log_path` key.
    #[must_use]
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file_path
            .as_deref()
            .or(self.fic_log_path.as_deref())
    }

    /// Interval between monitor cycle starts.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"))
}
