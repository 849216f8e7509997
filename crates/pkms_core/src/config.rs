//! Data directory configuration.
//!
//! # Responsibility
//! - Resolve the data directory from an explicit override, the environment,
//!   or a platform default.
//! - Derive the backing file paths handed to the store.
//!
//! # Invariants
//! - The store never reads an ambient global path; it only sees `StoreConfig`.

use crate::model::record::RecordKind;
use std::path::{Path, PathBuf};

/// Environment variable consulted when no explicit override is given.
pub const DATA_DIR_ENV: &str = "PKMS_DATA_DIR";

const DEFAULT_DIR_NAME: &str = "pkms";
const DEFAULT_HIDDEN_DIR_NAME: &str = ".pkms";
const LOG_DIR_NAME: &str = "logs";

/// Explicit location of one store's files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
}

impl StoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Resolves the data directory: override, then `PKMS_DATA_DIR`, then default.
    pub fn resolve(data_dir_override: Option<&Path>) -> Self {
        let env_dir = std::env::var_os(DATA_DIR_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        let data_dir = data_dir_override
            .map(Path::to_path_buf)
            .or(env_dir)
            .map(|path| absolutize(&path))
            .unwrap_or_else(default_data_dir);
        Self { data_dir }
    }

    /// Backing JSON file for one collection.
    pub fn collection_path(&self, kind: RecordKind) -> PathBuf {
        self.data_dir.join(kind.file_name())
    }

    /// Directory used by the CLI for rolling log files.
    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }
}

/// Platform default data directory.
///
/// - Windows: `%APPDATA%\pkms` (falls back to `<home>\AppData\Roaming\pkms`).
/// - Elsewhere: `$HOME/.pkms`.
pub fn default_data_dir() -> PathBuf {
    if cfg!(windows) {
        let app_data = std::env::var_os("APPDATA")
            .map(PathBuf::from)
            .unwrap_or_else(|| home_dir().join("AppData").join("Roaming"));
        return app_data.join(DEFAULT_DIR_NAME);
    }
    home_dir().join(DEFAULT_HIDDEN_DIR_NAME)
}

fn absolutize(path: &Path) -> PathBuf {
    let expanded = expand_home(path);
    if expanded.is_absolute() {
        expanded
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(expanded)
    }
}

fn expand_home(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    if raw == "~" {
        return home_dir();
    }
    if let Some(suffix) = raw.strip_prefix("~/") {
        return home_dir().join(suffix);
    }
    path.to_path_buf()
}

fn home_dir() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        return PathBuf::from(home);
    }
    if let Some(profile) = std::env::var_os("USERPROFILE") {
        return PathBuf::from(profile);
    }
    PathBuf::from(".")
}
