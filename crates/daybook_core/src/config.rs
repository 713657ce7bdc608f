//! Process-wide startup configuration.
//!
//! # Responsibility
//! - Resolve store paths, log settings, and the theme preference once at
//!   startup; everything downstream receives the loaded value.
//!
//! # Invariants
//! - A missing config file yields defaults; an unreadable or malformed one
//!   is an error, never a silent fallback.

use crate::logging;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Config file name under the platform config directory.
pub const CONFIG_FILE: &str = "daybook.toml";

/// UI theme preference, persisted rather than read from ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    Dark,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Parse(err) => write!(f, "config file is malformed: {err}"),
            Self::Serialize(err) => write!(f, "config failed to serialize: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Startup configuration, loaded once and injected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Account store database file.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    /// Directory holding the guest key-value documents.
    #[serde(default = "default_guest_store_dir")]
    pub guest_store_dir: PathBuf,
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_theme")]
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            guest_store_dir: default_guest_store_dir(),
            log_dir: default_log_dir(),
            log_level: default_log_level(),
            theme: default_theme(),
        }
    }
}

impl Config {
    /// Loads the config file, falling back to defaults when it is absent.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(raw) => toml::from_str(&raw).map_err(ConfigError::Parse),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        fs::write(path, raw)?;
        Ok(())
    }

    /// Platform default location of the config file.
    pub fn default_path() -> PathBuf {
        match project_dirs() {
            Some(dirs) => dirs.config_dir().join(CONFIG_FILE),
            None => PathBuf::from(CONFIG_FILE),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "daybook")
}

fn data_dir() -> PathBuf {
    match project_dirs() {
        Some(dirs) => dirs.data_dir().to_path_buf(),
        None => PathBuf::from("."),
    }
}

fn default_database_path() -> PathBuf {
    data_dir().join("daybook.db")
}

fn default_guest_store_dir() -> PathBuf {
    data_dir().join("guest")
}

fn default_log_dir() -> PathBuf {
    data_dir().join("logs")
}

fn default_log_level() -> String {
    logging::default_log_level().to_string()
}

fn default_theme() -> Theme {
    Theme::Light
}

#[cfg(test)]
mod tests {
    use super::{Config, ConfigError, Theme};

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        let config =
            Config::load(&dir.path().join("absent.toml")).expect("absent file should load");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        let path = dir.path().join("nested").join("daybook.toml");

        let mut config = Config::default();
        config.theme = Theme::Dark;
        config.log_level = "warn".to_string();
        config.save(&path).expect("save should succeed");

        let loaded = Config::load(&path).expect("saved file should load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn malformed_file_is_an_error_not_a_fallback() {
        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        let path = dir.path().join("daybook.toml");
        std::fs::write(&path, "theme = [nonsense").expect("write should succeed");

        let err = Config::load(&path).expect_err("malformed file must error");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn partial_file_fills_remaining_fields_with_defaults() {
        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        let path = dir.path().join("daybook.toml");
        std::fs::write(&path, "theme = \"dark\"\n").expect("write should succeed");

        let config = Config::load(&path).expect("partial file should load");
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.database_path, Config::default().database_path);
    }
}
