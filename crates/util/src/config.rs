//! Runtime configuration for the Formwright CLI/TUI.
//!
//! Settings come from an optional JSON file (`~/.config/formwright/config.json` on most
//! platforms) and are then overridden by environment variables. Every setting has a
//! default, so a missing file is not an error. A file that cannot be parsed is logged
//! and ignored.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use dirs_next::config_dir;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::expand_tilde;

/// Environment variable overriding the configuration file path.
pub const CONFIG_PATH_ENV: &str = "FORMWRIGHT_CONFIG_PATH";
/// Environment variable overriding the directory definitions are looked up in.
pub const FORMS_DIR_ENV: &str = "FORMWRIGHT_FORMS_DIR";
/// Environment variable overriding the directory exports are written to.
pub const EXPORT_DIR_ENV: &str = "FORMWRIGHT_EXPORT_DIR";
/// Environment variable overriding the log file used while the TUI runs.
pub const LOG_PATH_ENV: &str = "FORMWRIGHT_LOG_PATH";

pub const CONFIG_FILE_NAME: &str = "config.json";
const APP_DIR_NAME: &str = "formwright";
const DEFAULT_LOG_FILTER: &str = "info";

/// Error surfaced when the configuration file exists but cannot be read.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// On-disk shape of the configuration file. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub forms_dir: Option<String>,
    pub export_dir: Option<String>,
    pub log_path: Option<String>,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: Option<String>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormwrightConfig {
    pub config_path: PathBuf,
    pub forms_dir: PathBuf,
    pub export_dir: PathBuf,
    pub log_path: PathBuf,
    pub log_filter: String,
}

impl FormwrightConfig {
    /// Loads the file at the default location and applies environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(default_config_path())
    }

    /// Loads the file at `path` and applies environment overrides.
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let config_path = path.into();
        let file = load_file(&config_path)?;
        Ok(Self::resolve(config_path, file))
    }

    fn resolve(config_path: PathBuf, file: ConfigFile) -> Self {
        let base_directory = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let forms_dir = env_path(FORMS_DIR_ENV)
            .or_else(|| file.forms_dir.as_deref().map(expand_tilde))
            .unwrap_or_else(|| base_directory.join("forms"));
        let export_dir = env_path(EXPORT_DIR_ENV)
            .or_else(|| file.export_dir.as_deref().map(expand_tilde))
            .unwrap_or_else(|| forms_dir.clone());
        let log_path = env_path(LOG_PATH_ENV)
            .or_else(|| file.log_path.as_deref().map(expand_tilde))
            .unwrap_or_else(|| base_directory.join("logs").join("formwright.log"));
        let log_filter = file
            .log_filter
            .filter(|filter| !filter.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Self {
            config_path,
            forms_dir,
            export_dir,
            log_path,
            log_filter,
        }
    }
}

/// Path of the configuration file, honoring [`CONFIG_PATH_ENV`].
pub fn default_config_path() -> PathBuf {
    if let Some(path) = env_path(CONFIG_PATH_ENV) {
        return path;
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}

fn env_path(key: &str) -> Option<PathBuf> {
    let value = env::var(key).ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(expand_tilde(trimmed)) }
}

fn load_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    match fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(file) => Ok(file),
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "Failed to parse config file; using defaults"
                );
                Ok(ConfigFile::default())
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OVERRIDES: [(&str, Option<&str>); 3] = [(FORMS_DIR_ENV, None), (EXPORT_DIR_ENV, None), (LOG_PATH_ENV, None)];

    #[test]
    fn missing_file_yields_defaults_next_to_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        let config = temp_env::with_vars(OVERRIDES, || FormwrightConfig::load_from(&path)).expect("defaults");
        assert_eq!(config.forms_dir, dir.path().join("forms"));
        assert_eq!(config.export_dir, dir.path().join("forms"));
        assert_eq!(config.log_path, dir.path().join("logs").join("formwright.log"));
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn file_values_are_used_and_env_wins() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"forms_dir": "/srv/forms", "export_dir": "/srv/out", "log_filter": "formwright_engine=debug"}"#)
            .expect("write config");

        let from_file = temp_env::with_vars(OVERRIDES, || FormwrightConfig::load_from(&path)).expect("file config");
        assert_eq!(from_file.forms_dir, PathBuf::from("/srv/forms"));
        assert_eq!(from_file.export_dir, PathBuf::from("/srv/out"));
        assert_eq!(from_file.log_filter, "formwright_engine=debug");

        let overridden = temp_env::with_vars(
            [(FORMS_DIR_ENV, Some("/tmp/elsewhere")), (EXPORT_DIR_ENV, Some("  ")), (LOG_PATH_ENV, None)],
            || FormwrightConfig::load_from(&path),
        )
        .expect("env config");
        assert_eq!(overridden.forms_dir, PathBuf::from("/tmp/elsewhere"));
        assert_eq!(overridden.export_dir, PathBuf::from("/srv/out"));
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").expect("write config");
        let config = temp_env::with_vars(OVERRIDES, || FormwrightConfig::load_from(&path)).expect("fallback");
        assert_eq!(config.forms_dir, dir.path().join("forms"));
    }

    #[test]
    fn config_path_honors_env_override() {
        let path = temp_env::with_var(CONFIG_PATH_ENV, Some("/etc/formwright.json"), default_config_path);
        assert_eq!(path, PathBuf::from("/etc/formwright.json"));
    }

    #[test]
    fn directory_in_place_of_file_is_an_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = FormwrightConfig::load_from(dir.path());
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
