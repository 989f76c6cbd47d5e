use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use booklog_domain::NotificationPermission;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MIN_POLL_SECS: u64 = 10;
const MAX_POLL_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage_path: PathBuf,
    pub reminder_poll_interval_secs: u64,
    pub notification_permission: NotificationPermission,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_path: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("booklog")
                .join("storage.sqlite3"),
            reminder_poll_interval_secs: 30,
            notification_permission: NotificationPermission::Default,
            log_filter: "warn".to_string(),
        }
    }
}

impl AppConfig {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("booklog")
            .join("config.json")
    }

    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(
            self.reminder_poll_interval_secs
                .clamp(MIN_POLL_SECS, MAX_POLL_SECS),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_uses_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let config = AppConfig::load(&dir.path().join("config.json")).expect("load");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.poll_interval(), Duration::from_secs(30));
        assert!(config.storage_path.ends_with("booklog/storage.sqlite3"));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"notification_permission":"granted","reminder_poll_interval_secs":2}"#,
        )
        .expect("write");

        let config = AppConfig::load(&path).expect("load");
        assert_eq!(
            config.notification_permission,
            NotificationPermission::Granted
        );
        assert_eq!(config.poll_interval(), Duration::from_secs(10));
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn poll_interval_never_exceeds_half_a_minute() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"reminder_poll_interval_secs":60}"#).expect("write");

        let config = AppConfig::load(&path).expect("load");
        assert_eq!(config.poll_interval(), Duration::from_secs(30));
    }

    #[test]
    fn malformed_file_is_reported() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("config.json");
        fs::write(&path, "{").expect("write");
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
