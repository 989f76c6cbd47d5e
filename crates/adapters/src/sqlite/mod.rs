mod queries;

use std::fs;
use std::path::PathBuf;

use booklog_application::{ApplicationError, LocalStorage};
use rusqlite::Connection;

use crate::migrations::MIGRATIONS;

/// Local storage backed by a single key/value table in a SQLite file.
#[derive(Debug, Clone)]
pub struct SqliteLocalStorage {
    path: PathBuf,
}

impl SqliteLocalStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn open_connection(&self) -> Result<Connection, ApplicationError> {
        Connection::open(&self.path)
            .map_err(|error| ApplicationError::Persistence(error.to_string()))
    }
}

impl LocalStorage for SqliteLocalStorage {
    fn initialize(&self) -> Result<(), ApplicationError> {
        if self.path.as_os_str().is_empty() {
            return Err(ApplicationError::InvalidInput(
                "storage path must not be empty".to_string(),
            ));
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|error| ApplicationError::Io(error.to_string()))?;
            }
        }

        let conn = self.open_connection()?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(|error| ApplicationError::Persistence(error.to_string()))?;

        for migration in MIGRATIONS {
            conn.execute_batch(migration)
                .map_err(|error| ApplicationError::Persistence(error.to_string()))?;
        }

        tracing::debug!(path = %self.path.display(), "storage initialized");
        Ok(())
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, ApplicationError> {
        let conn = self.open_connection()?;
        queries::get_item(&conn, key)
            .map_err(|error| ApplicationError::Persistence(error.to_string()))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), ApplicationError> {
        let conn = self.open_connection()?;
        let now = chrono::Utc::now().to_rfc3339();
        queries::set_item(&conn, key, value, &now)
            .map_err(|error| ApplicationError::Persistence(error.to_string()))
    }

    fn remove_item(&self, key: &str) -> Result<(), ApplicationError> {
        let conn = self.open_connection()?;
        queries::remove_item(&conn, key)
            .map_err(|error| ApplicationError::Persistence(error.to_string()))
    }
}
