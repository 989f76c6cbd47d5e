use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{ApplicationError, LocalStorage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKey {
    Books,
    Logs,
    Reminders,
    DisplayMode,
}

impl StorageKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Books => "reading_app_books",
            Self::Logs => "reading_app_logs",
            Self::Reminders => "reading_app_reminders",
            Self::DisplayMode => "reading_app_display_mode",
        }
    }
}

/// Missing keys load as `T::default()`.
pub(crate) fn load_document<T>(
    storage: &dyn LocalStorage,
    key: StorageKey,
) -> Result<T, ApplicationError>
where
    T: DeserializeOwned + Default,
{
    match storage.get_item(key.as_str())? {
        Some(raw) => serde_json::from_str(&raw).map_err(|error| {
            ApplicationError::Decode(format!("{}: {error}", key.as_str()))
        }),
        None => Ok(T::default()),
    }
}

pub(crate) fn remove_document(
    storage: &dyn LocalStorage,
    key: StorageKey,
) -> Result<(), ApplicationError> {
    storage.remove_item(key.as_str())?;
    tracing::debug!(key = key.as_str(), "removed document");
    Ok(())
}

pub(crate) fn save_document<T>(
    storage: &dyn LocalStorage,
    key: StorageKey,
    value: &T,
) -> Result<(), ApplicationError>
where
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value)
        .map_err(|error| ApplicationError::Persistence(error.to_string()))?;
    storage.set_item(key.as_str(), &raw)?;
    tracing::debug!(key = key.as_str(), bytes = raw.len(), "saved document");
    Ok(())
}
