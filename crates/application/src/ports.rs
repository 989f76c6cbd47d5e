use booklog_domain::NotificationPermission;
use chrono::{DateTime, FixedOffset, Utc};

use crate::ApplicationError;

/// String-keyed document store with browser local-storage semantics.
pub trait LocalStorage {
    fn initialize(&self) -> Result<(), ApplicationError>;

    fn get_item(&self, key: &str) -> Result<Option<String>, ApplicationError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), ApplicationError>;

    fn remove_item(&self, key: &str) -> Result<(), ApplicationError>;
}

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Offset of the user's wall clock; reminders and daily stats follow it.
    fn local_offset(&self) -> FixedOffset;

    fn local_now(&self) -> DateTime<FixedOffset> {
        self.now().with_timezone(&self.local_offset())
    }
}

pub trait IdGenerator {
    fn next_id(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

pub trait Notifier {
    fn request_permission(&self) -> Result<NotificationPermission, ApplicationError>;

    fn notify(&self, notification: &Notification) -> Result<(), ApplicationError>;
}
