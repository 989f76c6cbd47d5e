use std::cell::RefCell;
use std::io::{Stdout, Write};

use booklog_application::{ApplicationError, Notification, Notifier};
use booklog_domain::NotificationPermission;

/// Terminal notification: rings the bell and prints one line. The permission
/// comes from configuration since a terminal has no permission prompt.
pub struct ConsoleNotifier<W: Write = Stdout> {
    permission: NotificationPermission,
    out: RefCell<W>,
}

impl ConsoleNotifier<Stdout> {
    pub fn stdout(permission: NotificationPermission) -> Self {
        Self::new(permission, std::io::stdout())
    }
}

impl<W: Write> ConsoleNotifier<W> {
    pub fn new(permission: NotificationPermission, out: W) -> Self {
        Self {
            permission,
            out: RefCell::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write> Notifier for ConsoleNotifier<W> {
    fn request_permission(&self) -> Result<NotificationPermission, ApplicationError> {
        if self.permission == NotificationPermission::Default {
            tracing::warn!(
                "notification permission not configured; set notification_permission to \"granted\" to enable reminders"
            );
        }
        Ok(self.permission)
    }

    fn notify(&self, notification: &Notification) -> Result<(), ApplicationError> {
        if !self.permission.is_granted() {
            return Err(ApplicationError::Notification(format!(
                "permission is {}",
                self.permission
            )));
        }
        let mut out = self.out.borrow_mut();
        writeln!(out, "\x07[{}] {}", notification.title, notification.body)
            .and_then(|_| out.flush())
            .map_err(|error| ApplicationError::Io(error.to_string()))
    }
}
