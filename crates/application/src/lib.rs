mod documents;
mod error;
mod ports;
mod reminders;
mod service;
mod state;
mod use_cases;

pub use documents::StorageKey;
pub use error::ApplicationError;
pub use ports::{Clock, IdGenerator, LocalStorage, Notification, Notifier};
pub use reminders::{ReminderDue, ReminderPoller};
pub use service::{ApplicationService, DeleteBookReport};
pub use state::LibraryState;
pub use use_cases::{
    AddBookCommand, BootstrapCommand, CancelSessionCommand, CompleteBookCommand,
    DeleteBookCommand, DeleteLogCommand, FindBookQuery, ListBooksQuery, ListLogsQuery,
    PollRemindersCommand, SetDisplayModeCommand, SetReminderCommand, ShowRemindersQuery,
    StartBookCommand, StartSessionCommand, StatsQuery, StopSessionCommand, UndoCompleteCommand,
    UpdateBookCommand,
};
