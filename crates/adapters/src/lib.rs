pub mod migrations;
pub mod presenters;
pub mod sqlite;
pub mod system;

pub use presenters::{
    format_clock, format_duration, present_book_detail, present_book_row, present_cover,
    present_log_row, present_reminders, present_stats,
};
pub use sqlite::SqliteLocalStorage;
pub use system::{ConsoleNotifier, SystemClock, UuidIdGenerator};
