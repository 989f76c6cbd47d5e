mod book;
mod error;
mod log;
mod preferences;
mod reminder;
mod session;
mod stats;

pub use book::{Book, BookId, BookStatus, Cover, CoverColor, NewBook, UNKNOWN_AUTHOR};
pub use error::DomainError;
pub use log::{total_seconds, ReadingLog};
pub use preferences::{DisplayMode, NotificationPermission};
pub use reminder::{ReminderDay, ReminderSchedule};
pub use session::ActiveSession;
pub use stats::{
    daily_totals, recent_history, BookTotal, CategoryTotal, DailyTotal, HistoryEntry,
    ReadingStats, StatsWindow, MAX_STATS_DAYS, RECENT_HISTORY_LIMIT, UNCATEGORIZED,
};
