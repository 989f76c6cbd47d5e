use booklog_domain::{ActiveSession, Book, BookId, DisplayMode, ReadingLog, ReminderSchedule};

/// In-memory mirror of the persisted documents plus the transient session.
#[derive(Debug, Clone, Default)]
pub struct LibraryState {
    pub books: Vec<Book>,
    pub logs: Vec<ReadingLog>,
    pub reminders: ReminderSchedule,
    pub display_mode: DisplayMode,
    pub active_session: Option<ActiveSession>,
}

impl LibraryState {
    pub fn book(&self, book_id: &BookId) -> Option<&Book> {
        self.books.iter().find(|book| &book.id == book_id)
    }

    pub fn book_position(&self, book_id: &BookId) -> Option<usize> {
        self.books.iter().position(|book| &book.id == book_id)
    }

    pub fn seconds_for(&self, book_id: &BookId) -> u64 {
        booklog_domain::total_seconds(self.logs.iter().filter(|log| &log.book_id == book_id))
    }
}
