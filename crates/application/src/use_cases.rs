use booklog_domain::{BookId, BookStatus, Cover, DisplayMode, ReminderDay};

#[derive(Debug, Clone, Default)]
pub struct BootstrapCommand;

#[derive(Debug, Clone, Default)]
pub struct AddBookCommand {
    pub title: String,
    pub authors: Vec<String>,
    pub status: Option<BookStatus>,
    pub category: Option<String>,
    pub cover: Cover,
}

/// `None` leaves a field untouched; `category: Some(None)` clears it.
#[derive(Debug, Clone)]
pub struct UpdateBookCommand {
    pub book_id: BookId,
    pub title: Option<String>,
    pub authors: Option<Vec<String>>,
    pub category: Option<Option<String>>,
    pub cover: Option<Cover>,
}

#[derive(Debug, Clone)]
pub struct DeleteBookCommand {
    pub book_id: BookId,
}

#[derive(Debug, Clone)]
pub struct CompleteBookCommand {
    pub book_id: BookId,
}

#[derive(Debug, Clone)]
pub struct UndoCompleteCommand {
    pub book_id: BookId,
}

#[derive(Debug, Clone)]
pub struct StartBookCommand {
    pub book_id: BookId,
}

#[derive(Debug, Clone, Default)]
pub struct ListBooksQuery {
    pub status: Option<BookStatus>,
    pub category: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FindBookQuery {
    pub book_id: BookId,
}

#[derive(Debug, Clone)]
pub struct StartSessionCommand {
    pub book_id: BookId,
}

#[derive(Debug, Clone, Default)]
pub struct StopSessionCommand;

#[derive(Debug, Clone, Default)]
pub struct CancelSessionCommand;

#[derive(Debug, Clone, Default)]
pub struct ListLogsQuery {
    pub book_id: Option<BookId>,
}

#[derive(Debug, Clone)]
pub struct DeleteLogCommand {
    pub log_id: String,
}

#[derive(Debug, Clone)]
pub struct StatsQuery {
    pub days: u32,
}

impl Default for StatsQuery {
    fn default() -> Self {
        Self { days: 7 }
    }
}

#[derive(Debug, Clone)]
pub struct SetReminderCommand {
    pub day: ReminderDay,
    pub time: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ShowRemindersQuery;

#[derive(Debug, Clone, Default)]
pub struct PollRemindersCommand;

#[derive(Debug, Clone, Copy)]
pub struct SetDisplayModeCommand {
    pub mode: DisplayMode,
}
