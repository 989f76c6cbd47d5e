use booklog_domain::{
    ActiveSession, Book, BookId, BookStatus, DisplayMode, NewBook, NotificationPermission,
    ReadingLog, ReadingStats, ReminderSchedule, StatsWindow,
};
use chrono::{DateTime, FixedOffset};

use crate::documents::{load_document, remove_document, save_document, StorageKey};
use crate::{
    AddBookCommand, ApplicationError, BootstrapCommand, CancelSessionCommand, Clock,
    CompleteBookCommand, DeleteBookCommand, DeleteLogCommand, FindBookQuery, IdGenerator,
    LibraryState, ListBooksQuery, ListLogsQuery, LocalStorage, Notification, Notifier,
    PollRemindersCommand, ReminderDue, ReminderPoller, SetDisplayModeCommand, SetReminderCommand,
    ShowRemindersQuery, StartBookCommand, StartSessionCommand, StatsQuery, StopSessionCommand,
    UndoCompleteCommand, UpdateBookCommand,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteBookReport {
    pub book: Book,
    pub removed_logs: usize,
}

pub struct ApplicationService {
    storage: Box<dyn LocalStorage>,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdGenerator>,
    notifier: Box<dyn Notifier>,
    state: LibraryState,
    poller: ReminderPoller,
    permission: Option<NotificationPermission>,
}

impl ApplicationService {
    pub fn new(
        storage: Box<dyn LocalStorage>,
        clock: Box<dyn Clock>,
        ids: Box<dyn IdGenerator>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            storage,
            clock,
            ids,
            notifier,
            state: LibraryState::default(),
            poller: ReminderPoller::new(),
            permission: None,
        }
    }

    pub fn bootstrap(&mut self, _command: BootstrapCommand) -> Result<(), ApplicationError> {
        self.storage.initialize()?;
        let storage = self.storage.as_ref();
        self.state = LibraryState {
            books: load_document(storage, StorageKey::Books)?,
            logs: load_document(storage, StorageKey::Logs)?,
            reminders: load_document(storage, StorageKey::Reminders)?,
            display_mode: load_document(storage, StorageKey::DisplayMode)?,
            active_session: None,
        };
        tracing::info!(
            books = self.state.books.len(),
            logs = self.state.logs.len(),
            "library loaded"
        );
        Ok(())
    }

    pub fn state(&self) -> &LibraryState {
        &self.state
    }

    pub fn local_now(&self) -> DateTime<FixedOffset> {
        self.clock.local_now()
    }

    pub fn add_book(&mut self, command: AddBookCommand) -> Result<Book, ApplicationError> {
        let book_id = BookId::new(self.ids.next_id())?;
        let book = Book::create(
            book_id,
            NewBook {
                title: command.title,
                authors: command.authors,
                status: command.status,
                category: command.category,
                cover: command.cover,
            },
            self.clock.now(),
        )?;

        let mut books = self.state.books.clone();
        books.insert(0, book.clone());
        self.commit_books(books)?;
        tracing::info!(book_id = %book.id, title = %book.title, "book added");
        Ok(book)
    }

    pub fn update_book(&mut self, command: UpdateBookCommand) -> Result<Book, ApplicationError> {
        let index = self.require_book(&command.book_id)?;
        let mut books = self.state.books.clone();
        let book = &mut books[index];

        if let Some(title) = command.title.as_deref() {
            book.rename(title)?;
        }
        if let Some(authors) = command.authors {
            book.set_authors(authors);
        }
        if let Some(category) = command.category {
            book.set_category(category);
        }
        if let Some(cover) = command.cover {
            book.cover = cover;
        }

        let updated = book.clone();
        self.commit_books(books)?;
        if let Some(session) = self.state.active_session.as_mut() {
            if session.book_id == updated.id {
                session.book_title = updated.title.clone();
            }
        }
        tracing::info!(book_id = %updated.id, "book updated");
        Ok(updated)
    }

    pub fn delete_book(
        &mut self,
        command: DeleteBookCommand,
    ) -> Result<DeleteBookReport, ApplicationError> {
        let index = self.require_book(&command.book_id)?;
        let mut books = self.state.books.clone();
        let book = books.remove(index);

        let before = self.state.logs.len();
        let logs: Vec<ReadingLog> = self
            .state
            .logs
            .iter()
            .filter(|log| log.book_id != book.id)
            .cloned()
            .collect();
        let removed_logs = before - logs.len();

        // Logs go first so a failed write never leaves logs without their book.
        let previous_logs = self.state.logs.clone();
        self.commit_logs(logs)?;
        if let Err(error) = self.commit_books(books) {
            if let Err(restore) = self.commit_logs(previous_logs) {
                tracing::error!(book_id = %book.id, %restore, "failed to restore logs");
            }
            return Err(error);
        }

        if self
            .state
            .active_session
            .as_ref()
            .is_some_and(|session| session.book_id == book.id)
        {
            self.state.active_session = None;
            tracing::warn!(book_id = %book.id, "discarded session for deleted book");
        }

        tracing::info!(book_id = %book.id, removed_logs, "book deleted");
        Ok(DeleteBookReport { book, removed_logs })
    }

    pub fn complete_book(&mut self, command: CompleteBookCommand) -> Result<Book, ApplicationError> {
        self.change_status(&command.book_id, |book, now| book.complete(now))
    }

    pub fn undo_complete(&mut self, command: UndoCompleteCommand) -> Result<Book, ApplicationError> {
        self.change_status(&command.book_id, |book, now| book.reopen(now))
    }

    pub fn start_book(&mut self, command: StartBookCommand) -> Result<Book, ApplicationError> {
        self.change_status(&command.book_id, |book, now| book.start(now))
    }

    pub fn list_books(&self, query: ListBooksQuery) -> Vec<Book> {
        let category = query
            .category
            .as_deref()
            .map(|value| value.trim().to_lowercase());
        self.state
            .books
            .iter()
            .filter(|book| query.status.map_or(true, |status| book.status == status))
            .filter(|book| match &category {
                Some(wanted) => book
                    .category
                    .as_deref()
                    .is_some_and(|value| value.to_lowercase() == *wanted),
                None => true,
            })
            .cloned()
            .collect()
    }

    pub fn find_book(&self, query: FindBookQuery) -> Result<Book, ApplicationError> {
        self.state
            .book(&query.book_id)
            .cloned()
            .ok_or_else(|| book_not_found(&query.book_id))
    }

    pub fn book_total_seconds(&self, book_id: &BookId) -> u64 {
        self.state.seconds_for(book_id)
    }

    pub fn start_session(
        &mut self,
        command: StartSessionCommand,
    ) -> Result<ActiveSession, ApplicationError> {
        if let Some(active) = &self.state.active_session {
            return Err(ApplicationError::InvalidInput(format!(
                "a session for {:?} is already running",
                active.book_title
            )));
        }
        let book = self
            .state
            .book(&command.book_id)
            .ok_or_else(|| book_not_found(&command.book_id))?;
        if book.status != BookStatus::Reading {
            return Err(ApplicationError::InvalidInput(format!(
                "book {} is {}; only books in progress can be read",
                book.id, book.status
            )));
        }

        let session = ActiveSession::begin(book, self.clock.now());
        tracing::info!(book_id = %session.book_id, started_at = %session.started_at, "session started");
        self.state.active_session = Some(session.clone());
        Ok(session)
    }

    pub fn active_session(&self) -> Option<&ActiveSession> {
        self.state.active_session.as_ref()
    }

    pub fn session_elapsed_seconds(&self) -> Option<u64> {
        self.state
            .active_session
            .as_ref()
            .map(|session| session.elapsed_seconds(self.clock.now()))
    }

    pub fn stop_session(
        &mut self,
        _command: StopSessionCommand,
    ) -> Result<ReadingLog, ApplicationError> {
        let session = self
            .state
            .active_session
            .take()
            .ok_or_else(|| ApplicationError::NotFound("no active session".to_string()))?;
        if self.state.book(&session.book_id).is_none() {
            return Err(book_not_found(&session.book_id));
        }

        let log = session.finish(self.ids.next_id(), self.clock.now())?;
        let mut logs = self.state.logs.clone();
        logs.insert(0, log.clone());
        if let Err(error) = self.commit_logs(logs) {
            self.state.active_session = Some(session);
            return Err(error);
        }
        tracing::info!(
            book_id = %log.book_id,
            duration_seconds = log.duration_seconds,
            "session recorded"
        );
        Ok(log)
    }

    pub fn cancel_session(
        &mut self,
        _command: CancelSessionCommand,
    ) -> Result<ActiveSession, ApplicationError> {
        let session = self
            .state
            .active_session
            .take()
            .ok_or_else(|| ApplicationError::NotFound("no active session".to_string()))?;
        tracing::info!(book_id = %session.book_id, "session discarded");
        Ok(session)
    }

    pub fn list_logs(&self, query: ListLogsQuery) -> Vec<ReadingLog> {
        self.state
            .logs
            .iter()
            .filter(|log| query.book_id.as_ref().map_or(true, |id| &log.book_id == id))
            .cloned()
            .collect()
    }

    pub fn delete_log(&mut self, command: DeleteLogCommand) -> Result<ReadingLog, ApplicationError> {
        let index = self
            .state
            .logs
            .iter()
            .position(|log| log.id == command.log_id)
            .ok_or_else(|| {
                ApplicationError::NotFound(format!("log not found for id={}", command.log_id))
            })?;
        let mut logs = self.state.logs.clone();
        let removed = logs.remove(index);
        self.commit_logs(logs)?;
        tracing::info!(log_id = %removed.id, "log deleted");
        Ok(removed)
    }

    pub fn stats(&self, query: StatsQuery) -> ReadingStats {
        let now = self.clock.local_now();
        ReadingStats::compute(
            &self.state.books,
            &self.state.logs,
            StatsWindow {
                today: now.date_naive(),
                days: query.days,
                offset: *now.offset(),
            },
        )
    }

    pub fn set_reminder(
        &mut self,
        command: SetReminderCommand,
    ) -> Result<ReminderSchedule, ApplicationError> {
        let mut reminders = self.state.reminders.clone();
        reminders.set(command.day, command.time.as_deref())?;
        if reminders.is_empty() {
            remove_document(self.storage.as_ref(), StorageKey::Reminders)?;
        } else {
            save_document(self.storage.as_ref(), StorageKey::Reminders, &reminders)?;
        }
        self.state.reminders = reminders.clone();
        tracing::info!(day = %command.day, time = ?command.time, "reminder updated");
        Ok(reminders)
    }

    pub fn reminders(&self, _query: ShowRemindersQuery) -> ReminderSchedule {
        self.state.reminders.clone()
    }

    /// Asks the notifier at most once per service lifetime.
    pub fn notification_permission(&mut self) -> Result<NotificationPermission, ApplicationError> {
        if let Some(permission) = self.permission {
            return Ok(permission);
        }
        let permission = self.notifier.request_permission()?;
        tracing::info!(%permission, "notification permission resolved");
        self.permission = Some(permission);
        Ok(permission)
    }

    pub fn poll_reminders(
        &mut self,
        _command: PollRemindersCommand,
    ) -> Result<Option<ReminderDue>, ApplicationError> {
        if self.state.reminders.is_empty() {
            return Ok(None);
        }
        if !self.notification_permission()?.is_granted() {
            tracing::debug!("reminder check skipped: notifications not granted");
            return Ok(None);
        }

        let now = self.clock.local_now().naive_local();
        let Some(due) = self.poller.poll(&self.state.reminders, now) else {
            return Ok(None);
        };

        let in_progress = self
            .state
            .books
            .iter()
            .filter(|book| book.status == BookStatus::Reading)
            .count();
        self.notifier.notify(&Notification {
            title: "Time to read".to_string(),
            body: reminder_body(due.time.format("%H:%M").to_string(), in_progress),
        })?;
        tracing::info!(day = %due.day, time = %due.time, "reminder fired");
        Ok(Some(due))
    }

    pub fn set_display_mode(&mut self, command: SetDisplayModeCommand) -> Result<(), ApplicationError> {
        save_document(self.storage.as_ref(), StorageKey::DisplayMode, &command.mode)?;
        self.state.display_mode = command.mode;
        Ok(())
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.state.display_mode
    }

    fn require_book(&self, book_id: &BookId) -> Result<usize, ApplicationError> {
        self.state
            .book_position(book_id)
            .ok_or_else(|| book_not_found(book_id))
    }

    fn change_status<F>(&mut self, book_id: &BookId, apply: F) -> Result<Book, ApplicationError>
    where
        F: FnOnce(&mut Book, DateTime<chrono::Utc>) -> Result<(), booklog_domain::DomainError>,
    {
        let index = self.require_book(book_id)?;
        let mut books = self.state.books.clone();
        apply(&mut books[index], self.clock.now())?;
        let updated = books[index].clone();
        self.commit_books(books)?;
        tracing::info!(book_id = %updated.id, status = %updated.status, "status changed");
        Ok(updated)
    }

    fn commit_books(&mut self, books: Vec<Book>) -> Result<(), ApplicationError> {
        save_document(self.storage.as_ref(), StorageKey::Books, &books)?;
        self.state.books = books;
        Ok(())
    }

    fn commit_logs(&mut self, logs: Vec<ReadingLog>) -> Result<(), ApplicationError> {
        save_document(self.storage.as_ref(), StorageKey::Logs, &logs)?;
        self.state.logs = logs;
        Ok(())
    }
}

fn book_not_found(book_id: &BookId) -> ApplicationError {
    ApplicationError::NotFound(format!("book not found for id={book_id}"))
}

fn reminder_body(time: String, in_progress: usize) -> String {
    match in_progress {
        0 => format!("It's {time}. Pick a book to start."),
        1 => format!("It's {time}. Your book is waiting."),
        count => format!("It's {time}. {count} books are waiting."),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::rc::Rc;

    use booklog_domain::{Cover, CoverColor, ReminderDay};
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    #[derive(Default, Clone)]
    struct MemoryStorage {
        items: Rc<RefCell<HashMap<String, String>>>,
        fail_writes: Rc<Cell<bool>>,
        fail_key: Rc<RefCell<Option<&'static str>>>,
    }

    impl LocalStorage for MemoryStorage {
        fn initialize(&self) -> Result<(), ApplicationError> {
            Ok(())
        }

        fn get_item(&self, key: &str) -> Result<Option<String>, ApplicationError> {
            Ok(self.items.borrow().get(key).cloned())
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), ApplicationError> {
            if self.fail_writes.get() || *self.fail_key.borrow() == Some(key) {
                return Err(ApplicationError::Persistence("disk full".to_string()));
            }
            self.items
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove_item(&self, key: &str) -> Result<(), ApplicationError> {
            self.items.borrow_mut().remove(key);
            Ok(())
        }
    }

    #[derive(Clone)]
    struct FakeClock {
        now: Rc<Cell<DateTime<Utc>>>,
    }

    impl FakeClock {
        fn advance(&self, seconds: i64) {
            self.now.set(self.now.get() + Duration::seconds(seconds));
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> DateTime<Utc> {
            self.now.get()
        }

        fn local_offset(&self) -> FixedOffset {
            FixedOffset::east_opt(0).expect("utc offset")
        }
    }

    #[derive(Default)]
    struct SequentialIds {
        next: Cell<u32>,
    }

    impl IdGenerator for SequentialIds {
        fn next_id(&self) -> String {
            let value = self.next.get() + 1;
            self.next.set(value);
            format!("id-{value}")
        }
    }

    #[derive(Clone)]
    struct FakeNotifier {
        permission: NotificationPermission,
        requests: Rc<Cell<u32>>,
        sent: Rc<RefCell<Vec<Notification>>>,
    }

    impl Notifier for FakeNotifier {
        fn request_permission(&self) -> Result<NotificationPermission, ApplicationError> {
            self.requests.set(self.requests.get() + 1);
            Ok(self.permission)
        }

        fn notify(&self, notification: &Notification) -> Result<(), ApplicationError> {
            self.sent.borrow_mut().push(notification.clone());
            Ok(())
        }
    }

    struct Harness {
        service: ApplicationService,
        storage: MemoryStorage,
        clock: FakeClock,
        notifier: FakeNotifier,
    }

    fn harness_with(permission: NotificationPermission, storage: MemoryStorage) -> Harness {
        // 2025-01-01 is a Wednesday.
        let clock = FakeClock {
            now: Rc::new(Cell::new(
                Utc.with_ymd_and_hms(2025, 1, 1, 21, 29, 50)
                    .single()
                    .expect("start time"),
            )),
        };
        let notifier = FakeNotifier {
            permission,
            requests: Rc::default(),
            sent: Rc::default(),
        };
        let mut service = ApplicationService::new(
            Box::new(storage.clone()),
            Box::new(clock.clone()),
            Box::<SequentialIds>::default(),
            Box::new(notifier.clone()),
        );
        service.bootstrap(BootstrapCommand).expect("bootstrap");
        Harness {
            service,
            storage,
            clock,
            notifier,
        }
    }

    fn harness() -> Harness {
        harness_with(NotificationPermission::Granted, MemoryStorage::default())
    }

    fn add(service: &mut ApplicationService, title: &str) -> Book {
        service
            .add_book(AddBookCommand {
                title: title.to_string(),
                authors: vec!["Someone".to_string()],
                ..AddBookCommand::default()
            })
            .expect("add book")
    }

    #[test]
    fn empty_title_is_rejected_and_nothing_is_saved() {
        let mut h = harness();
        let result = h.service.add_book(AddBookCommand {
            title: "   ".to_string(),
            ..AddBookCommand::default()
        });
        assert!(matches!(
            result,
            Err(ApplicationError::Domain(booklog_domain::DomainError::EmptyTitle))
        ));
        assert!(h.service.list_books(ListBooksQuery::default()).is_empty());
        assert!(h.storage.items.borrow().get("reading_app_books").is_none());
    }

    #[test]
    fn new_books_appear_first() {
        let mut h = harness();
        add(&mut h.service, "First");
        let second = add(&mut h.service, "Second");

        let books = h.service.list_books(ListBooksQuery::default());
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].id, second.id);
        assert_eq!(books[0].title, "Second");
    }

    #[test]
    fn complete_then_undo_restores_reading_state() {
        let mut h = harness();
        let book = add(&mut h.service, "Dune");

        let completed = h
            .service
            .complete_book(CompleteBookCommand {
                book_id: book.id.clone(),
            })
            .expect("complete");
        assert_eq!(completed.status, BookStatus::Completed);
        assert_eq!(completed.completed_at, Some(h.clock.now()));

        let undone = h
            .service
            .undo_complete(UndoCompleteCommand {
                book_id: book.id.clone(),
            })
            .expect("undo");
        assert_eq!(undone.status, BookStatus::Reading);
        assert_eq!(undone.completed_at, None);
    }

    #[test]
    fn deleting_a_book_cascades_to_its_logs() {
        let mut h = harness();
        let keep = add(&mut h.service, "Keep");
        let gone = add(&mut h.service, "Drop");

        for book in [&keep, &gone, &gone] {
            h.service
                .start_session(StartSessionCommand {
                    book_id: book.id.clone(),
                })
                .expect("start");
            h.clock.advance(60);
            h.service.stop_session(StopSessionCommand).expect("stop");
        }

        let report = h
            .service
            .delete_book(DeleteBookCommand {
                book_id: gone.id.clone(),
            })
            .expect("delete");
        assert_eq!(report.removed_logs, 2);

        let logs = h.service.list_logs(ListLogsQuery::default());
        assert_eq!(logs.len(), 1);
        assert!(logs.iter().all(|log| log.book_id == keep.id));

        let stored = h
            .storage
            .items
            .borrow()
            .get("reading_app_logs")
            .cloned()
            .expect("logs document");
        assert!(!stored.contains(gone.id.as_str()));
    }

    fn book_with_two_logs(h: &mut Harness) -> Book {
        let book = add(&mut h.service, "Fragile");
        for _ in 0..2 {
            h.service
                .start_session(StartSessionCommand {
                    book_id: book.id.clone(),
                })
                .expect("start");
            h.clock.advance(60);
            h.service.stop_session(StopSessionCommand).expect("stop");
        }
        book
    }

    fn assert_book_and_logs_intact(h: &Harness, book: &Book) {
        assert!(h.service.state().book(&book.id).is_some());
        let logs = h.service.list_logs(ListLogsQuery {
            book_id: Some(book.id.clone()),
        });
        assert_eq!(logs.len(), 2);

        let reloaded = harness_with(NotificationPermission::Granted, h.storage.clone());
        assert!(reloaded.service.state().book(&book.id).is_some());
        assert_eq!(reloaded.service.state().logs.len(), 2);
    }

    #[test]
    fn failed_log_write_keeps_book_and_logs() {
        let mut h = harness();
        let book = book_with_two_logs(&mut h);
        *h.storage.fail_key.borrow_mut() = Some("reading_app_logs");

        assert!(h
            .service
            .delete_book(DeleteBookCommand {
                book_id: book.id.clone(),
            })
            .is_err());
        *h.storage.fail_key.borrow_mut() = None;
        assert_book_and_logs_intact(&h, &book);
    }

    #[test]
    fn failed_book_write_restores_logs() {
        let mut h = harness();
        let book = book_with_two_logs(&mut h);
        *h.storage.fail_key.borrow_mut() = Some("reading_app_books");

        assert!(h
            .service
            .delete_book(DeleteBookCommand {
                book_id: book.id.clone(),
            })
            .is_err());
        *h.storage.fail_key.borrow_mut() = None;
        assert_book_and_logs_intact(&h, &book);
    }

    #[test]
    fn stopping_after_125_seconds_records_125() {
        let mut h = harness();
        let book = add(&mut h.service, "Kokoro");
        let t0 = h.clock.now();

        h.service
            .start_session(StartSessionCommand {
                book_id: book.id.clone(),
            })
            .expect("start");
        h.clock.advance(125);
        assert_eq!(h.service.session_elapsed_seconds(), Some(125));

        let log = h.service.stop_session(StopSessionCommand).expect("stop");
        assert_eq!(log.duration_seconds, 125);
        assert_eq!(log.start_time, t0);
        assert_eq!(log.end_time, t0 + Duration::seconds(125));
        assert!(h.service.active_session().is_none());
        assert_eq!(h.service.book_total_seconds(&book.id), 125);
    }

    #[test]
    fn only_one_session_at_a_time() {
        let mut h = harness();
        let a = add(&mut h.service, "A");
        let b = add(&mut h.service, "B");
        h.service
            .start_session(StartSessionCommand { book_id: a.id })
            .expect("start");
        let second = h.service.start_session(StartSessionCommand { book_id: b.id });
        assert!(matches!(second, Err(ApplicationError::InvalidInput(_))));
    }

    #[test]
    fn wish_books_cannot_start_a_session_until_started() {
        let mut h = harness();
        let wish = h
            .service
            .add_book(AddBookCommand {
                title: "Someday".to_string(),
                status: Some(BookStatus::Wish),
                cover: Cover::Color(CoverColor::Rose),
                ..AddBookCommand::default()
            })
            .expect("add");

        let attempt = h.service.start_session(StartSessionCommand {
            book_id: wish.id.clone(),
        });
        assert!(matches!(attempt, Err(ApplicationError::InvalidInput(_))));

        h.service
            .start_book(StartBookCommand {
                book_id: wish.id.clone(),
            })
            .expect("start book");
        h.service
            .start_session(StartSessionCommand { book_id: wish.id })
            .expect("session now allowed");
    }

    #[test]
    fn cancel_discards_without_logging() {
        let mut h = harness();
        let book = add(&mut h.service, "A");
        h.service
            .start_session(StartSessionCommand { book_id: book.id })
            .expect("start");
        h.service
            .cancel_session(CancelSessionCommand)
            .expect("cancel");
        assert!(h.service.list_logs(ListLogsQuery::default()).is_empty());
        assert!(matches!(
            h.service.stop_session(StopSessionCommand),
            Err(ApplicationError::NotFound(_))
        ));
    }

    #[test]
    fn failed_save_keeps_session_open() {
        let mut h = harness();
        let book = add(&mut h.service, "A");
        h.service
            .start_session(StartSessionCommand { book_id: book.id })
            .expect("start");
        h.storage.fail_writes.set(true);
        assert!(h.service.stop_session(StopSessionCommand).is_err());
        assert!(h.service.active_session().is_some());
        assert!(h.service.list_logs(ListLogsQuery::default()).is_empty());
    }

    #[test]
    fn total_reading_time_is_sum_of_logs() {
        let mut h = harness();
        let a = add(&mut h.service, "A");
        let b = add(&mut h.service, "B");
        for (book, secs) in [(&a, 300), (&b, 45), (&a, 1200)] {
            h.service
                .start_session(StartSessionCommand {
                    book_id: book.id.clone(),
                })
                .expect("start");
            h.clock.advance(secs);
            h.service.stop_session(StopSessionCommand).expect("stop");
        }

        let stats = h.service.stats(StatsQuery::default());
        let sum: u64 = h
            .service
            .list_logs(ListLogsQuery::default())
            .iter()
            .map(|log| log.duration_seconds)
            .sum();
        assert_eq!(stats.total_seconds, 1545);
        assert_eq!(stats.total_seconds, sum);
    }

    #[test]
    fn update_book_edits_fields_and_keeps_status() {
        let mut h = harness();
        let book = add(&mut h.service, "Draft");
        let updated = h
            .service
            .update_book(UpdateBookCommand {
                book_id: book.id.clone(),
                title: Some("Final".to_string()),
                authors: Some(vec![]),
                category: Some(Some("Essay".to_string())),
                cover: Some(Cover::Url("https://example.com/c.jpg".to_string())),
            })
            .expect("update");
        assert_eq!(updated.title, "Final");
        assert_eq!(updated.primary_author(), booklog_domain::UNKNOWN_AUTHOR);
        assert_eq!(updated.category.as_deref(), Some("Essay"));
        assert_eq!(updated.status, BookStatus::Reading);

        let filtered = h.service.list_books(ListBooksQuery {
            category: Some("essay".to_string()),
            ..ListBooksQuery::default()
        });
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn state_survives_a_reload() {
        let storage = MemoryStorage::default();
        let mut first = harness_with(NotificationPermission::Granted, storage.clone());
        let book = add(&mut first.service, "Persisted");
        first
            .service
            .set_display_mode(SetDisplayModeCommand {
                mode: DisplayMode::Dark,
            })
            .expect("theme");
        first
            .service
            .set_reminder(SetReminderCommand {
                day: ReminderDay::Monday,
                time: Some("07:30".to_string()),
            })
            .expect("reminder");

        let second = harness_with(NotificationPermission::Granted, storage);
        let found = second
            .service
            .find_book(FindBookQuery { book_id: book.id })
            .expect("book reloads");
        assert_eq!(found.title, "Persisted");
        assert_eq!(second.service.display_mode(), DisplayMode::Dark);
        assert_eq!(
            second.service.reminders(ShowRemindersQuery).enabled().len(),
            1
        );
    }

    #[test]
    fn corrupt_document_is_a_decode_error() {
        let storage = MemoryStorage::default();
        storage
            .items
            .borrow_mut()
            .insert("reading_app_books".to_string(), "{not json".to_string());
        let mut service = ApplicationService::new(
            Box::new(storage),
            Box::new(FakeClock {
                now: Rc::new(Cell::new(Utc::now())),
            }),
            Box::<SequentialIds>::default(),
            Box::new(FakeNotifier {
                permission: NotificationPermission::Granted,
                requests: Rc::default(),
                sent: Rc::default(),
            }),
        );
        assert!(matches!(
            service.bootstrap(BootstrapCommand),
            Err(ApplicationError::Decode(_))
        ));
    }

    #[test]
    fn reminder_fires_once_per_minute_when_granted() {
        let mut h = harness();
        h.service
            .set_reminder(SetReminderCommand {
                day: ReminderDay::Wednesday,
                time: Some("21:30".to_string()),
            })
            .expect("reminder");

        assert_eq!(h.service.poll_reminders(PollRemindersCommand).expect("poll"), None);
        h.clock.advance(15);
        let due = h
            .service
            .poll_reminders(PollRemindersCommand)
            .expect("poll")
            .expect("due");
        assert_eq!(due.day, ReminderDay::Wednesday);
        h.clock.advance(30);
        assert_eq!(h.service.poll_reminders(PollRemindersCommand).expect("poll"), None);

        assert_eq!(h.notifier.sent.borrow().len(), 1);
        assert_eq!(h.notifier.requests.get(), 1);
    }

    #[test]
    fn clearing_last_reminder_removes_the_document() {
        let mut h = harness();
        h.service
            .set_reminder(SetReminderCommand {
                day: ReminderDay::Friday,
                time: Some("20:00".to_string()),
            })
            .expect("set");
        assert!(h.storage.items.borrow().contains_key("reading_app_reminders"));

        let schedule = h
            .service
            .set_reminder(SetReminderCommand {
                day: ReminderDay::Friday,
                time: None,
            })
            .expect("clear");
        assert!(schedule.is_empty());
        assert!(!h.storage.items.borrow().contains_key("reading_app_reminders"));

        let reloaded = harness_with(NotificationPermission::Granted, h.storage.clone());
        assert!(reloaded.service.reminders(ShowRemindersQuery).is_empty());
    }

    #[test]
    fn reminder_never_fires_without_permission() {
        let mut h = harness_with(NotificationPermission::Denied, MemoryStorage::default());
        h.service
            .set_reminder(SetReminderCommand {
                day: ReminderDay::Wednesday,
                time: Some("21:30".to_string()),
            })
            .expect("reminder");
        h.clock.advance(15);
        assert_eq!(h.service.poll_reminders(PollRemindersCommand).expect("poll"), None);
        h.clock.advance(15);
        assert_eq!(h.service.poll_reminders(PollRemindersCommand).expect("poll"), None);
        assert!(h.notifier.sent.borrow().is_empty());
        assert_eq!(h.notifier.requests.get(), 1);
    }
}
