use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Days, FixedOffset, NaiveDate, Utc};

use crate::{Book, BookId, BookStatus, ReadingLog};

pub const UNCATEGORIZED: &str = "Uncategorized";
pub const RECENT_HISTORY_LIMIT: usize = 20;
/// Longest daily breakdown; larger windows are clamped to it.
pub const MAX_STATS_DAYS: u32 = 366;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsWindow {
    pub today: NaiveDate,
    pub days: u32,
    pub offset: FixedOffset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookTotal {
    pub book_id: BookId,
    pub title: String,
    pub seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub name: String,
    pub books: usize,
    pub seconds: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub log_id: String,
    /// `None` once the book has been deleted.
    pub title: Option<String>,
    pub started_at: DateTime<Utc>,
    pub seconds: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadingStats {
    pub total_seconds: u64,
    pub reading_books: usize,
    pub completed_books: usize,
    pub wish_books: usize,
    pub per_book: Vec<BookTotal>,
    pub per_category: Vec<CategoryTotal>,
    pub daily: Vec<DailyTotal>,
    pub recent: Vec<HistoryEntry>,
}

impl ReadingStats {
    pub fn compute(books: &[Book], logs: &[ReadingLog], window: StatsWindow) -> Self {
        let mut seconds_by_book: HashMap<&BookId, u64> = HashMap::new();
        for log in logs {
            *seconds_by_book.entry(&log.book_id).or_default() += log.duration_seconds;
        }

        let mut stats = Self {
            total_seconds: crate::total_seconds(logs),
            ..Self::default()
        };

        let mut categories: BTreeMap<String, CategoryTotal> = BTreeMap::new();
        for book in books {
            match book.status {
                BookStatus::Reading => stats.reading_books += 1,
                BookStatus::Completed => stats.completed_books += 1,
                BookStatus::Wish => stats.wish_books += 1,
            }

            let seconds = seconds_by_book.get(&book.id).copied().unwrap_or_default();
            stats.per_book.push(BookTotal {
                book_id: book.id.clone(),
                title: book.title.clone(),
                seconds,
            });

            let name = book
                .category
                .clone()
                .unwrap_or_else(|| UNCATEGORIZED.to_string());
            let entry = categories.entry(name.clone()).or_insert(CategoryTotal {
                name,
                books: 0,
                seconds: 0,
            });
            entry.books += 1;
            entry.seconds += seconds;
        }

        stats
            .per_book
            .sort_by(|a, b| b.seconds.cmp(&a.seconds).then_with(|| a.title.cmp(&b.title)));
        stats.per_category = categories.into_values().collect();
        stats
            .per_category
            .sort_by(|a, b| b.seconds.cmp(&a.seconds).then_with(|| a.name.cmp(&b.name)));
        stats.daily = daily_totals(logs, window);
        stats.recent = recent_history(books, logs, RECENT_HISTORY_LIMIT);
        stats
    }
}

/// Oldest day first; `window.days` entries (at most [`MAX_STATS_DAYS`]) ending
/// at `window.today`.
pub fn daily_totals(logs: &[ReadingLog], window: StatsWindow) -> Vec<DailyTotal> {
    let days = window.days.min(MAX_STATS_DAYS);
    if days == 0 {
        return Vec::new();
    }
    let first = window
        .today
        .checked_sub_days(Days::new(u64::from(days - 1)))
        .unwrap_or(NaiveDate::MIN);

    let mut totals: BTreeMap<NaiveDate, u64> = first
        .iter_days()
        .take_while(|date| *date <= window.today)
        .map(|date| (date, 0))
        .collect();

    for log in logs {
        let date = log.start_time.with_timezone(&window.offset).date_naive();
        if let Some(slot) = totals.get_mut(&date) {
            *slot += log.duration_seconds;
        }
    }

    totals
        .into_iter()
        .map(|(date, seconds)| DailyTotal { date, seconds })
        .collect()
}

pub fn recent_history(books: &[Book], logs: &[ReadingLog], limit: usize) -> Vec<HistoryEntry> {
    let titles: HashMap<&BookId, &str> = books
        .iter()
        .map(|book| (&book.id, book.title.as_str()))
        .collect();

    let mut ordered: Vec<&ReadingLog> = logs.iter().collect();
    ordered.sort_by(|a, b| b.start_time.cmp(&a.start_time));
    ordered
        .into_iter()
        .take(limit)
        .map(|log| HistoryEntry {
            log_id: log.id.clone(),
            title: titles.get(&log.book_id).map(|title| title.to_string()),
            started_at: log.start_time,
            seconds: log.duration_seconds,
        })
        .collect()
}
