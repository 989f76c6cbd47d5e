use chrono::{DateTime, Utc};

use crate::{Book, BookId, DomainError, ReadingLog};

/// An open reading session. Lives only as long as the focus view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSession {
    pub book_id: BookId,
    pub book_title: String,
    pub started_at: DateTime<Utc>,
}

impl ActiveSession {
    pub fn begin(book: &Book, now: DateTime<Utc>) -> Self {
        Self {
            book_id: book.id.clone(),
            book_title: book.title.clone(),
            started_at: now,
        }
    }

    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> u64 {
        (now - self.started_at).num_seconds().max(0) as u64
    }

    pub fn finish(&self, log_id: String, now: DateTime<Utc>) -> Result<ReadingLog, DomainError> {
        ReadingLog::new(log_id, self.book_id.clone(), self.started_at, now)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::NewBook;

    #[test]
    fn finishing_after_125_seconds_logs_125() {
        let t0 = Utc.with_ymd_and_hms(2025, 1, 5, 8, 0, 0).single().expect("t0");
        let book = Book::create(
            BookId::new("b1").expect("id"),
            NewBook {
                title: "Kokoro".to_string(),
                ..NewBook::default()
            },
            t0,
        )
        .expect("book");

        let session = ActiveSession::begin(&book, t0);
        let t1 = t0 + Duration::seconds(125);
        assert_eq!(session.elapsed_seconds(t1), 125);

        let log = session.finish("l1".to_string(), t1).expect("log");
        assert_eq!(log.duration_seconds, 125);
        assert_eq!(log.book_id, book.id);
        assert_eq!(log.start_time, t0);
        assert_eq!(log.end_time, t1);
    }

    #[test]
    fn elapsed_never_goes_negative() {
        let t0 = Utc.with_ymd_and_hms(2025, 1, 5, 8, 0, 0).single().expect("t0");
        let session = ActiveSession {
            book_id: BookId::new("b1").expect("id"),
            book_title: "x".to_string(),
            started_at: t0,
        };
        assert_eq!(session.elapsed_seconds(t0 - Duration::seconds(10)), 0);
    }
}
