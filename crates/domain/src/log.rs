use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{BookId, DomainError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingLog {
    pub id: String,
    pub book_id: BookId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_seconds: u64,
}

impl ReadingLog {
    pub fn new(
        id: String,
        book_id: BookId,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let seconds = (end_time - start_time).num_seconds();
        if seconds < 0 {
            return Err(DomainError::NegativeDuration { seconds });
        }
        Ok(Self {
            id,
            book_id,
            start_time,
            end_time,
            duration_seconds: seconds as u64,
        })
    }
}

pub fn total_seconds<'a>(logs: impl IntoIterator<Item = &'a ReadingLog>) -> u64 {
    logs.into_iter().map(|log| log.duration_seconds).sum()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 21, 0, 0)
            .single()
            .expect("valid")
    }

    #[test]
    fn duration_is_whole_seconds_between_timestamps() {
        let end = start() + Duration::milliseconds(125_900);
        let log = ReadingLog::new(
            "l1".to_string(),
            BookId::new("b1").expect("id"),
            start(),
            end,
        )
        .expect("log");
        assert_eq!(log.duration_seconds, 125);
    }

    #[test]
    fn end_before_start_is_rejected() {
        let result = ReadingLog::new(
            "l1".to_string(),
            BookId::new("b1").expect("id"),
            start(),
            start() - Duration::seconds(3),
        );
        assert!(matches!(
            result,
            Err(DomainError::NegativeDuration { seconds: -3 })
        ));
    }

    #[test]
    fn total_sums_durations() {
        let book = BookId::new("b1").expect("id");
        let logs: Vec<ReadingLog> = [60, 0, 905]
            .into_iter()
            .enumerate()
            .map(|(index, secs)| {
                ReadingLog::new(
                    format!("l{index}"),
                    book.clone(),
                    start(),
                    start() + Duration::seconds(secs),
                )
                .expect("log")
            })
            .collect();
        assert_eq!(total_seconds(&logs), 965);
    }
}
