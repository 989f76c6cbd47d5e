use thiserror::Error;

use crate::BookStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("book id must not be empty")]
    EmptyBookId,
    #[error("book title must not be empty")]
    EmptyTitle,
    #[error("cannot move a book from {from} to {to}")]
    InvalidTransition { from: BookStatus, to: BookStatus },
    #[error("session ends before it starts ({seconds}s)")]
    NegativeDuration { seconds: i64 },
    #[error("reminder time must be HH:MM, got {0:?}")]
    InvalidReminderTime(String),
    #[error("unknown book status: {0}")]
    UnknownStatus(String),
    #[error("unknown cover color: {0}")]
    UnknownCoverColor(String),
    #[error("unknown weekday: {0}")]
    UnknownWeekday(String),
    #[error("unknown display mode: {0}")]
    UnknownDisplayMode(String),
    #[error("unknown notification permission: {0}")]
    UnknownPermission(String),
}
