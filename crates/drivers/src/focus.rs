use std::time::Duration;

use booklog_adapters::format_duration;
use booklog_application::{
    ApplicationService, CancelSessionCommand, PollRemindersCommand, ReminderDue,
    StartSessionCommand, StopSessionCommand,
};
use booklog_domain::BookId;
use thiserror::Error;

use crate::commands::{runtime, CommandError};
use crate::{terminal, ui};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusOutcome {
    Stop,
    Cancel,
}

#[derive(Debug, Error)]
pub enum FocusError {
    /// Nothing was shown, so the session is discarded.
    #[error("failed to start focus window: {0}")]
    WindowUnavailable(String),
    /// The view died mid-session; the time read so far is still recorded.
    #[error("focus view stopped unexpectedly: {0}")]
    Interrupted(String),
}

pub fn run_focus(
    service: &mut ApplicationService,
    poll_interval: Duration,
    book_id: BookId,
    headless: bool,
) -> Result<(), CommandError> {
    let session = service
        .start_session(StartSessionCommand { book_id })
        .map_err(runtime("focus"))?;
    tracing::debug!(book_id = %session.book_id, headless, "focus mode entered");

    let outcome = if headless {
        terminal::run_focus_terminal(service, poll_interval)
    } else {
        ui::run_focus_window(service, poll_interval)
    };
    settle_focus(service, outcome)
}

/// Polls the schedule; a failed check is logged and never ends the caller's loop.
pub fn check_reminders(service: &mut ApplicationService) -> Option<ReminderDue> {
    match service.poll_reminders(PollRemindersCommand) {
        Ok(due) => due,
        Err(error) => {
            tracing::warn!(%error, "reminder check failed");
            None
        }
    }
}

fn settle_focus(
    service: &mut ApplicationService,
    outcome: Result<FocusOutcome, FocusError>,
) -> Result<(), CommandError> {
    match outcome {
        Ok(FocusOutcome::Stop) => record_session(service),
        Ok(FocusOutcome::Cancel) => {
            service
                .cancel_session(CancelSessionCommand)
                .map_err(runtime("cancel"))?;
            println!("session discarded");
            Ok(())
        }
        Err(error @ FocusError::WindowUnavailable(_)) => {
            service
                .cancel_session(CancelSessionCommand)
                .map_err(runtime("cancel"))?;
            Err(CommandError::Runtime(format!(
                "{error}; rerun with --headless to time the session in the terminal"
            )))
        }
        Err(error @ FocusError::Interrupted(_)) => {
            tracing::warn!(%error, "recording the session before exiting");
            record_session(service)?;
            Err(CommandError::Runtime(error.to_string()))
        }
    }
}

fn record_session(service: &mut ApplicationService) -> Result<(), CommandError> {
    let log = service
        .stop_session(StopSessionCommand)
        .map_err(runtime("saving the session"))?;
    let title = service
        .state()
        .book(&log.book_id)
        .map(|book| book.title.clone())
        .unwrap_or_default();
    println!(
        "recorded {} for {}",
        format_duration(log.duration_seconds),
        title
    );
    Ok(())
}
