use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use booklog_adapters::format_clock;
use booklog_application::ApplicationService;

use crate::focus::{check_reminders, FocusError, FocusOutcome};
use crate::timer::IntervalTimer;

const REFRESH: Duration = Duration::from_secs(1);

/// Terminal focus mode: redraws the elapsed time once a second until Enter
/// (stop) or `cancel` (discard) is typed. End of input stops the session.
pub fn run_focus_terminal(
    service: &mut ApplicationService,
    poll_interval: Duration,
) -> Result<FocusOutcome, FocusError> {
    let title = service
        .active_session()
        .map(|session| session.book_title.clone())
        .ok_or_else(|| FocusError::Interrupted("no active session to show".to_string()))?;
    println!("reading {title}. press enter to stop, type `cancel` to discard");

    let (sender, receiver) = mpsc::channel::<String>();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if sender.send(line).is_err() {
                break;
            }
        }
    });

    let start = Instant::now();
    let mut reminder_timer = IntervalTimer::new(poll_interval.as_millis() as u64);
    let mut write_failed = false;
    loop {
        let now_ms = start.elapsed().as_millis() as u64;
        if reminder_timer.due(now_ms) && check_reminders(service).is_some() {
            println!();
        }

        let elapsed = format_clock(service.session_elapsed_seconds().unwrap_or_default());
        print!("\r  {} elapsed {elapsed}", service.local_now().format("%H:%M"));
        if let Err(error) = io::stdout().flush() {
            if !write_failed {
                tracing::warn!(%error, "failed to refresh the terminal clock");
                write_failed = true;
            }
        }

        match receiver.recv_timeout(REFRESH) {
            Ok(line) => {
                println!();
                return Ok(outcome_for_input(&line));
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                println!();
                return Ok(FocusOutcome::Stop);
            }
        }
    }
}

fn outcome_for_input(line: &str) -> FocusOutcome {
    if line.trim().eq_ignore_ascii_case("cancel") {
        FocusOutcome::Cancel
    } else {
        FocusOutcome::Stop
    }
}
