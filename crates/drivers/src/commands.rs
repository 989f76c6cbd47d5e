use std::io::{self, BufRead, Write};
use std::thread;

use booklog_adapters::{
    format_duration, present_book_detail, present_book_row, present_log_row, present_reminders,
    present_stats,
};
use booklog_application::{
    AddBookCommand, ApplicationError, ApplicationService, CompleteBookCommand,
    DeleteBookCommand, DeleteLogCommand, FindBookQuery, ListBooksQuery, ListLogsQuery,
    PollRemindersCommand, SetDisplayModeCommand, SetReminderCommand, ShowRemindersQuery,
    StartBookCommand, StatsQuery, UndoCompleteCommand, UpdateBookCommand,
};
use booklog_domain::{BookStatus, Cover, CoverColor};

use crate::cli::{Commands, ReminderCommands};
use crate::config::AppConfig;
use crate::focus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Usage(String),
    Runtime(String),
}

pub(crate) fn runtime(context: &str) -> impl FnOnce(ApplicationError) -> CommandError + '_ {
    move |error| CommandError::Runtime(format!("{context} failed: {error}"))
}

pub fn run_command(
    command: Option<Commands>,
    service: &mut ApplicationService,
    config: &AppConfig,
) -> Result<(), CommandError> {
    let Some(command) = command else {
        return show_dashboard(service);
    };

    match command {
        Commands::List { status, category } => {
            let books = service.list_books(ListBooksQuery { status, category });
            if books.is_empty() {
                println!("no books found");
                return Ok(());
            }
            for book in books {
                println!(
                    "{}",
                    present_book_row(&book, service.book_total_seconds(&book.id))
                );
            }
            Ok(())
        }
        Commands::Add {
            title,
            authors,
            status,
            category,
            color,
            cover_url,
        } => {
            let book = service
                .add_book(AddBookCommand {
                    title,
                    authors,
                    status,
                    category,
                    cover: cover_choice(color, cover_url).unwrap_or_default(),
                })
                .map_err(runtime("add"))?;
            println!("added {} ({})", book.id, book.title);
            Ok(())
        }
        Commands::Edit {
            book_id,
            title,
            authors,
            category,
            clear_category,
            color,
            cover_url,
        } => {
            let command = UpdateBookCommand {
                book_id,
                title,
                authors: (!authors.is_empty()).then_some(authors),
                category: if clear_category {
                    Some(None)
                } else {
                    category.map(Some)
                },
                cover: cover_choice(color, cover_url),
            };
            if command.title.is_none()
                && command.authors.is_none()
                && command.category.is_none()
                && command.cover.is_none()
            {
                return Err(CommandError::Usage(
                    "nothing to change; pass --title, --author, --category, --clear-category, --color or --cover-url"
                        .to_string(),
                ));
            }
            let book = service.update_book(command).map_err(runtime("edit"))?;
            println!("updated {} ({})", book.id, book.title);
            Ok(())
        }
        Commands::Show { book_id } => {
            let book = service
                .find_book(FindBookQuery { book_id })
                .map_err(runtime("show"))?;
            let offset = *service.local_now().offset();
            println!(
                "{}",
                present_book_detail(&book, service.book_total_seconds(&book.id), &offset)
            );
            Ok(())
        }
        Commands::Delete { book_id, yes } => {
            let book = service
                .find_book(FindBookQuery {
                    book_id: book_id.clone(),
                })
                .map_err(runtime("delete"))?;
            if !yes {
                let prompt = format!(
                    "delete {:?} and all of its reading sessions? [y/N] ",
                    book.title
                );
                if !confirm(&prompt)? {
                    println!("kept {}", book.id);
                    return Ok(());
                }
            }
            let report = service
                .delete_book(DeleteBookCommand { book_id })
                .map_err(runtime("delete"))?;
            println!(
                "deleted {} ({}), removed {} sessions",
                report.book.id, report.book.title, report.removed_logs
            );
            Ok(())
        }
        Commands::Complete { book_id } => {
            let book = service
                .complete_book(CompleteBookCommand { book_id })
                .map_err(runtime("complete"))?;
            println!("finished {} ({})", book.id, book.title);
            Ok(())
        }
        Commands::Undo { book_id } => {
            let book = service
                .undo_complete(UndoCompleteCommand { book_id })
                .map_err(runtime("undo"))?;
            println!("{} is back in progress", book.title);
            Ok(())
        }
        Commands::Start { book_id } => {
            let book = service
                .start_book(StartBookCommand { book_id })
                .map_err(runtime("start"))?;
            println!("started reading {}", book.title);
            Ok(())
        }
        Commands::Focus { book_id, headless } => {
            focus::run_focus(service, config.poll_interval(), book_id, headless)
        }
        Commands::Logs { book } => {
            let logs = service.list_logs(ListLogsQuery { book_id: book });
            if logs.is_empty() {
                println!("no reading sessions recorded");
                return Ok(());
            }
            let offset = *service.local_now().offset();
            for log in logs {
                let title = service.state().book(&log.book_id).map(|book| book.title.as_str());
                println!("{}", present_log_row(&log, title, &offset));
            }
            Ok(())
        }
        Commands::DeleteLog { log_id } => {
            let log = service
                .delete_log(DeleteLogCommand { log_id })
                .map_err(runtime("delete-log"))?;
            println!(
                "deleted session {} ({})",
                log.id,
                format_duration(log.duration_seconds)
            );
            Ok(())
        }
        Commands::Stats { days } => {
            let stats = service.stats(StatsQuery { days });
            let offset = *service.local_now().offset();
            println!("{}", present_stats(&stats, &offset));
            Ok(())
        }
        Commands::Remind { once } => run_reminders(service, config, once),
        Commands::Reminder { command } => run_reminder_command(service, command),
        Commands::Theme { mode } => {
            match mode {
                Some(mode) => {
                    service
                        .set_display_mode(SetDisplayModeCommand { mode })
                        .map_err(runtime("theme"))?;
                    println!("display mode set to {mode}");
                }
                None => println!("{}", service.display_mode()),
            }
            Ok(())
        }
    }
}

fn show_dashboard(service: &ApplicationService) -> Result<(), CommandError> {
    let books = service.list_books(ListBooksQuery {
        status: Some(BookStatus::Reading),
        category: None,
    });
    let stats = service.stats(StatsQuery::default());
    println!(
        "total reading time: {}  |  reading {}  completed {}  wish list {}",
        format_duration(stats.total_seconds),
        stats.reading_books,
        stats.completed_books,
        stats.wish_books
    );
    if books.is_empty() {
        println!("nothing in progress; add a book with `booklog add <title>`");
        return Ok(());
    }
    for book in books {
        println!(
            "{}",
            present_book_row(&book, service.book_total_seconds(&book.id))
        );
    }
    Ok(())
}

fn run_reminder_command(
    service: &mut ApplicationService,
    command: ReminderCommands,
) -> Result<(), CommandError> {
    match command {
        ReminderCommands::Set { day, time } => {
            let schedule = service
                .set_reminder(SetReminderCommand {
                    day,
                    time: Some(time),
                })
                .map_err(runtime("reminder"))?;
            println!("{}", present_reminders(&schedule));
        }
        ReminderCommands::Clear { day } => {
            let schedule = service
                .set_reminder(SetReminderCommand { day, time: None })
                .map_err(runtime("reminder"))?;
            println!("{}", present_reminders(&schedule));
        }
        ReminderCommands::List => {
            println!("{}", present_reminders(&service.reminders(ShowRemindersQuery)));
        }
    }
    Ok(())
}

fn run_reminders(
    service: &mut ApplicationService,
    config: &AppConfig,
    once: bool,
) -> Result<(), CommandError> {
    if service.reminders(ShowRemindersQuery).is_empty() {
        println!("no reminders scheduled; add one with `booklog reminder set <day> <HH:MM>`");
        return Ok(());
    }
    let permission = service
        .notification_permission()
        .map_err(runtime("permission check"))?;
    if !permission.is_granted() {
        return Err(CommandError::Runtime(format!(
            "notifications are {permission}; set notification_permission to \"granted\" in the config"
        )));
    }

    if once {
        let fired = service
            .poll_reminders(PollRemindersCommand)
            .map_err(runtime("reminder check"))?;
        if fired.is_none() {
            println!("no reminder due");
        }
        return Ok(());
    }

    println!(
        "watching reminders every {}s; press ctrl-c to stop",
        config.poll_interval().as_secs()
    );
    loop {
        focus::check_reminders(service);
        thread::sleep(config.poll_interval());
    }
}

fn cover_choice(color: Option<CoverColor>, url: Option<String>) -> Option<Cover> {
    match (color, url) {
        (Some(color), _) => Some(Cover::Color(color)),
        (None, Some(url)) => Some(Cover::from_url(&url)),
        (None, None) => None,
    }
}

fn confirm(prompt: &str) -> Result<bool, CommandError> {
    print!("{prompt}");
    io::stdout()
        .flush()
        .map_err(|error| CommandError::Runtime(error.to_string()))?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|error| CommandError::Runtime(error.to_string()))?;
    Ok(is_affirmative(&answer))
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
