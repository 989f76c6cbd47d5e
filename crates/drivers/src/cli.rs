use std::path::PathBuf;

use booklog_domain::{BookId, BookStatus, CoverColor, DisplayMode, ReminderDay, MAX_STATS_DAYS};

#[derive(clap::Parser, Debug)]
#[command(name = "booklog", version, about = "Personal reading log")]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Storage file, overriding the config
    #[arg(long, global = true)]
    pub storage: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Show the bookshelf, newest first
    List {
        #[arg(long)]
        status: Option<BookStatus>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Register a book
    Add {
        title: String,
        /// May be repeated
        #[arg(long = "author")]
        authors: Vec<String>,
        /// reading (default), completed or wish
        #[arg(long)]
        status: Option<BookStatus>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, conflicts_with = "cover_url")]
        color: Option<CoverColor>,
        #[arg(long)]
        cover_url: Option<String>,
    },
    /// Edit a book's details
    Edit {
        book_id: BookId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long = "author")]
        authors: Vec<String>,
        #[arg(long, conflicts_with = "clear_category")]
        category: Option<String>,
        #[arg(long)]
        clear_category: bool,
        #[arg(long, conflicts_with = "cover_url")]
        color: Option<CoverColor>,
        #[arg(long)]
        cover_url: Option<String>,
    },
    /// Show one book
    Show { book_id: BookId },
    /// Delete a book and all of its sessions
    Delete {
        book_id: BookId,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Mark a book as finished
    Complete { book_id: BookId },
    /// Undo a completion
    Undo { book_id: BookId },
    /// Move a wished-for book to reading
    Start { book_id: BookId },
    /// Time a reading session
    Focus {
        book_id: BookId,
        /// Use the terminal instead of a window
        #[arg(long)]
        headless: bool,
    },
    /// List recorded sessions
    Logs {
        #[arg(long)]
        book: Option<BookId>,
    },
    /// Delete one recorded session
    DeleteLog { log_id: String },
    /// Reading statistics
    Stats {
        /// Days in the daily breakdown (1-366)
        #[arg(
            long,
            default_value_t = 7,
            value_parser = clap::value_parser!(u32).range(1..=MAX_STATS_DAYS as i64)
        )]
        days: u32,
    },
    /// Poll the reminder schedule and notify when due
    Remind {
        /// Check once and exit
        #[arg(long)]
        once: bool,
    },
    /// Manage the reminder schedule
    Reminder {
        #[command(subcommand)]
        command: ReminderCommands,
    },
    /// Show or set the display mode
    Theme { mode: Option<DisplayMode> },
}

#[derive(clap::Subcommand, Debug)]
pub enum ReminderCommands {
    /// Set a day's reminder time (HH:MM)
    Set { day: ReminderDay, time: String },
    /// Disable a day's reminder
    Clear { day: ReminderDay },
    /// Show the schedule
    List,
}
