use booklog_domain::{Book, Cover, ReadingLog, ReadingStats, ReminderDay, ReminderSchedule};
use chrono::{DateTime, FixedOffset, Utc};

const DELETED_BOOK: &str = "(deleted)";

pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours > 0 {
        return format!("{hours}h {minutes}m");
    }
    format!("{minutes}m")
}

pub fn format_clock(seconds: u64) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

pub fn present_cover(cover: &Cover) -> String {
    match cover {
        Cover::Color(color) => color.name().to_string(),
        Cover::Url(url) => format!("image {url}"),
    }
}

pub fn present_book_row(book: &Book, total_seconds: u64) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}",
        book.id,
        book.status,
        book.title,
        book.primary_author(),
        book.category.as_deref().unwrap_or("-"),
        format_duration(total_seconds)
    )
}

pub fn present_book_detail(book: &Book, total_seconds: u64, offset: &FixedOffset) -> String {
    let mut lines = vec![
        format!("id:        {}", book.id),
        format!("title:     {}", book.title),
        format!("authors:   {}", book.authors.join(", ")),
        format!("status:    {}", book.status),
        format!("category:  {}", book.category.as_deref().unwrap_or("-")),
        format!("cover:     {}", present_cover(&book.cover)),
        format!("added:     {}", format_local(&book.added_at, offset)),
    ];
    if let Some(completed_at) = &book.completed_at {
        lines.push(format!("completed: {}", format_local(completed_at, offset)));
    }
    lines.push(format!("read for:  {}", format_duration(total_seconds)));
    lines.join("\n")
}

pub fn present_log_row(log: &ReadingLog, title: Option<&str>, offset: &FixedOffset) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        log.id,
        format_local(&log.start_time, offset),
        format_duration(log.duration_seconds),
        title.unwrap_or(DELETED_BOOK)
    )
}

pub fn present_stats(stats: &ReadingStats, offset: &FixedOffset) -> String {
    let mut lines = vec![
        format!("total reading time: {}", format_duration(stats.total_seconds)),
        format!(
            "books: {} reading, {} completed, {} wished",
            stats.reading_books, stats.completed_books, stats.wish_books
        ),
    ];

    if !stats.per_category.is_empty() {
        lines.push(String::new());
        lines.push("by category:".to_string());
        for entry in &stats.per_category {
            lines.push(format!(
                "  {:<20} {:>3} books  {}",
                entry.name,
                entry.books,
                format_duration(entry.seconds)
            ));
        }
    }

    if !stats.daily.is_empty() {
        lines.push(String::new());
        lines.push(format!("last {} days:", stats.daily.len()));
        let peak = stats
            .daily
            .iter()
            .map(|day| day.seconds)
            .max()
            .unwrap_or_default();
        for day in &stats.daily {
            lines.push(format!(
                "  {}  {:<20} {}",
                day.date.format("%a %m-%d"),
                bar(day.seconds, peak, 20),
                format_duration(day.seconds)
            ));
        }
    }

    lines.push(String::new());
    lines.push("history:".to_string());
    if stats.recent.is_empty() {
        lines.push("  no sessions yet".to_string());
    }
    for entry in &stats.recent {
        lines.push(format!(
            "  {}  {:<30} {}",
            format_local(&entry.started_at, offset),
            entry.title.as_deref().unwrap_or(DELETED_BOOK),
            format_duration(entry.seconds)
        ));
    }

    lines.join("\n")
}

pub fn present_reminders(schedule: &ReminderSchedule) -> String {
    ReminderDay::ALL
        .into_iter()
        .map(|day| {
            let time = schedule
                .time_for(day)
                .map(|time| time.format("%H:%M").to_string())
                .unwrap_or_else(|| "off".to_string());
            format!("{day}\t{time}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_local(timestamp: &DateTime<Utc>, offset: &FixedOffset) -> String {
    timestamp
        .with_timezone(offset)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

fn bar(value: u64, peak: u64, width: usize) -> String {
    if peak == 0 || value == 0 {
        return String::new();
    }
    let filled = ((value as f64 / peak as f64) * width as f64).ceil() as usize;
    "#".repeat(filled.clamp(1, width))
}
