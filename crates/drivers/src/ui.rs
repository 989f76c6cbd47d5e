use std::time::{Duration, Instant};

use booklog_adapters::format_clock;
use booklog_application::{ApplicationService, FindBookQuery};
use booklog_domain::{Cover, DisplayMode};
use font8x8::UnicodeFonts;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use crate::focus::{check_reminders, FocusError, FocusOutcome};
use crate::timer::IntervalTimer;

const WINDOW_WIDTH: usize = 900;
const WINDOW_HEIGHT: usize = 560;
const GLYPH: usize = 8;
const MARGIN: usize = 32;
const SWATCH_SIZE: usize = 40;
const CLOCK_SCALE: usize = 10;
const STARTED_SCALE: usize = 4;
const ELAPSED_SCALE: usize = 3;
const BANNER_MS: u64 = 10_000;
const IMAGE_COVER_PLACEHOLDER: u32 = 0xE5E7EB;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Palette {
    background: u32,
    text: u32,
    muted: u32,
    accent: u32,
}

impl Palette {
    fn for_mode(mode: DisplayMode) -> Self {
        match mode {
            DisplayMode::Dark => Self {
                background: 0x000000,
                text: 0xFFFFFF,
                muted: 0x6B7280,
                accent: 0xF87171,
            },
            DisplayMode::Light => Self {
                background: 0xF7EFE0,
                text: 0x1B1F26,
                muted: 0x6A5B47,
                accent: 0xF05C4B,
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct FocusFrame<'a> {
    title: &'a str,
    now: &'a str,
    started: &'a str,
    elapsed: &'a str,
    cover: u32,
    banner: bool,
}

pub fn run_focus_window(
    service: &mut ApplicationService,
    poll_interval: Duration,
) -> Result<FocusOutcome, FocusError> {
    let session = service
        .active_session()
        .cloned()
        .ok_or_else(|| FocusError::Interrupted("no active session to show".to_string()))?;
    let cover = service
        .find_book(FindBookQuery {
            book_id: session.book_id.clone(),
        })
        .map(|book| cover_swatch(&book.cover))
        .map_err(|error| FocusError::Interrupted(error.to_string()))?;
    let palette = Palette::for_mode(service.display_mode());
    let offset = *service.local_now().offset();
    let started = session
        .started_at
        .with_timezone(&offset)
        .format("%H:%M")
        .to_string();

    let width = WINDOW_WIDTH;
    let height = WINDOW_HEIGHT;
    let mut window = Window::new(
        &format!("booklog | reading {}", session.book_title),
        width,
        height,
        WindowOptions::default(),
    )
    .map_err(|error| FocusError::WindowUnavailable(error.to_string()))?;
    window.limit_update_rate(Some(Duration::from_micros(100_000)));

    let mut buffer = vec![palette.background; width * height];
    let start = Instant::now();
    let mut reminder_timer = IntervalTimer::new(poll_interval.as_millis() as u64);
    let mut banner_until_ms: Option<u64> = None;

    loop {
        let stop = [Key::Escape, Key::Enter, Key::Space]
            .into_iter()
            .any(|key| window.is_key_pressed(key, KeyRepeat::No));
        let cancel = window.is_key_pressed(Key::Backspace, KeyRepeat::No);
        if let Some(outcome) = resolve_outcome(window.is_open(), stop, cancel) {
            return Ok(outcome);
        }

        let now_ms = start.elapsed().as_millis() as u64;
        if reminder_timer.due(now_ms) && check_reminders(service).is_some() {
            banner_until_ms = Some(now_ms + BANNER_MS);
        }

        let now = service.local_now().format("%H:%M").to_string();
        let elapsed = format_clock(service.session_elapsed_seconds().unwrap_or_default());
        draw_focus(
            &mut buffer,
            width,
            height,
            palette,
            FocusFrame {
                title: &session.book_title,
                now: &now,
                started: &started,
                elapsed: &elapsed,
                cover,
                banner: banner_until_ms.is_some_and(|until| now_ms < until),
            },
        );

        window.set_title(&format!(
            "booklog | reading {} | elapsed {} | enter/space/esc stop | backspace cancel",
            session.book_title, elapsed
        ));
        window
            .update_with_buffer(&buffer, width, height)
            .map_err(|error| FocusError::Interrupted(format!("window update failed: {error}")))?;
    }
}

/// Closing the window counts as stopping so the session is not lost.
fn resolve_outcome(open: bool, stop: bool, cancel: bool) -> Option<FocusOutcome> {
    if cancel {
        return Some(FocusOutcome::Cancel);
    }
    if stop || !open {
        return Some(FocusOutcome::Stop);
    }
    None
}

fn cover_swatch(cover: &Cover) -> u32 {
    match cover {
        Cover::Color(color) => color.rgb(),
        Cover::Url(_) => IMAGE_COVER_PLACEHOLDER,
    }
}

fn draw_focus(buffer: &mut [u32], width: usize, height: usize, palette: Palette, frame: FocusFrame<'_>) {
    buffer.fill(palette.background);

    fill_rect(buffer, width, MARGIN, MARGIN, SWATCH_SIZE, SWATCH_SIZE, frame.cover);
    draw_rect(buffer, width, MARGIN, MARGIN, SWATCH_SIZE, SWATCH_SIZE, palette.muted);
    draw_text(
        buffer,
        width,
        MARGIN + SWATCH_SIZE + 16,
        MARGIN + SWATCH_SIZE / 2 - GLYPH,
        &format!("READING: {}", frame.title),
        palette.muted,
        2,
    );

    let label_top = height / 2 - 150;
    draw_centered(buffer, width, label_top, "CURRENT TIME", palette.muted, 2);
    draw_centered(buffer, width, label_top + 28, frame.now, palette.text, CLOCK_SCALE);

    let started_top = label_top + 28 + GLYPH * CLOCK_SCALE + 36;
    draw_centered(buffer, width, started_top, "STARTED AT", palette.muted, 2);
    draw_centered(buffer, width, started_top + 24, frame.started, palette.text, STARTED_SCALE);

    let elapsed_top = started_top + 24 + GLYPH * STARTED_SCALE + 24;
    draw_centered(buffer, width, elapsed_top, frame.elapsed, palette.muted, ELAPSED_SCALE);

    if frame.banner {
        let band_top = height.saturating_sub(120);
        fill_rect(buffer, width, 0, band_top, width, 36, palette.accent);
        draw_centered(buffer, width, band_top + 10, "TIME TO READ", 0xFFFFFF, 2);
    }

    draw_centered(
        buffer,
        width,
        height.saturating_sub(MARGIN + GLYPH),
        "ENTER / SPACE / ESC: STOP SESSION    BACKSPACE: DISCARD",
        palette.muted,
        1,
    );
}

fn text_width(text: &str, scale: usize) -> usize {
    text.chars().count() * GLYPH * scale
}

fn centered_left(text: &str, scale: usize, width: usize) -> usize {
    width.saturating_sub(text_width(text, scale)) / 2
}

fn draw_centered(buffer: &mut [u32], width: usize, y: usize, text: &str, color: u32, scale: usize) {
    let x = centered_left(text, scale, width);
    draw_text(buffer, width, x, y, text, color, scale);
}

fn fill_rect(buffer: &mut [u32], width: usize, left: usize, top: usize, w: usize, h: usize, color: u32) {
    for y in top..top.saturating_add(h) {
        for x in left..left.saturating_add(w) {
            set_pixel(buffer, width, x, y, color);
        }
    }
}

fn draw_rect(buffer: &mut [u32], width: usize, left: usize, top: usize, w: usize, h: usize, color: u32) {
    if w == 0 || h == 0 {
        return;
    }
    let right = left + w - 1;
    let bottom = top + h - 1;
    for x in left..=right {
        set_pixel(buffer, width, x, top, color);
        set_pixel(buffer, width, x, bottom, color);
    }
    for y in top..=bottom {
        set_pixel(buffer, width, left, y, color);
        set_pixel(buffer, width, right, y, color);
    }
}

fn set_pixel(buffer: &mut [u32], width: usize, x: usize, y: usize, color: u32) {
    let height = buffer.len() / width;
    if x < width && y < height {
        buffer[y * width + x] = color;
    }
}

fn draw_text(
    buffer: &mut [u32],
    width: usize,
    x: usize,
    y: usize,
    text: &str,
    color: u32,
    scale: usize,
) {
    let mut cursor_x = x;
    for ch in text.chars() {
        if ch == '\n' {
            continue;
        }
        draw_char(buffer, width, cursor_x, y, ch, color, scale);
        cursor_x = cursor_x.saturating_add(GLYPH * scale);
    }
}

fn draw_char(
    buffer: &mut [u32],
    width: usize,
    x: usize,
    y: usize,
    ch: char,
    color: u32,
    scale: usize,
) {
    let glyph = font8x8::BASIC_FONTS.get(ch).unwrap_or([0; 8]);
    for (row, bits) in glyph.iter().enumerate() {
        for col in 0..GLYPH {
            if (bits >> col) & 1 == 1 {
                fill_rect(
                    buffer,
                    width,
                    x + col * scale,
                    y + row * scale,
                    scale,
                    scale,
                    color,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use booklog_domain::CoverColor;

    use super::*;

    #[test]
    fn stop_keys_and_closing_stop_the_session() {
        assert_eq!(resolve_outcome(true, false, false), None);
        assert_eq!(resolve_outcome(true, true, false), Some(FocusOutcome::Stop));
        assert_eq!(resolve_outcome(false, false, false), Some(FocusOutcome::Stop));
        assert_eq!(resolve_outcome(true, true, true), Some(FocusOutcome::Cancel));
    }

    #[test]
    fn centered_text_is_balanced() {
        assert_eq!(text_width("21:30", CLOCK_SCALE), 400);
        assert_eq!(centered_left("21:30", CLOCK_SCALE, WINDOW_WIDTH), 250);
        assert_eq!(centered_left(&"x".repeat(200), 1, 100), 0);
    }

    #[test]
    fn palettes_differ_by_mode() {
        let dark = Palette::for_mode(DisplayMode::Dark);
        let light = Palette::for_mode(DisplayMode::Light);
        assert_eq!(dark.background, 0x000000);
        assert_ne!(dark.background, light.background);
    }

    #[test]
    fn swatch_follows_cover() {
        assert_eq!(cover_swatch(&Cover::Color(CoverColor::Red)), 0xEF4444);
        assert_eq!(
            cover_swatch(&Cover::Url("https://example.com/x.jpg".to_string())),
            IMAGE_COVER_PLACEHOLDER
        );
    }

    #[test]
    fn draw_focus_stays_inside_buffer() {
        let mut buffer = vec![0_u32; WINDOW_WIDTH * WINDOW_HEIGHT];
        draw_focus(
            &mut buffer,
            WINDOW_WIDTH,
            WINDOW_HEIGHT,
            Palette::for_mode(DisplayMode::Dark),
            FocusFrame {
                title: &"long title ".repeat(40),
                now: "21:30",
                started: "21:00",
                elapsed: "00:30:00",
                cover: 0x6366F1,
                banner: true,
            },
        );
        assert_eq!(buffer[(MARGIN + 5) * WINDOW_WIDTH + MARGIN + 5], 0x6366F1);
        assert!(buffer.iter().any(|pixel| *pixel == 0xFFFFFF));
    }
}
