//! Console and file line renderers.
//!
//! Both renderers take the same [`Alignment`], so once the console line is
//! stripped of its colors the level and category columns line up with the
//! file line character for character.

use colored::{Color, Colorize};
use std::time::{Duration, Instant};

use super::align::{format_elapsed, pad, strip_styles, Alignment};
use super::event::{LevelName, LogEvent, LogLevel};

pub const FILE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const ELAPSED_PRECISION: usize = 3;

/// Turns an event into one output line, without a trailing newline.
pub trait Render: Send + Sync {
    fn render(&self, event: &LogEvent) -> String;
}

/// Plain text layout for the persisted log.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileRenderer {
    alignment: Alignment,
}

impl FileRenderer {
    pub fn new(alignment: Alignment) -> Self {
        Self { alignment }
    }
}

impl Render for FileRenderer {
    fn render(&self, event: &LogEvent) -> String {
        let date = event.timestamp.format(FILE_TIMESTAMP_FORMAT);
        let level = pad(&strip_styles(event.level.label()), self.alignment.level, false);
        let category = pad(&strip_styles(&event.category), self.alignment.category, false);
        let message = strip_styles(&event.message()).into_owned();

        format!("{date} | {level} | {category} | {message}")
    }
}

/// Colorized layout for the live stream. Shows seconds since `started`
/// instead of a calendar timestamp.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleRenderer {
    alignment: Alignment,
    started: Instant,
}

impl ConsoleRenderer {
    pub fn new(alignment: Alignment, started: Instant) -> Self {
        Self { alignment, started }
    }

    pub fn render_with_elapsed(&self, event: &LogEvent, elapsed: Duration) -> String {
        let separator = "|".bright_black();

        let (color, label) = level_style(&event.level);
        let level = pad(label, self.alignment.level, false).color(color);
        let category = pad(&event.category, self.alignment.category, false).cyan();
        let time = format!(
            "[{}]",
            format_elapsed(elapsed, ELAPSED_PRECISION, self.alignment.elapsed)
        )
        .magenta();
        let message = event.message();

        format!("{level} {separator} {category} {separator} {time} {separator} {message}")
    }
}

impl Render for ConsoleRenderer {
    fn render(&self, event: &LogEvent) -> String {
        self.render_with_elapsed(event, self.started.elapsed())
    }
}

/// Color and fixed-width label for a level. Labels of the known levels are
/// already five characters wide; anything else falls back to white and its
/// raw name.
fn level_style(level: &LevelName) -> (Color, &str) {
    match level {
        LevelName::Known(LogLevel::Debug) => (Color::BrightBlue, "DEBUG"),
        LevelName::Known(LogLevel::Info) => (Color::Green, "INFO "),
        LevelName::Known(LogLevel::Warn) => (Color::Yellow, "WARN "),
        LevelName::Known(LogLevel::Error) => (Color::BrightRed, "ERROR"),
        other => (Color::White, other.label()),
    }
}
