//! Column alignment for log lines.
//!
//! Widths are measured on the visible text: terminal styling sequences are
//! stripped before counting, so a colorized column and its plain twin take the
//! same room on screen.

use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;
use std::time::{Duration, Instant};

lazy_static! {
    // CSI/SGR sequences, OSC strings terminated by BEL, and the 8-bit CSI form.
    static ref STYLE_SEQUENCE: Regex = Regex::new(
        r"[\x1b\x{9b}][\[\]()#;?]*(?:(?:(?:(?:;[-a-zA-Z\d/#&.:=?%@~_]+)*|[a-zA-Z\d]+(?:;[-a-zA-Z\d/#&.:=?%@~_]*)*)?\x07)|(?:(?:\d{1,4}(?:;\d{0,4})*)?[\dA-PR-TZcf-nq-uy=><~]))"
    )
    .expect("style sequence pattern compiles");

    static ref PROCESS_START: Instant = Instant::now();
}

/// Fixed column widths shared by the console and file renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alignment {
    pub level: usize,
    pub category: usize,
    pub elapsed: usize,
}

impl Alignment {
    pub const LEVEL_WIDTH: usize = 5;
    pub const CATEGORY_WIDTH: usize = 15;
    pub const ELAPSED_WIDTH: usize = 8;
}

impl Default for Alignment {
    fn default() -> Self {
        Self {
            level: Self::LEVEL_WIDTH,
            category: Self::CATEGORY_WIDTH,
            elapsed: Self::ELAPSED_WIDTH,
        }
    }
}

/// Removes every terminal styling sequence from `text`.
pub fn strip_styles(text: &str) -> Cow<'_, str> {
    STYLE_SEQUENCE.replace_all(text, "")
}

/// Number of characters left once styling sequences are removed.
pub fn visible_len(text: &str) -> usize {
    strip_styles(text).chars().count()
}

/// Pads `text` with plain spaces up to `width` visible characters.
///
/// Text that is already `width` or wider comes back untouched; nothing is
/// ever truncated. Embedded styling sequences are preserved.
pub fn pad(text: &str, width: usize, right_align: bool) -> String {
    let len = visible_len(text);
    if len >= width {
        return text.to_string();
    }

    let padding = " ".repeat(width - len);
    if right_align {
        format!("{padding}{text}")
    } else {
        format!("{text}{padding}")
    }
}

/// Instant the elapsed column counts from. Pinned on first use; the log
/// system touches it while starting so the clock does not begin at the first
/// log line.
pub fn process_start() -> Instant {
    *PROCESS_START
}

/// Seconds since process start with `precision` decimals, right aligned to
/// the elapsed column width.
pub fn elapsed(precision: usize) -> String {
    format_elapsed(PROCESS_START.elapsed(), precision, Alignment::ELAPSED_WIDTH)
}

pub fn format_elapsed(duration: Duration, precision: usize, width: usize) -> String {
    pad(&format!("{:.*}", precision, duration.as_secs_f64()), width, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: &str = "\x1b[31m";
    const RESET: &str = "\x1b[0m";

    #[test]
    fn test_pad_short_string_left_aligned() {
        assert_eq!(pad("ok", 5, false), "ok   ");
        assert_eq!(pad("ok", 5, false).len(), 5);
    }

    #[test]
    fn test_pad_right_aligned() {
        assert_eq!(pad("1.5", 8, true), "     1.5");
    }

    #[test]
    fn test_pad_never_truncates() {
        let padded = pad("toolongstring", 5, false);
        assert_eq!(padded, "toolongstring");
        assert_eq!(visible_len(&padded), 13);
    }

    #[test]
    fn test_pad_exact_width_is_noop() {
        assert_eq!(pad("INFO ", 5, false), "INFO ");
        assert_eq!(pad("DEBUG", 5, false), "DEBUG");
    }

    #[test]
    fn test_pad_ignores_styling_when_measuring() {
        let styled = format!("{RED}ERROR{RESET}");
        let padded = pad(&styled, 5, false);
        assert_eq!(padded, styled);
        assert_eq!(visible_len(&padded), 5);

        let styled = format!("{RED}ok{RESET}");
        let padded = pad(&styled, 5, false);
        assert_eq!(padded, format!("{RED}ok{RESET}   "));
    }

    #[test]
    fn test_pad_empty_and_style_only_strings() {
        assert_eq!(pad("", 3, false), "   ");

        let only_codes = format!("{RED}{RESET}");
        assert_eq!(visible_len(&only_codes), 0);
        assert_eq!(pad(&only_codes, 2, true), format!("  {only_codes}"));
    }

    #[test]
    fn test_strip_styles() {
        assert_eq!(strip_styles(&format!("{RED}boom{RESET} done")), "boom done");
        assert_eq!(strip_styles("\x1b[1;32mbold green\x1b[39;22m"), "bold green");
        assert_eq!(strip_styles("\x1b]0;title\x07text"), "text");
        assert!(matches!(strip_styles("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn test_visible_len_counts_chars_not_bytes() {
        assert_eq!(visible_len("日志"), 2);
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_millis(1234), 3, 8), "   1.234");
        assert_eq!(format_elapsed(Duration::from_millis(0), 1, 8), "     0.0");
        assert_eq!(format_elapsed(Duration::from_secs(123_456), 3, 8), "123456.000");
    }

    #[test]
    fn test_elapsed_is_monotonic() {
        let start = process_start();
        assert_eq!(start, process_start());
        let first: f64 = elapsed(3).trim().parse().unwrap();
        let second: f64 = elapsed(3).trim().parse().unwrap();
        assert!(second >= first);
        assert!(elapsed(3).len() >= Alignment::ELAPSED_WIDTH);
    }

    #[test]
    fn test_default_alignment_widths() {
        let alignment = Alignment::default();
        assert_eq!(alignment.level, 5);
        assert_eq!(alignment.category, 15);
        assert_eq!(alignment.elapsed, 8);
    }
}
