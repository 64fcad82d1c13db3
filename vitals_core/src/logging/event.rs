//! Log levels and the event shape consumed by the renderers

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    pub fn as_tracing_filter(&self) -> tracing::level_filters::LevelFilter {
        use tracing::level_filters::LevelFilter;
        match self {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error | LogLevel::Fatal => LevelFilter::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError(String);

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown log level '{}'", self.0)
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for LogLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "fatal" => Ok(LogLevel::Fatal),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

impl From<tracing::Level> for LogLevel {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => LogLevel::Trace,
            tracing::Level::DEBUG => LogLevel::Debug,
            tracing::Level::INFO => LogLevel::Info,
            tracing::Level::WARN => LogLevel::Warn,
            tracing::Level::ERROR => LogLevel::Error,
        }
    }
}

/// Level carried by an event: one of the known levels, or a caller-chosen
/// name that renders with the fallback style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelName {
    Known(LogLevel),
    Custom(String),
}

impl LevelName {
    pub fn label(&self) -> &str {
        match self {
            LevelName::Known(level) => level.as_str(),
            LevelName::Custom(name) => name,
        }
    }

    /// Severity used against the threshold. Custom names count as `Info`.
    pub fn severity(&self) -> LogLevel {
        match self {
            LevelName::Known(level) => *level,
            LevelName::Custom(_) => LogLevel::Info,
        }
    }
}

impl From<LogLevel> for LevelName {
    fn from(level: LogLevel) -> Self {
        LevelName::Known(level)
    }
}

impl From<&str> for LevelName {
    fn from(name: &str) -> Self {
        match name.parse::<LogLevel>() {
            Ok(level) => LevelName::Known(level),
            Err(_) => LevelName::Custom(name.to_string()),
        }
    }
}

/// One log call. Built once, rendered by every sink, then dropped.
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: DateTime<Local>,
    pub level: LevelName,
    pub category: String,
    pub parts: Vec<String>,
}

impl LogEvent {
    pub fn new(level: impl Into<LevelName>, category: impl Into<String>, parts: Vec<String>) -> Self {
        Self {
            timestamp: Local::now(),
            level: level.into(),
            category: category.into(),
            parts,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Message parts joined with single spaces.
    pub fn message(&self) -> String {
        self.parts.join(" ")
    }
}
