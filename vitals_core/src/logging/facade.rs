//! Log system lifecycle and named logger handles

use colored::Colorize;
use once_cell::sync::OnceCell;
use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::util::SubscriberInitExt;

use super::align::{process_start, Alignment};
use super::event::{LevelName, LogEvent, LogLevel};
use super::format::{ConsoleRenderer, FileRenderer, Render};
use super::layer;
use super::sink::{LogSink, RollingFileSink, StreamSink};
use crate::config::{ColorMode, LoggingConfig};
use crate::error::{AppError, Result};

pub const SYSTEM_CATEGORY: &str = "Log System";
const BANNER_RULE: &str = "----------------------------------";

static LOG_SYSTEM: OnceCell<LogSystem> = OnceCell::new();

struct Output {
    renderer: Box<dyn Render>,
    sink: Box<dyn LogSink>,
    failing: AtomicBool,
}

impl Output {
    /// Reports the first failure of a run of failures; a successful write
    /// re-arms the report.
    fn write(&self, event: &LogEvent) {
        let line = self.renderer.render(event);
        match self.sink.write_line(event, &line) {
            Ok(()) => self.failing.store(false, Ordering::Relaxed),
            Err(err) => {
                if !self.failing.swap(true, Ordering::Relaxed) {
                    eprintln!("log sink write failed: {}", err);
                }
            }
        }
    }
}

struct Dispatcher {
    threshold: LogLevel,
    outputs: Vec<Output>,
    started: Instant,
}

impl Dispatcher {
    fn enabled(&self, level: &LevelName) -> bool {
        level.severity() >= self.threshold
    }

    fn dispatch(&self, event: &LogEvent) {
        if !self.enabled(&event.level) {
            return;
        }

        for output in &self.outputs {
            output.write(event);
        }
    }
}

/// Renderers and sinks behind one severity threshold. Cheap to clone; all
/// clones and every [`Logger`] they hand out share the same outputs.
#[derive(Clone)]
pub struct LogSystem {
    dispatcher: Arc<Dispatcher>,
}

pub struct LogSystemBuilder {
    threshold: LogLevel,
    started: Instant,
    outputs: Vec<Output>,
}

impl LogSystemBuilder {
    pub fn threshold(mut self, threshold: LogLevel) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn started(mut self, started: Instant) -> Self {
        self.started = started;
        self
    }

    pub fn output<R, S>(mut self, renderer: R, sink: S) -> Self
    where
        R: Render + 'static,
        S: LogSink + 'static,
    {
        self.outputs.push(Output {
            renderer: Box::new(renderer),
            sink: Box::new(sink),
            failing: AtomicBool::new(false),
        });
        self
    }

    pub fn build(self) -> LogSystem {
        LogSystem {
            dispatcher: Arc::new(Dispatcher {
                threshold: self.threshold,
                outputs: self.outputs,
                started: self.started,
            }),
        }
    }
}

impl LogSystem {
    pub fn builder() -> LogSystemBuilder {
        LogSystemBuilder {
            threshold: LogLevel::Debug,
            started: process_start(),
            outputs: Vec::new(),
        }
    }

    /// Wires the file renderer to a daily rolling file and the console
    /// renderer to stdout. Fails if the log directory cannot be prepared.
    pub fn new(config: &LoggingConfig) -> Result<Self> {
        let started = process_start();
        let alignment = Alignment::default();

        match config.color {
            ColorMode::Always => colored::control::set_override(true),
            ColorMode::Never => colored::control::set_override(false),
            ColorMode::Auto => {}
        }

        let file_sink = RollingFileSink::open(&config.directory, config.compress)?;

        Ok(Self::builder()
            .threshold(config.level)
            .started(started)
            .output(FileRenderer::new(alignment), file_sink)
            .output(ConsoleRenderer::new(alignment, started), StreamSink::stdout())
            .build())
    }

    pub fn threshold(&self) -> LogLevel {
        self.dispatcher.threshold
    }

    pub fn logger(&self, category: &str) -> Logger {
        Logger {
            category: Arc::from(category),
            dispatcher: Arc::clone(&self.dispatcher),
        }
    }

    pub fn dispatch(&self, event: &LogEvent) {
        self.dispatcher.dispatch(event);
    }

    pub fn flush(&self) {
        for output in &self.dispatcher.outputs {
            if let Err(err) = output.sink.flush() {
                eprintln!("log sink flush failed: {}", err);
            }
        }
    }

    /// Startup banner with the time taken since process start.
    pub fn announce(&self) {
        let logger = self.logger(SYSTEM_CATEGORY);
        let took = format!("[ {}ms ]", self.dispatcher.started.elapsed().as_millis());

        logger.info([BANNER_RULE]);
        logger.info([""]);
        logger.info([format!("Log system initialized in {}", took.green())]);
        logger.info([""]);
        logger.info([BANNER_RULE]);
    }
}

/// Handle bound to one category. Every call produces one event that goes to
/// all outputs before the call returns.
#[derive(Clone)]
pub struct Logger {
    category: Arc<str>,
    dispatcher: Arc<Dispatcher>,
}

impl Logger {
    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        self.dispatcher.enabled(&LevelName::Known(level))
    }

    pub fn log<L, I>(&self, level: L, parts: I)
    where
        L: Into<LevelName>,
        I: IntoIterator,
        I::Item: Display,
    {
        let level = level.into();
        if !self.dispatcher.enabled(&level) {
            return;
        }

        let parts = parts.into_iter().map(|part| part.to_string()).collect();
        let event = LogEvent::new(level, &*self.category, parts);
        self.dispatcher.dispatch(&event);
    }

    pub fn trace<I>(&self, parts: I)
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.log(LogLevel::Trace, parts)
    }

    pub fn debug<I>(&self, parts: I)
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.log(LogLevel::Debug, parts)
    }

    pub fn info<I>(&self, parts: I)
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.log(LogLevel::Info, parts)
    }

    pub fn warn<I>(&self, parts: I)
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.log(LogLevel::Warn, parts)
    }

    pub fn error<I>(&self, parts: I)
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.log(LogLevel::Error, parts)
    }

    pub fn fatal<I>(&self, parts: I)
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.log(LogLevel::Fatal, parts)
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("category", &self.category)
            .field("threshold", &self.dispatcher.threshold)
            .finish()
    }
}

/// Brings up the process-wide log system: opens the sinks, routes `tracing`
/// events through them and prints the banner. Allowed once per process.
pub fn init(config: &LoggingConfig) -> Result<&'static LogSystem> {
    if LOG_SYSTEM.get().is_some() {
        return Err(AppError::AlreadyInitialized);
    }

    let system = LogSystem::new(config)?;

    layer::subscriber(system.clone())
        .try_init()
        .map_err(|e| AppError::Subscriber(e.to_string()))?;

    LOG_SYSTEM
        .set(system)
        .map_err(|_| AppError::AlreadyInitialized)?;

    let system = LOG_SYSTEM.get().ok_or(AppError::LoggerNotInitialized)?;
    system.announce();

    Ok(system)
}

pub fn get_logger(category: &str) -> Result<Logger> {
    LOG_SYSTEM
        .get()
        .map(|system| system.logger(category))
        .ok_or(AppError::LoggerNotInitialized)
}

pub fn is_initialized() -> bool {
    LOG_SYSTEM.get().is_some()
}
