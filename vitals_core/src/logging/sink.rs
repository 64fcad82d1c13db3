//! Output sinks: a live stream and a daily rolling file

use chrono::{Local, NaiveDate};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::event::LogEvent;

const FILE_PREFIX: &str = "log_";
const FILE_SUFFIX: &str = ".log";
const COMPRESSED_SUFFIX: &str = ".zst";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Destination for rendered lines. Writes are synchronous; a line is on its
/// way to the OS when `write_line` returns.
pub trait LogSink: Send + Sync {
    fn write_line(&self, event: &LogEvent, line: &str) -> io::Result<()>;
    fn flush(&self) -> io::Result<()>;
}

impl<T: LogSink + ?Sized> LogSink for std::sync::Arc<T> {
    fn write_line(&self, event: &LogEvent, line: &str) -> io::Result<()> {
        (**self).write_line(event, line)
    }

    fn flush(&self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Writes each line to a stream, stdout unless told otherwise.
pub struct StreamSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl StreamSink {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl LogSink for StreamSink {
    fn write_line(&self, _event: &LogEvent, line: &str) -> io::Result<()> {
        let mut writer = self.writer.lock();
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()
    }

    fn flush(&self) -> io::Result<()> {
        self.writer.lock().flush()
    }
}

/// Appends to `log_<YYYY-MM-DD>.log` in one directory and moves to a new file
/// when an event carries a later date. The finished file is compressed with
/// zstd when `compress` is set.
pub struct RollingFileSink {
    directory: PathBuf,
    compress: bool,
    state: Mutex<ActiveFile>,
}

struct ActiveFile {
    date: NaiveDate,
    file: File,
}

impl RollingFileSink {
    /// Creates the directory if needed and opens today's file. Leftover plain
    /// files from earlier days are compressed right away when `compress` is on.
    pub fn open(directory: impl Into<PathBuf>, compress: bool) -> io::Result<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory)?;

        let today = Local::now().date_naive();
        let file = open_append(&directory.join(file_name(today)))?;

        let sink = Self {
            directory,
            compress,
            state: Mutex::new(ActiveFile { date: today, file }),
        };

        if compress {
            sink.compress_stale(today);
        }

        Ok(sink)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the file currently receiving lines.
    pub fn current_path(&self) -> PathBuf {
        self.directory.join(file_name(self.state.lock().date))
    }

    fn roll(&self, active: &mut ActiveFile, date: NaiveDate) -> io::Result<()> {
        let file = open_append(&self.directory.join(file_name(date)))?;
        let previous = std::mem::replace(active, ActiveFile { date, file });
        drop(previous.file);

        if self.compress {
            let path = self.directory.join(file_name(previous.date));
            if let Err(err) = compress_file(&path) {
                eprintln!("failed to compress rotated log {}: {}", path.display(), err);
            }
        }

        Ok(())
    }

    /// Failures here are reported and skipped; only the active file matters
    /// for startup.
    fn compress_stale(&self, today: NaiveDate) {
        let entries = match fs::read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(err) => {
                eprintln!("failed to scan log directory {}: {}", self.directory.display(), err);
                return;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let stale = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(parse_file_date)
                .map_or(false, |date| date < today);

            if !stale || !path.is_file() {
                continue;
            }

            if let Err(err) = compress_file(&path) {
                eprintln!("failed to compress stale log {}: {}", path.display(), err);
            }
        }
    }
}

impl LogSink for RollingFileSink {
    fn write_line(&self, event: &LogEvent, line: &str) -> io::Result<()> {
        let mut active = self.state.lock();

        let date = event.timestamp.date_naive();
        if date > active.date {
            self.roll(&mut active, date)?;
        }

        active.file.write_all(line.as_bytes())?;
        active.file.write_all(b"\n")
    }

    fn flush(&self) -> io::Result<()> {
        self.state.lock().file.flush()
    }
}

pub fn file_name(date: NaiveDate) -> String {
    format!("{FILE_PREFIX}{}{FILE_SUFFIX}", date.format(DATE_FORMAT))
}

fn parse_file_date(name: &str) -> Option<NaiveDate> {
    let date = name.strip_prefix(FILE_PREFIX)?.strip_suffix(FILE_SUFFIX)?;
    NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Compresses `path` next to itself as `<name>.zst` and removes the plain file.
/// An existing archive is never overwritten; a numbered name is used instead.
fn compress_file(path: &Path) -> io::Result<PathBuf> {
    let mut target = PathBuf::from(format!("{}{COMPRESSED_SUFFIX}", path.display()));
    let mut counter = 1;
    while target.exists() {
        target = PathBuf::from(format!("{}.{counter}{COMPRESSED_SUFFIX}", path.display()));
        counter += 1;
    }

    let source = File::open(path)?;
    let destination = File::create(&target)?;
    if let Err(err) = zstd::stream::copy_encode(source, destination, 0) {
        let _ = fs::remove_file(&target);
        return Err(err);
    }
    fs::remove_file(path)?;

    Ok(target)
}
