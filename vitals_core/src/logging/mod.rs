//! Column-aligned logging to a colorized console and a plain daily file.

pub mod align;
pub mod event;
pub mod facade;
pub mod format;
pub mod layer;
pub mod sink;

pub use align::{elapsed, pad, strip_styles, visible_len, Alignment};
pub use event::{LevelName, LogEvent, LogLevel};
pub use facade::{get_logger, init, is_initialized, LogSystem, LogSystemBuilder, Logger};
pub use format::{ConsoleRenderer, FileRenderer, Render};
pub use layer::LogSystemLayer;
pub use sink::{LogSink, RollingFileSink, StreamSink};
