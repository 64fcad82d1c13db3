pub mod settings;

pub use settings::{AppConfig, ColorMode, LoggingConfig, ServerConfig};
