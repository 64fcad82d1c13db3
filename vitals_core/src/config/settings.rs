use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::logging::LogLevel;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Settings for the log system. Column widths are fixed and live in
/// [`crate::logging::Alignment`], not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Directory holding the daily `log_<date>.log` files.
    pub directory: PathBuf,
    /// Minimum severity written to both sinks.
    pub level: LogLevel,
    /// Compress the previous day's file when the date rolls over.
    pub compress: bool,
    pub color: ColorMode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Let `colored` decide from the terminal and `NO_COLOR`/`CLICOLOR`.
    #[default]
    Auto,
    Always,
    Never,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 32504,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            level: LogLevel::Debug,
            compress: true,
            color: ColorMode::Auto,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?);

        if std::path::Path::new("config.toml").exists() {
            builder = builder.add_source(File::with_name("config"));
        }

        builder = builder.add_source(
            Environment::with_prefix("APP")
                .separator("_")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        app_config.validate()?;

        Ok(app_config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("Server port cannot be 0".to_string()));
        }

        if self.server.host.is_empty() {
            return Err(ConfigError::Message("Server host cannot be empty".to_string()));
        }

        if self.logging.directory.as_os_str().is_empty() {
            return Err(ConfigError::Message(
                "Log directory cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 32504);
        assert_eq!(config.logging.directory, PathBuf::from("logs"));
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert!(config.logging.compress);
        assert_eq!(config.logging.color, ColorMode::Auto);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();

        config.server.port = 0;
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.server.host = String::new();
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.logging.directory = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bind_address() {
        let config = AppConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:32504");

        let mut config = AppConfig::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 8080;
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_config_loading() {
        let config = AppConfig::load().expect("Should load default configuration");

        assert!(config.validate().is_ok());
        assert!(!config.server.host.is_empty());
        assert!(config.server.port > 0);
    }

    #[test]
    fn test_logging_config_deserializes_lowercase_names() {
        let config: LoggingConfig = serde_json::from_value(serde_json::json!({
            "directory": "/var/log/vitals",
            "level": "warn",
            "compress": false,
            "color": "never"
        }))
        .unwrap();

        assert_eq!(config.level, LogLevel::Warn);
        assert_eq!(config.color, ColorMode::Never);
        assert!(!config.compress);
    }
}
