//! Declarative logger configuration
//!
//! A `Config` is usually loaded from YAML or TOML and turned into a root
//! [`Logger`] with [`Config::build`]. Keys are camelCase:
//!
//! ```yaml
//! service: orders
//! level: info
//! filePath: logs/orders
//! timeZone: UTC
//! levelToPath:
//!   error: logs/orders-error.log
//! rotate:
//!   maxSize: 50
//!   disableCompress: true
//! ```

use super::appender::{Appender, Hook};
use super::caller::CallerFormat;
use super::encoder::{Encoder, OutputFormat, TimeFormat};
use super::engine::Engine;
use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::logger::Logger;
use crate::appenders::RotationPolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

/// Default rotation size in megabytes
pub const DEFAULT_ROTATE_MAX_SIZE: u64 = 100;
/// Default number of rotated files kept
pub const DEFAULT_ROTATE_MAX_BACKUPS: usize = 50;
/// Default age in days after which rotated files are removed
pub const DEFAULT_ROTATE_MAX_AGE: u64 = 7;

/// Rotation limits; zero means "use the default", not "unlimited"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RotateConfig {
    /// Megabytes
    pub max_size: u64,
    pub max_backups: usize,
    /// Days
    pub max_age: u64,
    pub disable_compress: bool,
}

impl RotateConfig {
    /// The limits actually applied to a file sink
    pub fn resolved(&self) -> RotationPolicy {
        let or_default = |value: u64, default: u64| if value == 0 { default } else { value };

        RotationPolicy::new()
            .with_max_size_mb(or_default(self.max_size, DEFAULT_ROTATE_MAX_SIZE))
            .with_max_backups(if self.max_backups == 0 {
                DEFAULT_ROTATE_MAX_BACKUPS
            } else {
                self.max_backups
            })
            .with_max_age_days(or_default(self.max_age, DEFAULT_ROTATE_MAX_AGE))
            .with_compression(!self.disable_compress)
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Attached to every record as the `service` field
    pub service: String,
    /// Threshold for the console and generic file sinks
    pub level: LogLevel,
    /// Base path of the generic file sink, written to `<filePath>.log`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    pub time_zone: String,
    pub time_layout: String,
    /// Print the crate's own build and re-level traces to stderr
    pub debug: bool,
    /// Report full caller paths
    pub dev: bool,
    pub json: bool,
    pub hide_console: bool,
    /// Severity name to dedicated file path
    pub level_to_path: BTreeMap<String, String>,
    pub rotate: RotateConfig,
    #[serde(skip)]
    pub hooks: Vec<Arc<dyn Hook>>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("service", &self.service)
            .field("level", &self.level)
            .field("file_path", &self.file_path)
            .field("time_zone", &self.time_zone)
            .field("time_layout", &self.time_layout)
            .field("debug", &self.debug)
            .field("dev", &self.dev)
            .field("json", &self.json)
            .field("hide_console", &self.hide_console)
            .field("level_to_path", &self.level_to_path)
            .field("rotate", &self.rotate)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_yaml_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_yaml::from_reader(reader)?)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Parse `level_to_path` keys into severities.
    ///
    /// Fails on the first unknown severity name, and when two names (such as
    /// `warn` and `warning`) select the same severity.
    pub fn redirects(&self) -> Result<BTreeMap<LogLevel, PathBuf>> {
        let mut redirects = BTreeMap::new();
        let mut names: BTreeMap<LogLevel, &str> = BTreeMap::new();

        for (name, path) in &self.level_to_path {
            let level: LogLevel = name.parse()?;
            if let Some(previous) = names.insert(level, name.as_str()) {
                return Err(LoggerError::config(
                    "levelToPath",
                    format!("'{}' and '{}' both redirect {}", previous, name, level),
                ));
            }
            redirects.insert(level, PathBuf::from(path));
        }

        Ok(redirects)
    }

    /// Zone and layout with defaults applied for empty values
    pub fn time_format(&self) -> Result<TimeFormat> {
        TimeFormat::new(&self.time_zone, &self.time_layout)
    }

    pub fn encoder(&self) -> Result<Encoder> {
        let format = if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        };
        let caller_format = if self.dev {
            CallerFormat::Full
        } else {
            CallerFormat::Short
        };

        Ok(Encoder::new(format, self.time_format()?).with_caller_format(caller_format))
    }

    /// Path of the generic file sink, if one is configured
    pub fn generic_file_path(&self) -> Option<PathBuf> {
        self.file_path
            .as_deref()
            .filter(|path| !path.is_empty())
            .map(|path| PathBuf::from(format!("{}.log", path)))
    }

    pub fn build(&self) -> Result<Logger> {
        self.build_with(Vec::new())
    }

    /// Build with additional appenders appended verbatim to the composite sink
    pub fn build_with(&self, extra: Vec<Arc<dyn Appender>>) -> Result<Logger> {
        let engine = Engine::build(self, extra)?;
        Ok(Logger::root(&self.service, engine))
    }

    pub(crate) fn trace(&self, message: impl fmt::Display) {
        if self.debug {
            eprintln!("[LOGGER DEBUG] {}", message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_rotate_defaults() {
        let policy = RotateConfig::default().resolved();
        assert_eq!(policy.max_bytes, 100 * 1024 * 1024);
        assert_eq!(policy.max_backups, 50);
        assert_eq!(policy.max_age, Duration::from_secs(7 * 24 * 3600));
        assert!(policy.compress);
    }

    #[test]
    fn test_rotate_explicit_values() {
        let policy = RotateConfig {
            max_size: 5,
            max_backups: 2,
            max_age: 1,
            disable_compress: true,
        }
        .resolved();

        assert_eq!(policy.max_bytes, 5 * 1024 * 1024);
        assert_eq!(policy.max_backups, 2);
        assert_eq!(policy.max_age, Duration::from_secs(24 * 3600));
        assert!(!policy.compress);
    }

    #[test]
    fn test_from_yaml() {
        let config = Config::from_yaml_str(
            r#"
service: orders
level: debug
filePath: logs/orders
timeZone: UTC
json: true
hideConsole: true
levelToPath:
  error: logs/error.log
  WARNING: logs/warn.log
rotate:
  maxSize: 10
  disableCompress: true
"#,
        )
        .unwrap();

        assert_eq!(config.service, "orders");
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.file_path.as_deref(), Some("logs/orders"));
        assert!(config.json);
        assert!(config.hide_console);
        assert_eq!(config.rotate.max_size, 10);
        assert_eq!(config.rotate.max_backups, 0);
        assert!(config.rotate.disable_compress);

        let redirects = config.redirects().unwrap();
        assert_eq!(
            redirects.get(&LogLevel::Error),
            Some(&PathBuf::from("logs/error.log"))
        );
        assert_eq!(
            redirects.get(&LogLevel::Warn),
            Some(&PathBuf::from("logs/warn.log"))
        );
    }

    #[test]
    fn test_from_toml() {
        let config = Config::from_toml_str(
            r#"
service = "billing"
level = "warn"
debug = true
dev = true

[levelToPath]
debug = "logs/debug.log"

[rotate]
maxBackups = 3
"#,
        )
        .unwrap();

        assert_eq!(config.service, "billing");
        assert_eq!(config.level, LogLevel::Warn);
        assert!(config.debug);
        assert!(config.dev);
        assert_eq!(config.rotate.max_backups, 3);
        assert_eq!(config.level_to_path["debug"], "logs/debug.log");
    }

    #[test]
    fn test_from_yaml_reader() {
        let yaml = b"service: reader\nlevel: error\n";
        let config = Config::from_yaml_reader(&yaml[..]).unwrap();
        assert_eq!(config.service, "reader");
        assert_eq!(config.level, LogLevel::Error);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = Config::from_yaml_str("{}").unwrap();
        assert_eq!(config.level, LogLevel::Info);
        assert!(config.file_path.is_none());
        assert!(config.level_to_path.is_empty());
        assert!(config.generic_file_path().is_none());
    }

    #[test]
    fn test_parse_errors() {
        let err = Config::from_yaml_str("level: loud").unwrap_err();
        assert!(matches!(err, LoggerError::YamlError(_)));

        let err = Config::from_toml_str("level = ").unwrap_err();
        assert!(matches!(err, LoggerError::TomlError(_)));
    }

    #[test]
    fn test_invalid_redirect_level() {
        let mut config = Config::new();
        config
            .level_to_path
            .insert("verbose".to_string(), "logs/verbose.log".to_string());

        let err = config.redirects().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidLevel { ref name } if name == "verbose"));
    }

    #[test]
    fn test_duplicate_redirect_level() {
        let mut config = Config::new();
        config
            .level_to_path
            .insert("warn".to_string(), "logs/warn.log".to_string());
        config
            .level_to_path
            .insert("WARNING".to_string(), "logs/warning.log".to_string());

        let err = config.redirects().unwrap_err();
        assert!(matches!(
            err,
            LoggerError::InvalidConfiguration { ref component, .. } if component == "levelToPath"
        ));
        assert!(err.is_config_error());
    }

    #[test]
    fn test_generic_file_path() {
        let mut config = Config::new();
        config.file_path = Some("logs/app".to_string());
        assert_eq!(config.generic_file_path(), Some(PathBuf::from("logs/app.log")));

        config.file_path = Some(String::new());
        assert!(config.generic_file_path().is_none());
    }

    #[test]
    fn test_encoder_follows_flags() {
        let mut config = Config::new();
        assert_eq!(config.encoder().unwrap().output_format(), OutputFormat::Text);

        config.json = true;
        config.time_zone = "UTC".to_string();
        let encoder = config.encoder().unwrap();
        assert_eq!(encoder.output_format(), OutputFormat::Json);
        assert_eq!(encoder.time_format().zone(), chrono_tz::UTC);

        config.time_zone = "Nowhere/Nothing".to_string();
        assert!(matches!(
            config.encoder().unwrap_err(),
            LoggerError::InvalidTimeZone { .. }
        ));
    }
}
