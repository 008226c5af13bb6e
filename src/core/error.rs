//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// A severity name that does not parse
    #[error("Invalid log level: '{name}'")]
    InvalidLevel { name: String },

    /// Unknown time zone identifier
    #[error("Failed to load time zone '{zone}'")]
    InvalidTimeZone { zone: String },

    /// Time layout that is not a valid strftime format
    #[error("Invalid time layout '{layout}'")]
    InvalidTimeLayout { layout: String },

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML configuration error
    #[error("YAML config error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML configuration error
    #[error("TOML config error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// File appender error with path
    #[error("File appender error for '{path}': {message}")]
    FileAppenderError { path: String, message: String },

    /// File rotation error
    #[error("File rotation failed for '{path}': {message}")]
    FileRotationError { path: String, message: String },

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),
}

impl LoggerError {
    /// Create an invalid level error
    pub fn invalid_level(name: impl Into<String>) -> Self {
        LoggerError::InvalidLevel { name: name.into() }
    }

    /// Create a time zone load error
    pub fn invalid_time_zone(zone: impl Into<String>) -> Self {
        LoggerError::InvalidTimeZone { zone: zone.into() }
    }

    /// Create an invalid time layout error
    pub fn invalid_time_layout(layout: impl Into<String>) -> Self {
        LoggerError::InvalidTimeLayout {
            layout: layout.into(),
        }
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a file appender error
    pub fn file_appender(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileAppenderError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a file rotation error
    pub fn file_rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileRotationError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// Whether this error was raised while validating configuration
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            LoggerError::InvalidLevel { .. }
                | LoggerError::InvalidTimeZone { .. }
                | LoggerError::InvalidTimeLayout { .. }
                | LoggerError::InvalidConfiguration { .. }
                | LoggerError::YamlError(_)
                | LoggerError::TomlError(_)
        )
    }
}
