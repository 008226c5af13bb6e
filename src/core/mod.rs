//! Core logger types and traits

pub mod appender;
pub mod caller;
pub mod config;
pub mod dedup;
pub mod encoder;
pub mod engine;
pub mod error;
pub mod field;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod router;

pub use appender::{shared_writer, Appender, Hook, SharedWriter, WriterHook};
pub use caller::{CallerFormat, CallerLocation};
pub use config::{Config, RotateConfig};
pub use dedup::FieldKeySet;
pub use encoder::{
    Encoder, OutputFormat, TimeFormat, DEFAULT_TIME_LAYOUT, DEFAULT_TIME_ZONE, RESERVED_KEYS,
};
pub use engine::Engine;
pub use error::{LoggerError, Result};
pub use field::{Field, FieldValue};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder, SERVICE_KEY, TASK_ID_KEY};
pub use metrics::LoggerMetrics;
pub use router::LevelRouter;
