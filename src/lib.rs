//! # logtee
//!
//! Structured logging core: a declarative [`Config`] becomes a root
//! [`Logger`] writing to a tee of sinks.
//!
//! ## Features
//!
//! - **Multiple sinks**: console, size-rotated files, per-severity redirect
//!   files, hook writers and custom appenders in one composite
//! - **Hierarchical loggers**: `derive` named children, attach fields with
//!   `with`, attach once per branch with `with_when_not_exist`
//! - **Snapshot re-leveling**: `set_level` returns a logger over a new sink
//!   snapshot while existing loggers keep theirs
//! - **Adapters**: `log` crate bridge and a key/value front end
//!
//! ```
//! use logtee::{Field, LogLevel, Logger};
//!
//! let root = Logger::builder()
//!     .service("orders")
//!     .level(LogLevel::Info)
//!     .hide_console(true)
//!     .build()
//!     .unwrap();
//!
//! let request = root.derive("http").start();
//! request.info("accepted", [Field::new("path", "/orders")]);
//!
//! let verbose = request.set_level(LogLevel::Debug);
//! verbose.debug("body parsed", []);
//! ```

pub mod adapters;
pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{MemoryWriter, RotatingFileWriter, RotationPolicy, WriterAppender};
    pub use crate::core::{
        Appender, Config, Field, FieldValue, Hook, LogEntry, LogLevel, Logger, LoggerBuilder,
        LoggerError, LoggerMetrics, OutputFormat, Result, RotateConfig, WriterHook,
    };
}

pub use crate::appenders::{MemoryWriter, RotatingFileWriter, RotationPolicy, Tee, WriterAppender};
pub use crate::core::{
    shared_writer, Appender, CallerFormat, CallerLocation, Config, Encoder, Engine, Field,
    FieldKeySet, FieldValue, Hook, LevelRouter, LogEntry, LogLevel, Logger, LoggerBuilder,
    LoggerError, LoggerMetrics, OutputFormat, Result, RotateConfig, SharedWriter, TimeFormat,
    WriterHook, SERVICE_KEY, TASK_ID_KEY,
};
