//! Appender trait for log output destinations

use super::{error::Result, log_entry::LogEntry, log_level::LogLevel};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// A writable destination shared between appenders.
///
/// The mutex serializes physical writes, so a destination reused by several
/// composites (e.g. after re-leveling) never interleaves partial lines.
pub type SharedWriter = Arc<Mutex<dyn Write + Send>>;

/// Wrap any writer for sharing
pub fn shared_writer<W: Write + Send + 'static>(writer: W) -> SharedWriter {
    Arc::new(Mutex::new(writer))
}

pub trait Appender: Send + Sync {
    /// Whether a record at `level` should be handed to `append`
    fn enabled(&self, level: LogLevel) -> bool;
    fn append(&self, entry: &LogEntry) -> Result<()>;
    fn flush(&self) -> Result<()>;
    fn name(&self) -> &str;
}

/// An externally supplied destination added at build time.
///
/// The builder adds one appender per hook, writing through the hook's
/// writer at the hook's own minimum level.
pub trait Hook: Send + Sync {
    fn writer(&self) -> SharedWriter;
    fn min_level(&self) -> LogLevel;
}

/// Hook over any shared writer
#[derive(Clone)]
pub struct WriterHook {
    writer: SharedWriter,
    min_level: LogLevel,
}

impl WriterHook {
    pub fn new(writer: SharedWriter, min_level: LogLevel) -> Self {
        Self { writer, min_level }
    }
}

impl Hook for WriterHook {
    fn writer(&self) -> SharedWriter {
        Arc::clone(&self.writer)
    }

    fn min_level(&self) -> LogLevel {
        self.min_level
    }
}
