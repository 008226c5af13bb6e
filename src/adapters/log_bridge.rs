//! Bridge from the `log` crate to logtee

use crate::core::{CallerLocation, Field, LogLevel, Logger};
use log::{Log, Metadata, Record};

/// Wrapper to implement the log crate's Log trait
pub struct LogBridge {
    logger: Logger,
}

impl LogBridge {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.logger.enabled(map_level(metadata.level()))
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let caller = match (record.file(), record.line()) {
            (Some(file), Some(line)) => Some(CallerLocation::new(file, line)),
            _ => None,
        };

        self.logger.log_at(
            map_level(record.level()),
            caller,
            record.args().to_string(),
            [Field::new("target", record.target())],
        );
    }

    fn flush(&self) {
        if let Err(e) = self.logger.flush() {
            eprintln!("[LOGGER ERROR] Flush from log bridge failed: {}", e);
        }
    }
}

/// Map log levels to ours; `Trace` folds into `Debug`
fn map_level(level: log::Level) -> LogLevel {
    match level {
        log::Level::Error => LogLevel::Error,
        log::Level::Warn => LogLevel::Warn,
        log::Level::Info => LogLevel::Info,
        log::Level::Debug | log::Level::Trace => LogLevel::Debug,
    }
}

/// Route every `log` macro in the process through `logger`
///
/// # Example
/// ```no_run
/// use logtee::adapters::init_log_bridge;
/// use logtee::Logger;
///
/// let logger = Logger::builder().service("api").build().unwrap();
/// init_log_bridge(logger.derive("deps"), log::LevelFilter::Info)
///     .expect("Failed to set log bridge");
///
/// log::info!("now handled by logtee");
/// ```
pub fn init_log_bridge(
    logger: Logger,
    max_level: log::LevelFilter,
) -> Result<(), log::SetLoggerError> {
    log::set_boxed_logger(Box::new(LogBridge::new(logger)))?;
    log::set_max_level(max_level);
    Ok(())
}
