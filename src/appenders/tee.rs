//! Composite sink fanning each record out to its children

use crate::core::{Appender, LogEntry, LogLevel, LoggerError, LoggerMetrics, Result};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Fans out to every child whose routing accepts the record's level.
///
/// **Per-Appender Panic Isolation**: each child runs inside `catch_unwind`,
/// so a failing or panicking child never keeps the others from writing and
/// never reaches the logging call site. Failures go to stderr and to
/// [`LoggerMetrics`].
pub struct Tee {
    children: Vec<Arc<dyn Appender>>,
    metrics: Arc<LoggerMetrics>,
}

impl Tee {
    pub fn new(children: Vec<Arc<dyn Appender>>, metrics: Arc<LoggerMetrics>) -> Self {
        Self { children, metrics }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn children(&self) -> &[Arc<dyn Appender>] {
        &self.children
    }

    pub fn metrics(&self) -> &Arc<LoggerMetrics> {
        &self.metrics
    }

    /// Deliver `entry`; returns true when any child failed.
    pub fn dispatch(&self, entry: &LogEntry) -> bool {
        let mut has_error = false;
        let mut delivered = false;

        for (idx, child) in self.children.iter().enumerate() {
            if !child.enabled(entry.level) {
                continue;
            }
            delivered = true;

            match catch_unwind(AssertUnwindSafe(|| child.append(entry))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!(
                        "[LOGGER ERROR] Appender #{} ({}) failed: {}",
                        idx,
                        child.name(),
                        e
                    );
                    has_error = true;
                }
                Err(panic_info) => {
                    self.metrics.record_panic();
                    eprintln!(
                        "[LOGGER CRITICAL] Appender #{} ({}) panicked: {}. \
                         Other appenders continue to function.",
                        idx,
                        child.name(),
                        panic_message(panic_info.as_ref())
                    );
                    has_error = true;
                }
            }
        }

        if has_error {
            self.metrics.record_dropped();
        } else if delivered {
            self.metrics.record_logged();
        }

        has_error
    }
}

impl Appender for Tee {
    fn enabled(&self, level: LogLevel) -> bool {
        self.children.iter().any(|child| child.enabled(level))
    }

    fn append(&self, entry: &LogEntry) -> Result<()> {
        if self.dispatch(entry) {
            Err(LoggerError::writer("one or more appenders failed"))
        } else {
            Ok(())
        }
    }

    /// Flushes every child, reporting the first failure after trying all
    fn flush(&self) -> Result<()> {
        let mut first_error = None;

        for (idx, child) in self.children.iter().enumerate() {
            let result = match catch_unwind(AssertUnwindSafe(|| child.flush())) {
                Ok(result) => result,
                Err(panic_info) => {
                    self.metrics.record_panic();
                    Err(LoggerError::writer(format!(
                        "appender #{} panicked during flush: {}",
                        idx,
                        panic_message(panic_info.as_ref())
                    )))
                }
            };

            if let Err(e) = result {
                eprintln!("[LOGGER ERROR] Appender #{} flush failed: {}", idx, e);
                first_error.get_or_insert(e);
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    fn name(&self) -> &str {
        "tee"
    }
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::{MemoryWriter, WriterAppender};
    use crate::core::{Encoder, LevelRouter, OutputFormat, TimeFormat};

    struct PanickingAppender;

    impl Appender for PanickingAppender {
        fn enabled(&self, _level: LogLevel) -> bool {
            true
        }

        fn append(&self, _entry: &LogEntry) -> Result<()> {
            panic!("Intentional panic for testing");
        }

        fn flush(&self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    struct FailingAppender;

    impl Appender for FailingAppender {
        fn enabled(&self, _level: LogLevel) -> bool {
            true
        }

        fn append(&self, _entry: &LogEntry) -> Result<()> {
            Err(LoggerError::writer("disk full"))
        }

        fn flush(&self) -> Result<()> {
            Err(LoggerError::writer("disk full"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn memory_appender(memory: &MemoryWriter, router: LevelRouter) -> Arc<dyn Appender> {
        let encoder =
            Arc::new(Encoder::new(OutputFormat::Text, TimeFormat::default()).with_colors(false));
        Arc::new(WriterAppender::new("memory", encoder, memory.shared(), router))
    }

    #[test]
    fn test_routes_by_child_level() {
        let low = MemoryWriter::new();
        let high = MemoryWriter::new();
        let tee = Tee::new(
            vec![
                memory_appender(&low, LevelRouter::at_least(LogLevel::Debug)),
                memory_appender(&high, LevelRouter::exactly(LogLevel::Error)),
            ],
            Arc::new(LoggerMetrics::new()),
        );

        tee.dispatch(&LogEntry::new(LogLevel::Info, "info"));
        tee.dispatch(&LogEntry::new(LogLevel::Error, "error"));

        assert_eq!(low.lines().len(), 2);
        assert_eq!(high.lines().len(), 1);
        assert!(high.contains("error"));
    }

    #[test]
    fn test_panic_isolation() {
        let memory = MemoryWriter::new();
        let metrics = Arc::new(LoggerMetrics::new());
        let tee = Tee::new(
            vec![
                Arc::new(PanickingAppender),
                memory_appender(&memory, LevelRouter::at_least(LogLevel::Debug)),
            ],
            Arc::clone(&metrics),
        );

        assert!(tee.dispatch(&LogEntry::new(LogLevel::Info, "still written")));
        assert!(memory.contains("still written"));
        assert_eq!(metrics.appender_panics(), 1);
        assert_eq!(metrics.dropped_count(), 1);
    }

    #[test]
    fn test_failure_counts_as_dropped() {
        let metrics = Arc::new(LoggerMetrics::new());
        let tee = Tee::new(vec![Arc::new(FailingAppender)], Arc::clone(&metrics));

        assert!(tee.append(&LogEntry::new(LogLevel::Warn, "lost")).is_err());
        assert!(tee.flush().is_err());
        assert_eq!(metrics.dropped_count(), 1);
        assert_eq!(metrics.total_logged(), 0);
    }

    #[test]
    fn test_unrouted_record_is_not_counted() {
        let memory = MemoryWriter::new();
        let metrics = Arc::new(LoggerMetrics::new());
        let tee = Tee::new(
            vec![memory_appender(&memory, LevelRouter::at_least(LogLevel::Error))],
            Arc::clone(&metrics),
        );

        assert!(!tee.enabled(LogLevel::Info));
        tee.dispatch(&LogEntry::new(LogLevel::Info, "filtered"));
        assert_eq!(metrics.total_logged(), 0);
        assert!(memory.lines().is_empty());
    }
}
