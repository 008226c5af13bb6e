//! Appender that encodes records onto a shared writer

use crate::core::{
    Appender, Encoder, LevelRouter, LogEntry, LogLevel, LoggerError, Result, SharedWriter,
};
use std::sync::Arc;

/// Encoder, destination and routing rule: the unit every sink is built from
pub struct WriterAppender {
    name: String,
    encoder: Arc<Encoder>,
    writer: SharedWriter,
    router: LevelRouter,
}

impl WriterAppender {
    pub fn new(
        name: impl Into<String>,
        encoder: Arc<Encoder>,
        writer: SharedWriter,
        router: LevelRouter,
    ) -> Self {
        Self {
            name: name.into(),
            encoder,
            writer,
            router,
        }
    }

    pub fn router(&self) -> &LevelRouter {
        &self.router
    }

    pub fn writer(&self) -> &SharedWriter {
        &self.writer
    }

    /// Same destination and encoder, different routing rule
    #[must_use]
    pub fn rerouted(&self, router: LevelRouter) -> Self {
        Self {
            name: self.name.clone(),
            encoder: Arc::clone(&self.encoder),
            writer: Arc::clone(&self.writer),
            router,
        }
    }
}

impl Appender for WriterAppender {
    fn enabled(&self, level: LogLevel) -> bool {
        self.router.accepts(level)
    }

    fn append(&self, entry: &LogEntry) -> Result<()> {
        let line = self.encoder.encode(entry)?;
        let mut writer = self.writer.lock();
        writer.write_all(line.as_bytes()).map_err(|e| {
            LoggerError::io_operation(
                "writing log record",
                format!("appender '{}' failed", self.name),
                e,
            )
        })
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
