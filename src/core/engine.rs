//! Immutable sink snapshot shared by every logger of one build
//!
//! `Engine::build` wires the sinks a [`Config`] describes. Re-leveling never
//! mutates an engine: `with_level` returns a fresh snapshot that reuses the
//! same destinations, so loggers holding the old snapshot keep their old
//! threshold.

use super::appender::{shared_writer, Appender, SharedWriter};
use super::config::Config;
use super::encoder::Encoder;
use super::error::Result;
use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use super::metrics::LoggerMetrics;
use super::router::LevelRouter;
use crate::appenders::{RotatingFileWriter, Tee, WriterAppender};
use std::collections::BTreeSet;
use std::sync::Arc;

pub struct Engine {
    level: LogLevel,
    encoder: Arc<Encoder>,
    /// Generic `<filePath>.log` sink; its router excludes redirected levels
    file: Option<Arc<WriterAppender>>,
    /// Per-severity sinks, hook sinks and external sinks, in build order.
    /// None of them depend on the threshold.
    fixed: Vec<Arc<dyn Appender>>,
    /// Stdout destination, absent when the console is hidden
    console: Option<SharedWriter>,
    tee: Tee,
    metrics: Arc<LoggerMetrics>,
    debug: bool,
}

impl Engine {
    /// Wire every sink the configuration names.
    ///
    /// Severity names and the time format are validated before any file is
    /// opened, so a failing build leaves nothing behind.
    pub fn build(config: &Config, extra: Vec<Arc<dyn Appender>>) -> Result<Arc<Engine>> {
        let redirects = config.redirects()?;
        let encoder = Arc::new(config.encoder()?);
        let policy = config.rotate.resolved();
        let redirected: BTreeSet<LogLevel> = redirects.keys().copied().collect();

        config.trace(format_args!(
            "build service={} level={} redirects={:?}",
            config.service, config.level, redirected
        ));

        let file = match config.generic_file_path() {
            Some(path) => {
                let writer = RotatingFileWriter::with_policy(&path, policy.clone())?;
                let router = LevelRouter::at_least(config.level).except(redirected.iter().copied());
                config.trace(format_args!("file sink {} {:?}", path.display(), router));
                Some(Arc::new(WriterAppender::new(
                    format!("file:{}", path.display()),
                    Arc::clone(&encoder),
                    shared_writer(writer),
                    router,
                )))
            }
            None => None,
        };

        let mut fixed: Vec<Arc<dyn Appender>> = Vec::new();

        for (level, path) in &redirects {
            let writer = RotatingFileWriter::with_policy(path, policy.clone())?;
            config.trace(format_args!("redirect {} -> {}", level, path.display()));
            fixed.push(Arc::new(WriterAppender::new(
                format!("file:{}", path.display()),
                Arc::clone(&encoder),
                shared_writer(writer),
                LevelRouter::exactly(*level),
            )));
        }

        for (idx, hook) in config.hooks.iter().enumerate() {
            fixed.push(Arc::new(WriterAppender::new(
                format!("hook#{}", idx),
                Arc::clone(&encoder),
                hook.writer(),
                LevelRouter::at_least(hook.min_level()),
            )));
        }

        fixed.extend(extra);

        let console = (!config.hide_console).then(|| shared_writer(std::io::stdout()));

        Ok(Arc::new(Self::assemble(
            config.level,
            encoder,
            file,
            fixed,
            console,
            Arc::new(LoggerMetrics::new()),
            config.debug,
        )))
    }

    fn assemble(
        level: LogLevel,
        encoder: Arc<Encoder>,
        file: Option<Arc<WriterAppender>>,
        fixed: Vec<Arc<dyn Appender>>,
        console: Option<SharedWriter>,
        metrics: Arc<LoggerMetrics>,
        debug: bool,
    ) -> Self {
        let mut children: Vec<Arc<dyn Appender>> = Vec::with_capacity(fixed.len() + 2);
        if let Some(ref file) = file {
            children.push(Arc::clone(file) as Arc<dyn Appender>);
        }
        if let Some(ref console) = console {
            children.push(Arc::new(WriterAppender::new(
                "console",
                Arc::clone(&encoder),
                Arc::clone(console),
                LevelRouter::at_least(level),
            )));
        }
        children.extend(fixed.iter().cloned());

        let tee = Tee::new(children, Arc::clone(&metrics));

        Self {
            level,
            encoder,
            file,
            fixed,
            console,
            tee,
            metrics,
            debug,
        }
    }

    /// New snapshot with `level` as the console and generic file threshold.
    ///
    /// Destinations are shared with this snapshot. The generic file keeps
    /// its redirect exclusions and every other sink is carried over as is.
    pub fn with_level(&self, level: LogLevel) -> Arc<Engine> {
        if self.debug {
            eprintln!("[LOGGER DEBUG] set level {} -> {}", self.level, level);
        }

        let file = self
            .file
            .as_ref()
            .map(|file| Arc::new(file.rerouted(file.router().with_threshold(level))));

        Arc::new(Self::assemble(
            level,
            Arc::clone(&self.encoder),
            file,
            self.fixed.clone(),
            self.console.clone(),
            Arc::clone(&self.metrics),
            self.debug,
        ))
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    pub fn metrics(&self) -> &Arc<LoggerMetrics> {
        &self.metrics
    }

    pub fn has_console(&self) -> bool {
        self.console.is_some()
    }

    pub fn has_file(&self) -> bool {
        self.file.is_some()
    }

    /// Names of the sinks in the composite, in delivery order
    pub fn sink_names(&self) -> Vec<String> {
        self.tee
            .children()
            .iter()
            .map(|child| child.name().to_string())
            .collect()
    }

    /// Whether any sink would accept `level`
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.tee.enabled(level)
    }

    /// Best effort delivery; failures are reported by the tee, not returned
    pub fn emit(&self, entry: &LogEntry) {
        self.tee.dispatch(entry);
    }

    pub fn flush(&self) -> Result<()> {
        self.tee.flush()
    }
}
