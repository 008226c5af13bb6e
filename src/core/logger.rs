//! Hierarchical logger nodes
//!
//! A `Logger` is a cheap value: a dotted name path, the fields attached so
//! far, a caller skip and a handle to the [`Engine`] snapshot it writes
//! through. Every operation returns a new node; siblings share the engine
//! but never each other's de-dup state.

use super::appender::{Appender, Hook};
use super::caller::CallerLocation;
use super::config::{Config, RotateConfig};
use super::dedup::FieldKeySet;
use super::engine::Engine;
use super::error::Result;
use super::field::Field;
use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use super::metrics::LoggerMetrics;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;
use uuid::Uuid;

/// Field carrying the service name on every record of a build
pub const SERVICE_KEY: &str = "service";

/// Field attached by [`Logger::start`]
pub const TASK_ID_KEY: &str = "task_id";

/// # Example
///
/// ```
/// use logtee::{Field, Logger};
///
/// let root = Logger::builder()
///     .service("orders")
///     .hide_console(true)
///     .build()
///     .unwrap();
///
/// let create = root.derive("user").derive("create");
/// assert_eq!(create.name(), "create");
/// assert_eq!(create.name_path(), "user.create");
///
/// create.with([Field::new("id", 7)]).info("saved", []);
/// ```
#[derive(Clone)]
pub struct Logger {
    name_path: String,
    /// Name written to records
    display_name: String,
    fields: Vec<Field>,
    caller_skip: Option<usize>,
    /// Frames between the tracked call site and the reported one
    extra_frames: usize,
    engine: Option<Arc<Engine>>,
    dedup: Arc<FieldKeySet>,
}

impl Logger {
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Console logger with an optional generic file at `<file_path>.log`.
    ///
    /// `debug` lowers the threshold to debug and turns on the crate's own
    /// diagnostics.
    pub fn easy(debug: bool, hide_console: bool, file_path: &str, service: &str) -> Result<Self> {
        let mut builder = Self::builder()
            .service(service)
            .hide_console(hide_console)
            .debug(debug);
        if debug {
            builder = builder.level(LogLevel::Debug);
        }
        if !file_path.is_empty() {
            builder = builder.file_path(file_path);
        }
        builder.build()
    }

    /// Root node of a build: unnamed, tagged with the service
    pub(crate) fn root(service: &str, engine: Arc<Engine>) -> Self {
        Self {
            name_path: String::new(),
            display_name: String::new(),
            fields: vec![Field::new(SERVICE_KEY, service)],
            caller_skip: Some(1),
            extra_frames: 0,
            engine: Some(engine),
            dedup: Arc::new(FieldKeySet::new()),
        }
    }

    /// A node with no sinks; every call except `panic` is a no-op
    pub fn detached() -> Self {
        Self {
            name_path: String::new(),
            display_name: String::new(),
            fields: Vec::new(),
            caller_skip: None,
            extra_frames: 0,
            engine: None,
            dedup: Arc::new(FieldKeySet::new()),
        }
    }

    /// Child node named `name` under this node's path.
    ///
    /// The child reports only the last path segment as its name, starts with
    /// no explicit caller skip and gets its own copy of the de-dup set.
    #[must_use]
    pub fn derive(&self, name: &str) -> Logger {
        let name_path = if self.name_path.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.name_path, name)
        };
        let display_name = name_path.rsplit('.').next().unwrap_or_default().to_string();

        Logger {
            name_path,
            display_name,
            fields: self.fields.clone(),
            caller_skip: None,
            extra_frames: self.extra_frames,
            engine: self.engine.clone(),
            dedup: Arc::new(self.dedup.copy()),
        }
    }

    #[must_use]
    pub fn with(&self, fields: impl IntoIterator<Item = Field>) -> Logger {
        let mut child = self.clone();
        child.fields.extend(fields);
        child.dedup = Arc::new(self.dedup.copy());
        child
    }

    /// Attach `field` unless `key` was already attached on this branch
    #[must_use]
    pub fn with_when_not_exist(&self, key: &str, field: Field) -> Logger {
        if self.dedup.exists(key) {
            return self.clone();
        }

        let dedup = self.dedup.copy();
        dedup.set(key);

        let mut child = self.clone();
        child.fields.push(field);
        child.dedup = Arc::new(dedup);
        child
    }

    /// Scope a unit of work under a fresh task id
    #[must_use]
    pub fn start(&self) -> Logger {
        self.with([Field::new(TASK_ID_KEY, Uuid::new_v4().simple().to_string())])
    }

    /// Report call sites `skip` frames further out than the immediate caller
    #[must_use]
    pub fn add_caller_skip(&self, skip: usize) -> Logger {
        let mut child = self.clone();
        child.caller_skip = Some(skip);
        child.extra_frames += skip;
        child
    }

    /// Node over a new engine snapshot with `level` as the console and
    /// generic file threshold.
    ///
    /// Nodes obtained before this call keep the threshold they had. The new
    /// node keeps this node's fields, reports its full name path and starts
    /// with a fresh de-dup set.
    #[must_use]
    pub fn set_level(&self, level: LogLevel) -> Logger {
        Logger {
            name_path: self.name_path.clone(),
            display_name: self.name_path.clone(),
            fields: self.fields.clone(),
            caller_skip: Some(1),
            extra_frames: 0,
            engine: self.engine.as_ref().map(|engine| engine.with_level(level)),
            dedup: Arc::new(FieldKeySet::new()),
        }
    }

    /// Name written to records
    pub fn name(&self) -> &str {
        &self.display_name
    }

    /// Full dotted path
    pub fn name_path(&self) -> &str {
        &self.name_path
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn caller_skip(&self) -> Option<usize> {
        self.caller_skip
    }

    /// Threshold of the console and generic file sinks, if attached
    pub fn level(&self) -> Option<LogLevel> {
        self.engine.as_ref().map(|engine| engine.level())
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        self.engine
            .as_ref()
            .is_some_and(|engine| engine.enabled(level))
    }

    pub fn engine(&self) -> Option<&Arc<Engine>> {
        self.engine.as_ref()
    }

    pub fn metrics(&self) -> Option<&LoggerMetrics> {
        self.engine.as_ref().map(|engine| engine.metrics().as_ref())
    }

    pub fn flush(&self) -> Result<()> {
        match self.engine {
            Some(ref engine) => engine.flush(),
            None => Ok(()),
        }
    }

    #[inline]
    #[track_caller]
    pub fn log(
        &self,
        level: LogLevel,
        message: impl AsRef<str>,
        fields: impl IntoIterator<Item = Field>,
    ) {
        self.emit(level, Location::caller(), message.as_ref(), fields);
    }

    /// Emit with an explicitly supplied call site, for adapters that know
    /// the origin of a record better than the stack does
    pub fn log_at(
        &self,
        level: LogLevel,
        caller: Option<CallerLocation>,
        message: impl AsRef<str>,
        fields: impl IntoIterator<Item = Field>,
    ) {
        if let Some(ref engine) = self.engine {
            if engine.enabled(level) {
                self.dispatch(engine, level, caller, message.as_ref(), fields);
            }
        }
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl AsRef<str>, fields: impl IntoIterator<Item = Field>) {
        self.emit(LogLevel::Debug, Location::caller(), message.as_ref(), fields);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl AsRef<str>, fields: impl IntoIterator<Item = Field>) {
        self.emit(LogLevel::Info, Location::caller(), message.as_ref(), fields);
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl AsRef<str>, fields: impl IntoIterator<Item = Field>) {
        self.emit(LogLevel::Warn, Location::caller(), message.as_ref(), fields);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl AsRef<str>, fields: impl IntoIterator<Item = Field>) {
        self.emit(LogLevel::Error, Location::caller(), message.as_ref(), fields);
    }

    /// Emit, flush and exit the process with status 1.
    ///
    /// A detached node does nothing.
    #[track_caller]
    pub fn fatal(&self, message: impl AsRef<str>, fields: impl IntoIterator<Item = Field>) {
        let Some(ref engine) = self.engine else {
            return;
        };
        self.emit(LogLevel::Fatal, Location::caller(), message.as_ref(), fields);
        if let Err(e) = engine.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush before exit: {}", e);
        }
        std::process::exit(1);
    }

    /// Emit, then panic with the message, attached or not
    #[track_caller]
    pub fn panic(&self, message: impl AsRef<str>, fields: impl IntoIterator<Item = Field>) -> ! {
        let message = message.as_ref();
        self.emit(LogLevel::Panic, Location::caller(), message, fields);
        panic!("{}", message);
    }

    fn emit(
        &self,
        level: LogLevel,
        anchor: &'static Location<'static>,
        message: &str,
        fields: impl IntoIterator<Item = Field>,
    ) {
        let Some(ref engine) = self.engine else {
            return;
        };
        if !engine.enabled(level) {
            return;
        }

        let caller = CallerLocation::resolve(anchor, self.extra_frames);
        self.dispatch(engine, level, Some(caller), message, fields);
    }

    fn dispatch(
        &self,
        engine: &Engine,
        level: LogLevel,
        caller: Option<CallerLocation>,
        message: &str,
        fields: impl IntoIterator<Item = Field>,
    ) {
        let mut entry = LogEntry::new(level, message)
            .with_logger(self.display_name.as_str())
            .with_fields(self.fields.iter().cloned())
            .with_fields(fields);
        entry.caller = caller;
        engine.emit(&entry);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::detached()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name_path", &self.name_path)
            .field("fields", &self.fields)
            .field("caller_skip", &self.caller_skip)
            .field("level", &self.level())
            .finish()
    }
}

/// Fluent construction over a [`Config`]
///
/// # Example
/// ```no_run
/// use logtee::{LogLevel, Logger};
///
/// let logger = Logger::builder()
///     .service("billing")
///     .level(LogLevel::Debug)
///     .file_path("logs/billing")
///     .redirect(LogLevel::Error, "logs/billing-error.log")
///     .json(true)
///     .build()
///     .unwrap();
/// ```
#[derive(Default)]
pub struct LoggerBuilder {
    config: Config,
    appenders: Vec<Arc<dyn Appender>>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn from_config(config: Config) -> Self {
        Self {
            config,
            appenders: Vec::new(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn service(mut self, service: impl Into<String>) -> Self {
        self.config.service = service.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.config.level = level;
        self
    }

    /// Base path of the generic file sink (`.log` is appended)
    #[must_use = "builder methods return a new value"]
    pub fn file_path(mut self, path: impl Into<String>) -> Self {
        self.config.file_path = Some(path.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn time_zone(mut self, zone: impl Into<String>) -> Self {
        self.config.time_zone = zone.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn time_layout(mut self, layout: impl Into<String>) -> Self {
        self.config.time_layout = layout.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn json(mut self, enabled: bool) -> Self {
        self.config.json = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn dev(mut self, enabled: bool) -> Self {
        self.config.dev = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn debug(mut self, enabled: bool) -> Self {
        self.config.debug = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn hide_console(mut self, hidden: bool) -> Self {
        self.config.hide_console = hidden;
        self
    }

    /// Send `level` only to `path` instead of the generic file
    #[must_use = "builder methods return a new value"]
    pub fn redirect(mut self, level: LogLevel, path: impl Into<String>) -> Self {
        self.config
            .level_to_path
            .insert(level.as_lowercase().to_string(), path.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn rotate(mut self, rotate: RotateConfig) -> Self {
        self.config.rotate = rotate;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn hook<H: Hook + 'static>(mut self, hook: H) -> Self {
        self.config.hooks.push(Arc::new(hook));
        self
    }

    /// Add an appender to the composite as is
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appenders.push(Arc::new(appender));
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn build(self) -> Result<Logger> {
        self.config.build_with(self.appenders)
    }
}
