//! Key/value logging for frameworks that pass loose argument lists
//!
//! Arguments alternate key, value, key, value. A trailing value without a
//! key is kept under `data<N>`, where N is its one-based position.

use crate::core::{Field, FieldValue, Logger};
use std::error::Error;
use std::fmt;
use std::time::Duration;

/// Value of the `type` field on slow-operation records
pub const SLOW_TYPE: &str = "slow";

/// Pair up alternating keys and values into fields
pub fn pairs_to_fields(values: impl IntoIterator<Item = FieldValue>) -> Vec<Field> {
    let values: Vec<FieldValue> = values.into_iter().collect();
    let mut fields = Vec::with_capacity(values.len() / 2 + 1);

    for (idx, pair) in values.chunks(2).enumerate() {
        match pair {
            [key, value] => fields.push(Field::new(key_text(key), value.clone())),
            [orphan] => fields.push(Field::new(format!("data{}", idx * 2 + 1), orphan.clone())),
            _ => {}
        }
    }

    fields
}

fn key_text(key: &FieldValue) -> String {
    match key {
        FieldValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Adapter that reports the caller of its own methods, not itself
///
/// # Example
/// ```
/// use logtee::adapters::KvLogger;
/// use logtee::{FieldValue, Logger};
///
/// let logger = Logger::builder().hide_console(true).build().unwrap();
/// let kv = KvLogger::new(&logger);
///
/// kv.infow("query done", [FieldValue::from("rows"), FieldValue::from(3)]);
/// kv.infof(format_args!("took {}ms", 12));
/// ```
#[derive(Debug, Clone)]
pub struct KvLogger {
    logger: Logger,
}

impl KvLogger {
    /// Wrap `logger`, skipping this adapter's frame
    pub fn new(logger: &Logger) -> Self {
        Self::with_skip(logger, 1)
    }

    pub fn with_skip(logger: &Logger, skip: usize) -> Self {
        Self {
            logger: logger.add_caller_skip(skip),
        }
    }

    /// Skip `skip` more frames, for adapters layered over this one
    #[must_use]
    pub fn with_caller_skip(&self, skip: usize) -> Self {
        Self {
            logger: self.logger.add_caller_skip(skip),
        }
    }

    #[must_use]
    pub fn with_duration(&self, duration: Duration) -> Self {
        Self {
            logger: self.logger.with([Field::new("duration", duration)]),
        }
    }

    #[must_use]
    pub fn with_fields(&self, fields: impl IntoIterator<Item = Field>) -> Self {
        Self {
            logger: self.logger.with(fields),
        }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn debugw(&self, message: &str, kvs: impl IntoIterator<Item = FieldValue>) {
        self.logger.debug(message, pairs_to_fields(kvs));
    }

    pub fn infow(&self, message: &str, kvs: impl IntoIterator<Item = FieldValue>) {
        self.logger.info(message, pairs_to_fields(kvs));
    }

    pub fn warnw(&self, message: &str, kvs: impl IntoIterator<Item = FieldValue>) {
        self.logger.warn(message, pairs_to_fields(kvs));
    }

    pub fn errorw(&self, message: &str, kvs: impl IntoIterator<Item = FieldValue>) {
        self.logger.error(message, pairs_to_fields(kvs));
    }

    pub fn debugf(&self, args: fmt::Arguments<'_>) {
        self.logger.debug(args.to_string(), []);
    }

    pub fn infof(&self, args: fmt::Arguments<'_>) {
        self.logger.info(args.to_string(), []);
    }

    pub fn warnf(&self, args: fmt::Arguments<'_>) {
        self.logger.warn(args.to_string(), []);
    }

    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        self.logger.error(args.to_string(), []);
    }

    /// Slow operation, logged at warn with `type=slow`
    pub fn slow(&self, message: &str, kvs: impl IntoIterator<Item = FieldValue>) {
        let mut fields = pairs_to_fields(kvs);
        fields.push(Field::new("type", SLOW_TYPE));
        self.logger.warn(message, fields);
    }

    pub fn error_with<E: Error + ?Sized>(
        &self,
        err: &E,
        message: &str,
        kvs: impl IntoIterator<Item = FieldValue>,
    ) {
        let mut fields = pairs_to_fields(kvs);
        fields.push(Field::error(err));
        self.logger.error(message, fields);
    }
}

/// Logger for one scheduled job, tagged with its `topic/method`
pub fn derive_job_logger(logger: &Logger, topic: &str, method: &str) -> Logger {
    logger.with([Field::new("topic/method", vec![topic, method])])
}
