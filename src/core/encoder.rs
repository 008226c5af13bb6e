//! Record encoding
//!
//! One `Encoder` is built per configuration and shared by every sink:
//! - Text: tab separated, colorized level, fields as `key=value`
//! - Json: one object per line, fields flattened after the fixed keys

use super::caller::CallerFormat;
use super::error::{LoggerError, Result};
use super::field::FieldValue;
use super::log_entry::LogEntry;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use colored::Colorize;

/// Zone used when the configuration leaves it empty
pub const DEFAULT_TIME_ZONE: &str = "Asia/Shanghai";

/// Layout used when the configuration leaves it empty (millisecond precision)
pub const DEFAULT_TIME_LAYOUT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Keys every JSON record owns; a field with one of these names is written
/// as `fields.<name>`
pub const RESERVED_KEYS: [&str; 5] = ["time", "level", "logger", "caller", "message"];

/// Output format for log entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    ///
    /// Example: `2025-01-08 18:30:45.123	INFO 	create	api/user.rs:12	saved	id=7`
    #[default]
    Text,

    /// Single-line JSON document
    ///
    /// Example: `{"time":"2025-01-08 18:30:45.123","level":"INFO","message":"saved","id":7}`
    Json,
}

/// Zone- and layout-aware timestamp formatting
#[derive(Debug, Clone, PartialEq)]
pub struct TimeFormat {
    zone: Tz,
    layout: String,
}

impl TimeFormat {
    /// Load the zone and validate the strftime layout.
    ///
    /// Empty inputs fall back to [`DEFAULT_TIME_ZONE`] and [`DEFAULT_TIME_LAYOUT`].
    pub fn new(zone: &str, layout: &str) -> Result<Self> {
        let zone = if zone.is_empty() { DEFAULT_TIME_ZONE } else { zone };
        let layout = if layout.is_empty() {
            DEFAULT_TIME_LAYOUT
        } else {
            layout
        };

        let zone: Tz = zone
            .parse()
            .map_err(|_| LoggerError::invalid_time_zone(zone))?;

        if StrftimeItems::new(layout).any(|item| matches!(item, Item::Error)) {
            return Err(LoggerError::invalid_time_layout(layout));
        }

        Ok(Self {
            zone,
            layout: layout.to_string(),
        })
    }

    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        datetime
            .with_timezone(&self.zone)
            .format(&self.layout)
            .to_string()
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    pub fn layout(&self) -> &str {
        &self.layout
    }
}

impl Default for TimeFormat {
    fn default() -> Self {
        Self {
            zone: chrono_tz::Asia::Shanghai,
            layout: DEFAULT_TIME_LAYOUT.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Encoder {
    format: OutputFormat,
    time: TimeFormat,
    caller_format: CallerFormat,
    use_colors: bool,
}

impl Encoder {
    pub fn new(format: OutputFormat, time: TimeFormat) -> Self {
        Self {
            format,
            time,
            caller_format: CallerFormat::Short,
            use_colors: format == OutputFormat::Text,
        }
    }

    #[must_use]
    pub fn with_caller_format(mut self, caller_format: CallerFormat) -> Self {
        self.caller_format = caller_format;
        self
    }

    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    pub fn output_format(&self) -> OutputFormat {
        self.format
    }

    pub fn time_format(&self) -> &TimeFormat {
        &self.time
    }

    /// Encode one record, including the trailing newline
    pub fn encode(&self, entry: &LogEntry) -> Result<String> {
        let mut line = match self.format {
            OutputFormat::Text => self.format_text(entry),
            OutputFormat::Json => self.format_json(entry)?,
        };
        line.push('\n');
        Ok(line)
    }

    fn format_text(&self, entry: &LogEntry) -> String {
        let level_str = if self.use_colors {
            format!("{:5}", entry.level.to_str())
                .color(entry.level.color_code())
                .to_string()
        } else {
            format!("{:5}", entry.level.to_str())
        };

        let mut columns = vec![self.time.format(&entry.timestamp), level_str];
        if let Some(ref name) = entry.logger {
            columns.push(name.clone());
        }
        if let Some(ref caller) = entry.caller {
            columns.push(caller.format(self.caller_format));
        }
        columns.push(entry.message.clone());

        if !entry.fields.is_empty() {
            let fields = entry
                .fields
                .iter()
                .map(|field| {
                    let value = match &field.value {
                        FieldValue::String(s) => escape_text_value(s),
                        other => other.to_string(),
                    };
                    format!("{}={}", field.key, value)
                })
                .collect::<Vec<_>>()
                .join(" ");
            columns.push(fields);
        }

        columns.join("\t")
    }

    fn format_json(&self, entry: &LogEntry) -> Result<String> {
        let mut json_obj = serde_json::Map::new();

        json_obj.insert(
            "time".to_string(),
            serde_json::Value::String(self.time.format(&entry.timestamp)),
        );
        json_obj.insert(
            "level".to_string(),
            serde_json::Value::String(entry.level.to_str().to_string()),
        );
        if let Some(ref name) = entry.logger {
            json_obj.insert("logger".to_string(), serde_json::Value::String(name.clone()));
        }
        if let Some(ref caller) = entry.caller {
            json_obj.insert(
                "caller".to_string(),
                serde_json::Value::String(caller.format(self.caller_format)),
            );
        }
        json_obj.insert(
            "message".to_string(),
            serde_json::Value::String(entry.message.clone()),
        );

        for field in &entry.fields {
            let key = if RESERVED_KEYS.contains(&field.key.as_str()) {
                format!("fields.{}", field.key)
            } else {
                field.key.clone()
            };
            json_obj.insert(key, field.value.to_json_value());
        }

        Ok(serde_json::to_string(&serde_json::Value::Object(json_obj))?)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new(OutputFormat::Text, TimeFormat::default())
    }
}

/// Quote a text value if it would break key=value parsing
fn escape_text_value(value: &str) -> String {
    if value.is_empty() || value.contains([' ', '"', '=', '\t', '\n']) {
        let escaped = value
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n")
            .replace('\t', "\\t");
        format!("\"{}\"", escaped)
    } else {
        value.to_string()
    }
}
