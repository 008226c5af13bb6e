//! Call-site capture for log records
//!
//! Logging methods are `#[track_caller]`, so the location handed to them is
//! the first frame outside this crate. A logger that sits behind an adapter
//! can ask for a site further out with a caller skip; that walk is done on a
//! captured backtrace, anchored at the tracked location.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::Location;
use std::path::{Component, Path};

/// Source location reported for a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerLocation {
    pub file: String,
    pub line: u32,
}

/// How the caller is rendered by the encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallerFormat {
    /// Parent directory and file name: `core/logger.rs:42`
    #[default]
    Short,
    /// The path as recorded by the compiler
    Full,
}

impl CallerLocation {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Resolve the site `extra_frames` frames outward from `anchor`.
    ///
    /// Falls back to the anchor when the backtrace carries no symbols for it
    /// (stripped binaries) or when the walk runs off the stack.
    pub fn resolve(anchor: &'static Location<'static>, extra_frames: usize) -> Self {
        let fallback = Self::from(anchor);
        if extra_frames == 0 {
            return fallback;
        }

        let trace = backtrace::Backtrace::new();
        let sites: Vec<(String, u32)> = trace
            .frames()
            .iter()
            .flat_map(|frame| frame.symbols())
            .filter_map(|symbol| {
                let file = symbol.filename()?;
                let line = symbol.lineno()?;
                Some((file.display().to_string(), line))
            })
            .collect();

        let anchor_path = Path::new(anchor.file());
        let Some(anchor_idx) = sites.iter().position(|(file, line)| {
            *line == anchor.line() && Path::new(file).ends_with(anchor_path)
        }) else {
            return fallback;
        };

        sites
            .get(anchor_idx + extra_frames)
            .map(|(file, line)| Self::new(file.clone(), *line))
            .unwrap_or(fallback)
    }

    pub fn format(&self, style: CallerFormat) -> String {
        match style {
            CallerFormat::Full => format!("{}:{}", self.file, self.line),
            CallerFormat::Short => format!("{}:{}", short_path(&self.file), self.line),
        }
    }
}

impl From<&'static Location<'static>> for CallerLocation {
    fn from(location: &'static Location<'static>) -> Self {
        Self::new(location.file(), location.line())
    }
}

impl fmt::Display for CallerLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Keep the last two path components
fn short_path(file: &str) -> String {
    let parts: Vec<&str> = Path::new(file)
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();

    match parts.len() {
        0 => file.to_string(),
        1 => parts[0].to_string(),
        n => format!("{}/{}", parts[n - 2], parts[n - 1]),
    }
}
