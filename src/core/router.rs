//! Severity routing for sinks
//!
//! A generic sink accepts everything at or above its threshold except the
//! severities that have a dedicated sink of their own; a dedicated sink
//! accepts exactly its severity. Together they deliver every record once.

use super::log_level::LogLevel;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelRouter {
    /// Accept `threshold` and above, minus the exception set
    AtLeast {
        threshold: LogLevel,
        except: BTreeSet<LogLevel>,
    },
    /// Accept a single severity
    Exactly(LogLevel),
}

impl LevelRouter {
    /// Threshold router with no exceptions
    pub fn at_least(threshold: LogLevel) -> Self {
        LevelRouter::AtLeast {
            threshold,
            except: BTreeSet::new(),
        }
    }

    /// Router for a dedicated per-severity sink
    pub fn exactly(level: LogLevel) -> Self {
        LevelRouter::Exactly(level)
    }

    /// Add severities that are always rejected
    #[must_use]
    pub fn except(self, levels: impl IntoIterator<Item = LogLevel>) -> Self {
        match self {
            LevelRouter::AtLeast {
                threshold,
                mut except,
            } => {
                except.extend(levels);
                LevelRouter::AtLeast { threshold, except }
            }
            exact @ LevelRouter::Exactly(_) => exact,
        }
    }

    #[inline]
    pub fn accepts(&self, level: LogLevel) -> bool {
        match self {
            LevelRouter::AtLeast { threshold, except } => {
                level >= *threshold && !except.contains(&level)
            }
            LevelRouter::Exactly(target) => level == *target,
        }
    }

    /// Same exceptions, different threshold
    #[must_use]
    pub fn with_threshold(&self, threshold: LogLevel) -> Self {
        match self {
            LevelRouter::AtLeast { except, .. } => LevelRouter::AtLeast {
                threshold,
                except: except.clone(),
            },
            LevelRouter::Exactly(level) => LevelRouter::Exactly(*level),
        }
    }

    /// Lowest severity this router can accept
    pub fn threshold(&self) -> LogLevel {
        match self {
            LevelRouter::AtLeast { threshold, .. } => *threshold,
            LevelRouter::Exactly(level) => *level,
        }
    }
}
