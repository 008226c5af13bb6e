//! Logging macros for ergonomic log message formatting.
//!
//! The message takes `format!` arguments. Fields follow a `;` as
//! `key => value` pairs.
//!
//! # Examples
//!
//! ```
//! use logtee::prelude::*;
//! use logtee::info;
//!
//! let logger = Logger::builder().hide_console(true).build().unwrap();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // With fields
//! info!(logger, "User {} logged in", 42; "action" => "login", "attempt" => 1);
//! ```

/// Log at an explicit level.
///
/// # Examples
///
/// ```
/// # use logtee::prelude::*;
/// # let logger = Logger::detached();
/// use logtee::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500; "path" => "/orders");
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $fmt:literal $(, $arg:expr)* ; $($key:expr => $value:expr),+ $(,)?) => {
        $logger.log(
            $level,
            format!($fmt $(, $arg)*),
            [$($crate::Field::new($key, $value)),+],
        )
    };
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+), [])
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use logtee::prelude::*;
/// # let logger = Logger::detached();
/// use logtee::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100; "batch" => 7);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message, then exit the process (attached loggers only).
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $fmt:literal $(, $arg:expr)* ; $($key:expr => $value:expr),+ $(,)?) => {
        $logger.fatal(format!($fmt $(, $arg)*), [$($crate::Field::new($key, $value)),+])
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatal(format!($($arg)+), [])
    };
}
