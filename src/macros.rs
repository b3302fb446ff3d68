//! Logging macros for ergonomic log message formatting.
//!
//! Each macro takes the logger, the function tag, then `format!` arguments.
//!
//! # Examples
//!
//! ```
//! use rust_leveled_logger::prelude::*;
//! use rust_leveled_logger::{debug_at, info, warn};
//!
//! let logger = Logger::from_json(
//!     16,
//!     r#"{"console":{"Severity":"debug","DebugLevel":"verbose","flags":0}}"#,
//! )
//! .unwrap();
//!
//! info!(logger, "Server.start", "Server started");
//!
//! let port = 8080;
//! warn!(logger, "Server.bind", "Port {} already in use, retrying", port);
//!
//! let bytes = 512;
//! debug_at!(logger, "Server.recv", DebugLevel::Verbose, "read {} bytes", bytes);
//!
//! logger.destroy();
//! ```

/// Log a fatal message.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $fnc:expr, $($arg:tt)+) => {
        $logger.fatal($fnc, format!($($arg)+))
    };
}

/// Log an error message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $fnc:expr, $($arg:tt)+) => {
        $logger.error($fnc, format!($($arg)+))
    };
}

/// Log a warning message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $fnc:expr, $($arg:tt)+) => {
        $logger.warn($fnc, format!($($arg)+))
    };
}

/// Log an info message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $fnc:expr, $($arg:tt)+) => {
        $logger.info($fnc, format!($($arg)+))
    };
}

/// Log a debug message at the base debug level.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $fnc:expr, $($arg:tt)+) => {
        $logger.debug($fnc, format!($($arg)+))
    };
}

/// Log a debug message at an explicit debug level.
///
/// ```
/// # use rust_leveled_logger::prelude::*;
/// # let logger = Logger::from_json(4, r#"{"console":{"Severity":5,"DebugLevel":5,"flags":0}}"#).unwrap();
/// use rust_leveled_logger::debug_at;
/// debug_at!(logger, "Cache.evict", DebugLevel::VeryVerbose, "evicted {} entries", 3);
/// # logger.destroy();
/// ```
#[macro_export]
macro_rules! debug_at {
    ($logger:expr, $fnc:expr, $level:expr, $($arg:tt)+) => {
        $logger.debug_at($fnc, format!($($arg)+), $level)
    };
}

/// Diagnostics about the logger itself, printed to stderr when the
/// `internal-trace` feature is enabled.
#[doc(hidden)]
#[macro_export]
macro_rules! internal_trace {
    ($($arg:tt)+) => {
        if cfg!(feature = "internal-trace") {
            eprintln!("[LOGGER TRACE] {}", format_args!($($arg)+));
        }
    };
}
