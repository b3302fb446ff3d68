//! # Rust Leveled Logger
//!
//! A leveled, asynchronous logging engine. Callers emit messages tagged
//! with a function name, a severity and, for debug messages, a debug
//! level. Every configured writer decides through its own write rules
//! whether a message reaches it; delivery happens on a dedicated dispatch
//! thread.
//!
//! ## Features
//!
//! - **Layered rules**: global rule, per-writer rules and per-function-name
//!   rules with prefix fallback
//! - **Asynchronous delivery**: bounded channel, one dispatch thread,
//!   synchronous drain on destroy
//! - **Pluggable writers**: console, file and in-memory backends behind the
//!   [`LogWriter`] trait, resolved by name through a [`WriterRegistry`]
//!
//! ```
//! use rust_leveled_logger::prelude::*;
//!
//! let config = r#"{"main":{"UseFncRules":true},
//!                  "console":{"Severity":"error","flags":0,
//!                             "FncRules":{"Net.recv":{"Severity":"debug","DebugLevel":2}}}}"#;
//! let logger = Logger::from_json(64, config).unwrap();
//! logger.debug_at("Net.recv.header", "parsed 12 bytes", DebugLevel::Extended);
//! logger.destroy();
//! ```

pub mod core;
pub mod macros;
pub mod writers;

pub mod prelude {
    pub use crate::core::{
        BaseRule, DebugLevel, LogMessage, LogWriter, Logger, LoggerBuilder, LoggerConfig,
        LoggerError, LoggerMetrics, Result, Severity, WriteRules, WriterConfig, WriterContext,
        WriterRegistry,
    };
    pub use crate::writers::{ConsoleWriter, FileWriter, MemorySink, MemoryWriter};
}

pub use crate::core::{
    BaseRule, DebugLevel, LogMessage, LogWriter, Logger, LoggerBuilder, LoggerConfig,
    LoggerError, LoggerMetrics, MainConfig, Result, RuleBook, Severity, WriteRules,
    WriterBinding, WriterConfig, WriterContext, WriterFactory, WriterRegistry,
    DEFAULT_BUFFER_SIZE,
};
pub use crate::writers::{ConsoleWriter, FileWriter, LineFormat, MemorySink, MemoryWriter};
