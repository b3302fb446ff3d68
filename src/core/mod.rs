//! Core logger types and traits

pub mod config;
pub mod error;
pub mod log_message;
pub mod logger;
pub mod metrics;
pub mod registry;
pub mod rule;
pub mod severity;
pub mod writer;

pub use config::{LoggerConfig, MainConfig, WriterConfig, MAIN_SECTION};
pub use error::{LoggerError, Result};
pub use log_message::LogMessage;
pub use logger::{Logger, LoggerBuilder, WriterBinding, DEFAULT_BUFFER_SIZE};
pub use metrics::LoggerMetrics;
pub use registry::{WriterFactory, WriterRegistry};
pub use rule::{BaseRule, RuleBook, WriteRules};
pub use severity::{DebugLevel, Severity};
pub use writer::{LogWriter, WriterContext};
