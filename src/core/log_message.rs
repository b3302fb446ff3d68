//! Log message structure

use super::severity::{DebugLevel, Severity};
use chrono::{DateTime, Local};

/// One logging call, immutable once built.
///
/// `debug_level` is only set for [`Severity::Debug`] messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    function: String,
    message: String,
    severity: Severity,
    debug_level: Option<DebugLevel>,
    timestamp: DateTime<Local>,
}

impl LogMessage {
    pub fn new(function: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        let debug_level = (severity == Severity::Debug).then_some(DebugLevel::Base);
        Self {
            function: function.into(),
            message: message.into(),
            severity,
            debug_level,
            timestamp: Local::now(),
        }
    }

    pub fn debug(
        function: impl Into<String>,
        message: impl Into<String>,
        debug_level: DebugLevel,
    ) -> Self {
        Self {
            function: function.into(),
            message: message.into(),
            severity: Severity::Debug,
            debug_level: Some(debug_level),
            timestamp: Local::now(),
        }
    }

    /// Function or component tag, e.g. `Module.Sub.action`
    pub fn function(&self) -> &str {
        &self.function
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn debug_level(&self) -> Option<DebugLevel> {
        self.debug_level
    }

    pub fn timestamp(&self) -> &DateTime<Local> {
        &self.timestamp
    }
}
