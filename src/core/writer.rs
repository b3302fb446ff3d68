//! Writer trait for log output backends

use super::{config::WriterConfig, error::Result, log_message::LogMessage, rule::RuleBook};
use std::sync::Arc;

/// Capability set of every output backend.
///
/// The logger calls `write`, `flush` and `destroy` from its dispatch thread
/// only, so implementations need no locking against the logger itself.
pub trait LogWriter: Send {
    /// Read backend settings and keep `ctx` for later admission checks.
    ///
    /// An error here aborts logger construction.
    fn init(&mut self, ctx: WriterContext, config: &WriterConfig) -> Result<()>;

    /// Deliver one admitted message. Errors are reported, never retried.
    fn write(&mut self, msg: &LogMessage) -> Result<()>;

    /// Push buffered output to its destination
    fn flush(&mut self);

    /// Release every backend resource
    fn destroy(&mut self);
}

/// What a writer receives from the logger that owns it.
#[derive(Debug, Clone)]
pub struct WriterContext {
    name: String,
    rules: Arc<RuleBook>,
    session_id: Arc<str>,
}

impl WriterContext {
    pub fn new(name: impl Into<String>, rules: Arc<RuleBook>, session_id: Arc<str>) -> Self {
        Self {
            name: name.into(),
            rules,
            session_id,
        }
    }

    /// Name the writer is bound under in its logger
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    /// Admission decision of the owning logger for this writer
    pub fn must_write(&self, msg: &LogMessage) -> bool {
        self.rules.must_write(&self.name, msg)
    }
}
