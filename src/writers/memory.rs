//! In-memory writer capturing delivered messages
//!
//! Mostly useful in tests: the [`MemorySink`] handle stays with the caller
//! while the writer itself moves into the logger's dispatch thread.

use super::format::LineFormat;
use crate::core::{LogMessage, LogWriter, Result, WriterConfig, WriterContext};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
struct SinkState {
    messages: Vec<LogMessage>,
    flushes: usize,
    destroyed: bool,
    session_id: Option<String>,
}

/// Shared view of what a [`MemoryWriter`] received
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    state: Arc<Mutex<SinkState>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<LogMessage> {
        self.state.lock().messages.clone()
    }

    /// Messages rendered without timestamps
    pub fn lines(&self) -> Vec<String> {
        let format = LineFormat::plain();
        self.state
            .lock()
            .messages
            .iter()
            .map(|msg| format.render(msg))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state.lock().messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().messages.is_empty()
    }

    pub fn clear(&self) {
        self.state.lock().messages.clear();
    }

    pub fn flush_count(&self) -> usize {
        self.state.lock().flushes
    }

    pub fn is_destroyed(&self) -> bool {
        self.state.lock().destroyed
    }

    /// Session id of the logger the writer was bound to
    pub fn session_id(&self) -> Option<String> {
        self.state.lock().session_id.clone()
    }
}

pub struct MemoryWriter {
    sink: MemorySink,
    ctx: Option<WriterContext>,
}

impl MemoryWriter {
    pub fn new(sink: MemorySink) -> Self {
        Self { sink, ctx: None }
    }

    /// Factory for [`WriterRegistry::register`](crate::WriterRegistry::register);
    /// every writer it creates records into `sink`.
    pub fn factory(sink: MemorySink) -> impl Fn() -> Box<dyn LogWriter> + Send + Sync + 'static {
        move || Box::new(MemoryWriter::new(sink.clone())) as Box<dyn LogWriter>
    }
}

impl LogWriter for MemoryWriter {
    fn init(&mut self, ctx: WriterContext, _config: &WriterConfig) -> Result<()> {
        self.sink.state.lock().session_id = Some(ctx.session_id().to_string());
        self.ctx = Some(ctx);
        Ok(())
    }

    fn write(&mut self, msg: &LogMessage) -> Result<()> {
        if let Some(ref ctx) = self.ctx {
            if !ctx.must_write(msg) {
                return Ok(());
            }
        }
        self.sink.state.lock().messages.push(msg.clone());
        Ok(())
    }

    fn flush(&mut self) {
        self.sink.state.lock().flushes += 1;
    }

    fn destroy(&mut self) {
        self.sink.state.lock().destroyed = true;
    }
}
