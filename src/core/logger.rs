//! Main logger implementation
//!
//! Producers run a cheap pre-filter and push accepted messages into a
//! bounded channel. One dispatch thread drains the channel and, for every
//! bound writer, asks the rule book whether that writer takes the message.
//! Destroying the logger closes the channel, waits for the dispatch thread
//! to drain it, then flushes and destroys every writer.

use super::{
    config::LoggerConfig,
    error::{LoggerError, Result},
    log_message::LogMessage,
    metrics::LoggerMetrics,
    registry::WriterRegistry,
    rule::RuleBook,
    severity::{DebugLevel, Severity},
    writer::{LogWriter, WriterContext},
};
use chrono::Local;
use crossbeam_channel::{bounded, Receiver, Sender};
use serde_json::Value;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

/// Default channel capacity
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

enum Command {
    Log(LogMessage),
    Flush(Sender<()>),
}

/// One instantiated writer, bound under its writer-type name.
///
/// Its rules live in the logger's [`RuleBook`] under the same name.
pub struct WriterBinding {
    name: String,
    writer: Box<dyn LogWriter>,
}

impl WriterBinding {
    pub fn new(name: impl Into<String>, writer: Box<dyn LogWriter>) -> Self {
        Self {
            name: name.into(),
            writer,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn write(&mut self, msg: &LogMessage, metrics: &LoggerMetrics) {
        let result = catch_unwind(AssertUnwindSafe(|| self.writer.write(msg)));
        match result {
            Ok(Ok(())) => {
                metrics.record_delivered();
            }
            Ok(Err(e)) => {
                eprintln!("[LOGGER ERROR] Writer '{}' failed: {}", self.name, e);
                metrics.record_write_failure();
            }
            Err(panic_info) => {
                eprintln!(
                    "[LOGGER CRITICAL] Writer '{}' panicked: {}. \
                     Other writers continue to function.",
                    self.name,
                    panic_message(panic_info)
                );
                metrics.record_write_failure();
            }
        }
    }

    fn flush(&mut self) {
        if let Err(panic_info) = catch_unwind(AssertUnwindSafe(|| self.writer.flush())) {
            eprintln!(
                "[LOGGER CRITICAL] Writer '{}' panicked during flush: {}",
                self.name,
                panic_message(panic_info)
            );
        }
    }

    fn destroy(&mut self) {
        if let Err(panic_info) = catch_unwind(AssertUnwindSafe(|| self.writer.destroy())) {
            eprintln!(
                "[LOGGER CRITICAL] Writer '{}' panicked during destroy: {}",
                self.name,
                panic_message(panic_info)
            );
        }
    }
}

fn panic_message(panic_info: Box<dyn Any + Send>) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

pub struct Logger {
    rules: Arc<RuleBook>,
    writer_names: Vec<String>,
    session_id: Arc<str>,
    /// Least urgent severity any writer admits
    max_severity: Option<Severity>,
    /// Highest debug level any consultable rule admits
    max_debug_level: Option<DebugLevel>,
    sender: Option<Sender<Command>>,
    dispatch_handle: Option<thread::JoinHandle<()>>,
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    /// Build a logger from JSON text using the process-wide registry.
    ///
    /// ```
    /// use rust_leveled_logger::Logger;
    ///
    /// let logger = Logger::from_json(10, r#"{"console":{"Severity":"warn"}}"#).unwrap();
    /// logger.warn("Example.main", "disk almost full");
    /// logger.destroy();
    /// ```
    pub fn from_json(buffer_size: usize, config: &str) -> Result<Self> {
        Self::builder().buffer_size(buffer_size).config_json(config).build()
    }

    /// Build a logger, instantiating every configured writer from `registry`.
    pub fn from_config(
        registry: &WriterRegistry,
        buffer_size: usize,
        config: &LoggerConfig,
    ) -> Result<Self> {
        if config.writers.is_empty() {
            return Err(LoggerError::NoWriters);
        }

        let mut rules = RuleBook::new(config.main.rule, config.main.use_fnc_rules);
        for writer_config in &config.writers {
            if !registry.contains(writer_config.name()) {
                return Err(LoggerError::unknown_writer(writer_config.name()));
            }
            rules.insert_writer(writer_config.name(), writer_config.write_rules()?);
        }
        let rules = Arc::new(rules);
        let session_id: Arc<str> = config
            .main
            .session_id
            .clone()
            .unwrap_or_else(generate_session_id)
            .into();

        let mut bindings: Vec<WriterBinding> = Vec::with_capacity(config.writers.len());
        for writer_config in &config.writers {
            let name = writer_config.name();
            let initialized = registry.create(name).and_then(|mut writer| {
                let ctx = WriterContext::new(name, Arc::clone(&rules), Arc::clone(&session_id));
                writer
                    .init(ctx, writer_config)
                    .map(|()| writer)
                    .map_err(|e| LoggerError::writer_init(name, e))
            });
            match initialized {
                Ok(writer) => bindings.push(WriterBinding::new(name, writer)),
                Err(e) => {
                    for binding in bindings.iter_mut() {
                        binding.destroy();
                    }
                    return Err(e);
                }
            }
        }

        let writer_names = bindings.iter().map(|b| b.name().to_string()).collect();
        let max_severity = rules.max_severity();
        let max_debug_level = rules.max_debug_level();
        crate::internal_trace!(
            "logger {} built: max_severity={:?} max_debug_level={:?} use_fnc_rules={}",
            session_id,
            max_severity,
            max_debug_level,
            rules.use_fnc_rules()
        );

        let (sender, receiver) = bounded(buffer_size);
        let metrics = Arc::new(LoggerMetrics::new());
        let rules_clone = Arc::clone(&rules);
        let metrics_clone = Arc::clone(&metrics);

        let handle = thread::Builder::new()
            .name("logger-dispatch".to_string())
            .spawn(move || Self::dispatch(receiver, bindings, &rules_clone, &metrics_clone))
            .map_err(|e| {
                LoggerError::io_operation("starting logger", "cannot spawn dispatch thread", e)
            })?;

        Ok(Self {
            rules,
            writer_names,
            session_id,
            max_severity,
            max_debug_level,
            sender: Some(sender),
            dispatch_handle: Some(handle),
            metrics,
        })
    }

    /// Dispatch loop: the only caller of writer operations.
    fn dispatch(
        receiver: Receiver<Command>,
        mut bindings: Vec<WriterBinding>,
        rules: &RuleBook,
        metrics: &LoggerMetrics,
    ) {
        // iteration ends once every sender is gone and the buffer is empty
        for command in receiver.iter() {
            match command {
                Command::Log(msg) => {
                    for binding in bindings.iter_mut() {
                        if rules.must_write(binding.name(), &msg) {
                            binding.write(&msg, metrics);
                        } else {
                            metrics.record_rejected();
                        }
                    }
                }
                Command::Flush(ack) => {
                    for binding in bindings.iter_mut() {
                        binding.flush();
                    }
                    let _ = ack.send(());
                }
            }
        }

        for binding in bindings.iter_mut() {
            binding.flush();
            binding.destroy();
        }
    }

    /// Producer-side pre-filter.
    ///
    /// Never rejects a message some writer would accept. The severity check
    /// is skipped while function rules are enabled, since a function rule
    /// may admit more than its writer rule.
    pub fn is_enabled(&self, severity: Severity, debug_level: DebugLevel) -> bool {
        if !self.rules.use_fnc_rules() {
            match self.max_severity {
                Some(max) if severity <= max => {}
                _ => return false,
            }
        }
        if severity == Severity::Debug {
            return self.max_debug_level.is_some_and(|max| debug_level <= max);
        }
        true
    }

    /// Admission decision for `writer`; the dispatch thread runs this for
    /// every bound writer and message.
    pub fn must_write(&self, writer: &str, msg: &LogMessage) -> bool {
        self.rules.must_write(writer, msg)
    }

    /// Enqueue an already built message, subject to the pre-filter.
    ///
    /// Blocks while the channel is full.
    pub fn log(&self, msg: LogMessage) {
        let debug_level = msg.debug_level().unwrap_or_default();
        if !self.is_enabled(msg.severity(), debug_level) {
            self.metrics.record_prefiltered();
            return;
        }
        self.enqueue(msg);
    }

    fn submit(
        &self,
        function: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
        debug_level: DebugLevel,
    ) {
        if !self.is_enabled(severity, debug_level) {
            self.metrics.record_prefiltered();
            return;
        }
        let msg = if severity == Severity::Debug {
            LogMessage::debug(function, message, debug_level)
        } else {
            LogMessage::new(function, message, severity)
        };
        self.enqueue(msg);
    }

    fn enqueue(&self, msg: LogMessage) {
        if let Some(ref sender) = self.sender {
            match sender.send(Command::Log(msg)) {
                Ok(()) => {
                    self.metrics.record_enqueued();
                }
                Err(_) => {
                    eprintln!("[LOGGER WARNING] Dispatch thread is gone, message dropped");
                }
            }
        }
    }

    #[inline]
    pub fn fatal(&self, function: impl Into<String>, message: impl Into<String>) {
        self.submit(function, message, Severity::Fatal, DebugLevel::Base);
    }

    #[inline]
    pub fn error(&self, function: impl Into<String>, message: impl Into<String>) {
        self.submit(function, message, Severity::Error, DebugLevel::Base);
    }

    #[inline]
    pub fn warn(&self, function: impl Into<String>, message: impl Into<String>) {
        self.submit(function, message, Severity::Warn, DebugLevel::Base);
    }

    #[inline]
    pub fn info(&self, function: impl Into<String>, message: impl Into<String>) {
        self.submit(function, message, Severity::Info, DebugLevel::Base);
    }

    /// Debug message at [`DebugLevel::Base`]
    #[inline]
    pub fn debug(&self, function: impl Into<String>, message: impl Into<String>) {
        self.submit(function, message, Severity::Debug, DebugLevel::Base);
    }

    #[inline]
    pub fn debug_at(
        &self,
        function: impl Into<String>,
        message: impl Into<String>,
        debug_level: DebugLevel,
    ) {
        self.submit(function, message, Severity::Debug, debug_level);
    }

    /// Wait until every message enqueued so far is delivered, then flush
    /// every writer.
    pub fn flush(&self) -> Result<()> {
        let sender = self.sender.as_ref().ok_or(LoggerError::LoggerStopped)?;
        let (ack_sender, ack_receiver) = bounded(1);
        sender
            .send(Command::Flush(ack_sender))
            .map_err(|_| LoggerError::LoggerStopped)?;
        ack_receiver.recv().map_err(|_| LoggerError::LoggerStopped)
    }

    /// Close the channel, drain it, then flush and destroy every writer.
    ///
    /// Waits without timeout: a writer stuck in `write` blocks this call.
    pub fn destroy(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // Close the channel to signal the dispatch thread
        drop(self.sender.take());

        if let Some(handle) = self.dispatch_handle.take() {
            if let Err(e) = handle.join() {
                eprintln!(
                    "[LOGGER ERROR] Dispatch thread panicked during shutdown: {}",
                    panic_message(e)
                );
            }
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Bound writers in configuration order
    pub fn writer_names(&self) -> Vec<&str> {
        self.writer_names.iter().map(String::as_str).collect()
    }

    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    pub fn max_severity(&self) -> Option<Severity> {
        self.max_severity
    }

    pub fn max_debug_level(&self) -> Option<DebugLevel> {
        self.max_debug_level
    }

    /// Get the logger metrics for detailed observability
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn generate_session_id() -> String {
    format!("GEN{}", Local::now().format("%Y%m%d%H%M%S%3f"))
}

/// Builder for constructing a Logger with a fluent API
///
/// # Example
/// ```
/// use rust_leveled_logger::prelude::*;
/// use serde_json::json;
///
/// let registry = WriterRegistry::new();
/// let sink = MemorySink::new();
/// registry.register("memory", MemoryWriter::factory(sink.clone())).unwrap();
///
/// let logger = Logger::builder()
///     .buffer_size(16)
///     .config(json!({"memory": {"Severity": "info"}}))
///     .registry(&registry)
///     .build()
///     .unwrap();
///
/// logger.info("Example.run", "started");
/// logger.destroy();
/// assert_eq!(sink.lines(), vec!["Example.run[I] ||| started"]);
/// ```
pub struct LoggerBuilder<'r> {
    buffer_size: usize,
    registry: Option<&'r WriterRegistry>,
    config: Option<Result<LoggerConfig>>,
}

impl<'r> LoggerBuilder<'r> {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            registry: None,
            config: None,
        }
    }

    /// Channel capacity; producers block while it is full
    #[must_use = "builder methods return a new value"]
    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Registry to resolve writer names; defaults to [`WriterRegistry::global`]
    #[must_use = "builder methods return a new value"]
    pub fn registry(mut self, registry: &'r WriterRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Configuration as a JSON tree
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, tree: Value) -> Self {
        self.config = Some(LoggerConfig::parse(&tree));
        self
    }

    /// Configuration as JSON text
    #[must_use = "builder methods return a new value"]
    pub fn config_json(mut self, text: &str) -> Self {
        self.config = Some(LoggerConfig::from_json(text));
        self
    }

    /// Already parsed configuration
    #[must_use = "builder methods return a new value"]
    pub fn parsed_config(mut self, config: LoggerConfig) -> Self {
        self.config = Some(Ok(config));
        self
    }

    /// Build the Logger
    pub fn build(self) -> Result<Logger> {
        let config = self.config.unwrap_or(Err(LoggerError::NoWriters))?;
        let registry = self.registry.unwrap_or_else(|| WriterRegistry::global());
        Logger::from_config(registry, self.buffer_size, &config)
    }
}

impl Default for LoggerBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder<'r>() -> LoggerBuilder<'r> {
        LoggerBuilder::new()
    }
}
