//! Writer registry: writer-type name to factory
//!
//! Registration is append-only. A name can be registered once; lookups
//! take a read lock and are safe while several loggers are being built.

use super::error::{LoggerError, Result};
use super::writer::LogWriter;
use crate::writers::{ConsoleWriter, FileWriter};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

pub type WriterFactory = Arc<dyn Fn() -> Box<dyn LogWriter> + Send + Sync>;

#[derive(Default)]
pub struct WriterRegistry {
    factories: RwLock<HashMap<String, WriterFactory>>,
}

impl WriterRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in `console` and `file` writers
    pub fn with_builtin() -> Self {
        let mut factories: HashMap<String, WriterFactory> = HashMap::new();
        factories.insert(
            "console".to_string(),
            Arc::new(|| Box::new(ConsoleWriter::new()) as Box<dyn LogWriter>),
        );
        factories.insert(
            "file".to_string(),
            Arc::new(|| Box::new(FileWriter::new()) as Box<dyn LogWriter>),
        );
        Self {
            factories: RwLock::new(factories),
        }
    }

    /// Process-wide registry, initialized with the built-in writers on first use
    pub fn global() -> &'static WriterRegistry {
        static GLOBAL: OnceLock<WriterRegistry> = OnceLock::new();
        GLOBAL.get_or_init(WriterRegistry::with_builtin)
    }

    /// Register `factory` under `name`; a name already taken is an error.
    pub fn register<F>(&self, name: impl Into<String>, factory: F) -> Result<()>
    where
        F: Fn() -> Box<dyn LogWriter> + Send + Sync + 'static,
    {
        let name = name.into();
        let mut factories = self.factories.write();
        if factories.contains_key(&name) {
            return Err(LoggerError::duplicate_writer(name));
        }
        crate::internal_trace!("registered writer '{}'", name);
        factories.insert(name, Arc::new(factory));
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.read().contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Instantiate a fresh writer of type `name`
    pub fn create(&self, name: &str) -> Result<Box<dyn LogWriter>> {
        // clone the factory so user code never runs under the registry lock
        let factory = self
            .factories
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| LoggerError::unknown_writer(name))?;
        Ok(factory())
    }
}

impl fmt::Debug for WriterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterRegistry")
            .field("writers", &self.names())
            .finish()
    }
}
