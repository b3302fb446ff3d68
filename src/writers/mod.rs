//! Writer implementations

pub mod console;
pub mod file;
pub mod format;
pub mod memory;

pub use console::{ConsoleTarget, ConsoleWriter};
pub use file::FileWriter;
pub use format::LineFormat;
pub use memory::{MemorySink, MemoryWriter};

// Re-export the trait next to its implementations
pub use crate::core::LogWriter;
