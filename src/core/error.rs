//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration text is not valid JSON
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Configuration names a writer type nobody registered
    #[error("Unknown writer '{0}' (forgotten registration?)")]
    UnknownWriter(String),

    /// A writer type was registered twice
    #[error("Writer '{0}' already registered")]
    DuplicateWriter(String),

    /// Configuration carries no writer section
    #[error("No writer configured")]
    NoWriters,

    /// A writer rejected its configuration during init
    #[error("Writer '{writer}' failed to initialize: {source}")]
    WriterInit {
        writer: String,
        #[source]
        source: Box<LoggerError>,
    },

    /// File writer error with path
    #[error("File writer error for '{path}': {message}")]
    FileWriterError { path: String, message: String },

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),

    /// Dispatch thread is gone
    #[error("Logger already stopped")]
    LoggerStopped,

}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn unknown_writer(name: impl Into<String>) -> Self {
        LoggerError::UnknownWriter(name.into())
    }

    pub fn duplicate_writer(name: impl Into<String>) -> Self {
        LoggerError::DuplicateWriter(name.into())
    }

    pub fn writer_init(writer: impl Into<String>, source: LoggerError) -> Self {
        LoggerError::WriterInit {
            writer: writer.into(),
            source: Box::new(source),
        }
    }

    /// Create a file writer error
    pub fn file_writer(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileWriterError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// Whether this error belongs to the set that aborts logger construction
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            LoggerError::JsonError(_)
                | LoggerError::InvalidConfiguration { .. }
                | LoggerError::UnknownWriter(_)
                | LoggerError::DuplicateWriter(_)
                | LoggerError::NoWriters
                | LoggerError::WriterInit { .. }
        )
    }
}
