//! File writer implementation
//!
//! Settings: `filename` (required) and the shared `flags` timestamp
//! bitmask. The file is opened in append mode on the first admitted write.

use super::format::LineFormat;
use crate::core::{LogMessage, LogWriter, LoggerError, Result, WriterConfig, WriterContext};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub struct FileWriter {
    path: Option<PathBuf>,
    writer: Option<BufWriter<File>>,
    format: LineFormat,
    ctx: Option<WriterContext>,
}

impl FileWriter {
    pub fn new() -> Self {
        Self {
            path: None,
            writer: None,
            format: LineFormat::default(),
            ctx: None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn open(&mut self) -> Result<&mut BufWriter<File>> {
        if self.writer.is_none() {
            let path = self
                .path
                .as_ref()
                .ok_or_else(|| LoggerError::writer("File writer not initialized"))?;
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    LoggerError::file_writer(
                        path.display().to_string(),
                        format!("cannot open: {}", e),
                    )
                })?;
            self.writer = Some(BufWriter::new(file));
        }
        self.writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("File writer not initialized"))
    }

    fn flush_to_disk(&mut self) -> std::io::Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        Ok(())
    }
}

impl Default for FileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl LogWriter for FileWriter {
    fn init(&mut self, ctx: WriterContext, config: &WriterConfig) -> Result<()> {
        let filename = config
            .get_str("filename")?
            .filter(|name| !name.is_empty())
            .ok_or_else(|| LoggerError::config(config.name(), "filename not configured"))?;
        self.path = Some(PathBuf::from(filename));
        self.format = LineFormat::from_config(config)?;
        self.ctx = Some(ctx);
        Ok(())
    }

    fn write(&mut self, msg: &LogMessage) -> Result<()> {
        if let Some(ref ctx) = self.ctx {
            if !ctx.must_write(msg) {
                return Ok(());
            }
        }
        let line = self.format.render(msg);
        let writer = self.open()?;
        writeln!(writer, "{}", line)?;
        Ok(())
    }

    fn flush(&mut self) {
        if let Err(e) = self.flush_to_disk() {
            let path = self.path.as_deref().unwrap_or_else(|| Path::new("<unset>"));
            eprintln!("[LOGGER ERROR] Flush of '{}' failed: {}", path.display(), e);
        }
    }

    fn destroy(&mut self) {
        // BufWriter flushes its buffer on drop
        self.writer = None;
    }
}

impl Drop for FileWriter {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.flush_to_disk();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BaseRule, RuleBook, Severity, WriteRules};
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn context() -> WriterContext {
        let mut rules = RuleBook::new(BaseRule::unset(), false);
        rules.insert_writer("file", WriteRules::new(BaseRule::with_severity(Severity::Info)));
        WriterContext::new("file", Arc::new(rules), Arc::from("TEST"))
    }

    fn config(settings: serde_json::Value) -> WriterConfig {
        WriterConfig::new("file", settings.as_object().cloned().unwrap())
    }

    #[test]
    fn test_filename_required() {
        let mut writer = FileWriter::new();
        let err = writer.init(context(), &config(json!({"flags": 0}))).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration for file: filename not configured"
        );
    }

    #[test]
    fn test_opens_lazily_and_appends() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("lazy.log");
        let settings = json!({"filename": path.to_str().unwrap(), "flags": 0});

        let mut writer = FileWriter::new();
        writer.init(context(), &config(settings.clone())).unwrap();
        assert!(!path.exists());

        writer.write(&LogMessage::new("File.test", "first", Severity::Info)).unwrap();
        writer.write(&LogMessage::new("File.test", "skipped", Severity::Debug)).unwrap();
        writer.destroy();

        let mut writer = FileWriter::new();
        writer.init(context(), &config(settings)).unwrap();
        writer.write(&LogMessage::new("File.test", "second", Severity::Error)).unwrap();
        writer.destroy();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "File.test[I] ||| first\nFile.test[E] ||| second\n");
    }

    #[test]
    fn test_unwritable_path_reports_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("missing-dir").join("x.log");

        let mut writer = FileWriter::new();
        writer
            .init(context(), &config(json!({"filename": path.to_str().unwrap()})))
            .unwrap();
        let err = writer
            .write(&LogMessage::new("File.test", "lost", Severity::Error))
            .unwrap_err();
        match err {
            LoggerError::FileWriterError { path: reported, message } => {
                assert_eq!(reported, path.display().to_string());
                assert!(message.starts_with("cannot open"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
