//! Console writer implementation
//!
//! Settings: `target` (`"stdout"` or `"stderr"`, default stdout), `colors`
//! (bool, default false) and the shared `flags` timestamp bitmask.

use super::format::LineFormat;
use crate::core::{LogMessage, LogWriter, LoggerError, Result, WriterConfig, WriterContext};
#[cfg(feature = "console")]
use colored::Colorize;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleTarget {
    #[default]
    Stdout,
    Stderr,
}

pub struct ConsoleWriter {
    target: ConsoleTarget,
    /// Replaces the process stream when set
    output: Option<Box<dyn Write + Send>>,
    use_colors: bool,
    format: LineFormat,
    ctx: Option<WriterContext>,
}

impl ConsoleWriter {
    pub fn new() -> Self {
        Self {
            target: ConsoleTarget::default(),
            output: None,
            use_colors: false,
            format: LineFormat::default(),
            ctx: None,
        }
    }

    /// Write into `output` instead of a process stream
    pub fn with_output(output: impl Write + Send + 'static) -> Self {
        Self {
            output: Some(Box::new(output)),
            ..Self::new()
        }
    }

    fn render(&self, msg: &LogMessage) -> String {
        #[cfg(feature = "console")]
        {
            if self.use_colors {
                let tag = LineFormat::tag(msg)
                    .color(msg.severity().color_code())
                    .to_string();
                return self.format.render_with_tag(msg, &tag);
            }
        }
        self.format.render(msg)
    }
}

impl Default for ConsoleWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl LogWriter for ConsoleWriter {
    fn init(&mut self, ctx: WriterContext, config: &WriterConfig) -> Result<()> {
        self.target = match config.get_str("target")? {
            None => ConsoleTarget::Stdout,
            Some(t) if t.eq_ignore_ascii_case("stdout") => ConsoleTarget::Stdout,
            Some(t) if t.eq_ignore_ascii_case("stderr") => ConsoleTarget::Stderr,
            Some(other) => {
                return Err(LoggerError::config(
                    config.name(),
                    format!("target must be \"stdout\" or \"stderr\", got \"{}\"", other),
                ))
            }
        };
        self.use_colors = config.get_bool("colors")?.unwrap_or(false);
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
        let line = self.render(msg);
        match (&mut self.output, self.target) {
            (Some(output), _) => writeln!(output, "{}", line)?,
            (None, ConsoleTarget::Stdout) => writeln!(io::stdout().lock(), "{}", line)?,
            (None, ConsoleTarget::Stderr) => writeln!(io::stderr().lock(), "{}", line)?,
        }
        Ok(())
    }

    fn flush(&mut self) {
        let result = match (&mut self.output, self.target) {
            (Some(output), _) => output.flush(),
            (None, ConsoleTarget::Stdout) => io::stdout().flush(),
            (None, ConsoleTarget::Stderr) => io::stderr().flush(),
        };
        if let Err(e) = result {
            eprintln!("[LOGGER ERROR] Console flush failed: {}", e);
        }
    }

    fn destroy(&mut self) {
        self.output = None;
        self.ctx = None;
    }
}
