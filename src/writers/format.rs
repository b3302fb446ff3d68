//! Line rendering shared by the text writers
//!
//! A rendered line is `<function>[<S>] ||| <message>`, prefixed by
//! `<timestamp> ||| ` when any timestamp flag is set.

use crate::core::{LogMessage, LoggerError, Result, WriterConfig};

/// Separator between the rendered fields
pub const FIELD_SEPARATOR: &str = "|||";

pub const FLAG_DATE: u64 = 1;
pub const FLAG_TIME: u64 = 2;
pub const FLAG_MICROSECONDS: u64 = 4;
pub const DEFAULT_FLAGS: u64 = FLAG_DATE | FLAG_TIME;

const FLAGS_KEY: &str = "flags";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineFormat {
    flags: u64,
}

impl LineFormat {
    pub fn new(flags: u64) -> Result<Self> {
        if flags & !(FLAG_DATE | FLAG_TIME | FLAG_MICROSECONDS) != 0 {
            return Err(LoggerError::config(
                "flags",
                format!("unknown timestamp flag bits in {}", flags),
            ));
        }
        Ok(Self { flags })
    }

    /// No timestamp prefix
    pub const fn plain() -> Self {
        Self { flags: 0 }
    }

    /// Read the optional `flags` setting of a writer section
    pub fn from_config(config: &WriterConfig) -> Result<Self> {
        match config.get_u64(FLAGS_KEY)? {
            Some(flags) => Self::new(flags),
            None => Ok(Self::default()),
        }
    }

    pub fn flags(&self) -> u64 {
        self.flags
    }

    fn timestamp_pattern(&self) -> Option<String> {
        let mut parts = Vec::with_capacity(2);
        if self.flags & FLAG_DATE != 0 {
            parts.push("%Y/%m/%d");
        }
        if self.flags & (FLAG_TIME | FLAG_MICROSECONDS) != 0 {
            if self.flags & FLAG_MICROSECONDS != 0 {
                parts.push("%H:%M:%S%.6f");
            } else {
                parts.push("%H:%M:%S");
            }
        }
        (!parts.is_empty()).then(|| parts.join(" "))
    }

    /// Function tag and severity code, e.g. `Foo.bar[W]`
    pub fn tag(msg: &LogMessage) -> String {
        format!("{}[{}]", msg.function(), msg.severity())
    }

    pub fn render(&self, msg: &LogMessage) -> String {
        self.render_with_tag(msg, &Self::tag(msg))
    }

    /// Render using a pre-formatted tag (e.g. a colored one)
    pub fn render_with_tag(&self, msg: &LogMessage, tag: &str) -> String {
        match self.timestamp_pattern() {
            Some(pattern) => format!(
                "{} {} {} {} {}",
                msg.timestamp().format(&pattern),
                FIELD_SEPARATOR,
                tag,
                FIELD_SEPARATOR,
                msg.message()
            ),
            None => format!("{} {} {}", tag, FIELD_SEPARATOR, msg.message()),
        }
    }
}

impl Default for LineFormat {
    fn default() -> Self {
        Self {
            flags: DEFAULT_FLAGS,
        }
    }
}
