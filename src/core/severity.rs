//! Severity and debug level definitions
//!
//! Both enumerations are ordered from the most to the least urgent value:
//! `Fatal < Error < Warn < Info < Debug` and
//! `Base < Extended < Verbose < VeryVerbose < EvenMoreVerbose`.
//! A threshold admits every value that compares less than or equal to it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Fatal = 1,
    Error = 2,
    Warn = 3,
    Info = 4,
    /// The only severity refined by a [`DebugLevel`]
    Debug = 5,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::Fatal,
        Severity::Error,
        Severity::Warn,
        Severity::Info,
        Severity::Debug,
    ];

    /// Single-letter code used when rendering messages
    pub fn code(&self) -> &'static str {
        match self {
            Severity::Fatal => "F",
            Severity::Error => "E",
            Severity::Warn => "W",
            Severity::Info => "I",
            Severity::Debug => "D",
        }
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            Severity::Fatal => "FATAL",
            Severity::Error => "ERROR",
            Severity::Warn => "WARN",
            Severity::Info => "INFO",
            Severity::Debug => "DEBUG",
        }
    }

    /// Map a configuration ordinal (1..=5) to a severity.
    ///
    /// Zero is not a severity: configuration uses it for "inherit".
    pub fn from_ordinal(value: u64) -> Option<Self> {
        match value {
            1 => Some(Severity::Fatal),
            2 => Some(Severity::Error),
            3 => Some(Severity::Warn),
            4 => Some(Severity::Info),
            5 => Some(Severity::Debug),
            _ => None,
        }
    }

    pub fn ordinal(&self) -> u8 {
        *self as u8
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            Severity::Fatal => BrightRed,
            Severity::Error => Red,
            Severity::Warn => Yellow,
            Severity::Info => Green,
            Severity::Debug => Blue,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "F" | "FATAL" => Ok(Severity::Fatal),
            "E" | "ERR" | "ERROR" => Ok(Severity::Error),
            "W" | "WARN" | "WARNING" => Ok(Severity::Warn),
            "I" | "INFO" => Ok(Severity::Info),
            "D" | "DEB" | "DEBUG" => Ok(Severity::Debug),
            _ => Err(format!("Invalid severity: '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum DebugLevel {
    #[default]
    Base = 1,
    Extended = 2,
    Verbose = 3,
    VeryVerbose = 4,
    EvenMoreVerbose = 5,
}

impl DebugLevel {
    pub const ALL: [DebugLevel; 5] = [
        DebugLevel::Base,
        DebugLevel::Extended,
        DebugLevel::Verbose,
        DebugLevel::VeryVerbose,
        DebugLevel::EvenMoreVerbose,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            DebugLevel::Base => "B",
            DebugLevel::Extended => "E",
            DebugLevel::Verbose => "V",
            DebugLevel::VeryVerbose => "VV",
            DebugLevel::EvenMoreVerbose => "VVV",
        }
    }

    pub fn from_ordinal(value: u64) -> Option<Self> {
        match value {
            1 => Some(DebugLevel::Base),
            2 => Some(DebugLevel::Extended),
            3 => Some(DebugLevel::Verbose),
            4 => Some(DebugLevel::VeryVerbose),
            5 => Some(DebugLevel::EvenMoreVerbose),
            _ => None,
        }
    }

    pub fn ordinal(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for DebugLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for DebugLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_uppercase();
        match normalized.as_str() {
            "B" | "BASE" => Ok(DebugLevel::Base),
            "E" | "EXTENDED" => Ok(DebugLevel::Extended),
            "V" | "VERBOSE" => Ok(DebugLevel::Verbose),
            "VV" | "VERYVERBOSE" => Ok(DebugLevel::VeryVerbose),
            "VVV" | "EVENMOREVERBOSE" => Ok(DebugLevel::EvenMoreVerbose),
            _ => Err(format!("Invalid debug level: '{}'", s)),
        }
    }
}
