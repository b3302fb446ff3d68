//! Logger configuration tree
//!
//! The configuration is a JSON object keyed by writer type, plus the
//! reserved `main` section for global settings:
//!
//! ```json
//! {
//!     "main":    {"Severity": "error", "UseFncRules": true},
//!     "console": {"Severity": 2, "FncRules": {"Foo.bar": {"Severity": 5, "DebugLevel": 2}}},
//!     "file":    {"filename": "app.log", "flags": 0}
//! }
//! ```
//!
//! Keys inside a section are matched case-insensitively. Rule values are
//! either ordinals (`1..=5`, `0` meaning "inherit") or level names.

use super::error::{LoggerError, Result};
use super::rule::{BaseRule, WriteRules};
use super::severity::{DebugLevel, Severity};
use serde_json::{Map, Value};
use std::str::FromStr;

/// Reserved top-level key for global settings
pub const MAIN_SECTION: &str = "main";

const SEVERITY_KEYS: &[&str] = &["severity", "sev"];
const DEBUG_LEVEL_KEYS: &[&str] = &["debuglevel", "dlev"];
const FNC_RULES_KEY: &str = "fncrules";
const USE_FNC_RULES_KEY: &str = "usefncrules";
const SESSION_ID_KEY: &str = "sessionid";

/// Global settings from the `main` section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MainConfig {
    pub rule: BaseRule,
    pub use_fnc_rules: bool,
    pub session_id: Option<String>,
}

/// One writer section: its type name and raw settings
#[derive(Debug, Clone, PartialEq)]
pub struct WriterConfig {
    name: String,
    settings: Map<String, Value>,
}

impl WriterConfig {
    pub fn new(name: impl Into<String>, settings: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            settings,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn settings(&self) -> &Map<String, Value> {
        &self.settings
    }

    /// Case-insensitive lookup of a setting
    pub fn get(&self, key: &str) -> Option<&Value> {
        lookup(&self.settings, &[key])
    }

    pub fn get_str(&self, key: &str) -> Result<Option<&str>> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(type_error(&self.name, key, "a string", other)),
        }
    }

    pub fn get_u64(&self, key: &str) -> Result<Option<u64>> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => as_ordinal(value)
                .map(Some)
                .ok_or_else(|| type_error(&self.name, key, "a non-negative integer", value)),
        }
    }

    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(type_error(&self.name, key, "a boolean", other)),
        }
    }

    /// Writer rule and its per-function overrides
    pub fn write_rules(&self) -> Result<WriteRules> {
        let mut rules = WriteRules::new(parse_rule(&self.name, &self.settings)?);
        match lookup(&self.settings, &[FNC_RULES_KEY]) {
            None | Some(Value::Null) => {}
            Some(Value::Object(fnc_rules)) => {
                for (function, rule) in fnc_rules {
                    let component = format!("{}.FncRules.{}", self.name, function);
                    let rule = match rule {
                        Value::Object(map) => parse_rule(&component, map)?,
                        other => return Err(type_error(&component, "rule", "an object", other)),
                    };
                    rules.fnc_rules.insert(function.clone(), rule);
                }
            }
            Some(other) => return Err(type_error(&self.name, "FncRules", "an object", other)),
        }
        Ok(rules)
    }
}

/// Parsed configuration tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoggerConfig {
    pub main: MainConfig,
    pub writers: Vec<WriterConfig>,
}

impl LoggerConfig {
    /// Split a configuration tree into the main section and writer sections.
    ///
    /// Writer names are not checked against any registry here.
    pub fn parse(tree: &Value) -> Result<Self> {
        let Value::Object(sections) = tree else {
            return Err(LoggerError::config("logger", "configuration must be a JSON object"));
        };

        let mut config = LoggerConfig::default();
        for (name, section) in sections {
            let Value::Object(settings) = section else {
                return Err(type_error(name, "section", "an object", section));
            };
            if name.eq_ignore_ascii_case(MAIN_SECTION) {
                config.main = parse_main(settings)?;
            } else {
                config.writers.push(WriterConfig::new(name.clone(), settings.clone()));
            }
        }
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let tree: Value = serde_json::from_str(text)?;
        Self::parse(&tree)
    }
}

impl FromStr for LoggerConfig {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_json(s)
    }
}

fn parse_main(settings: &Map<String, Value>) -> Result<MainConfig> {
    let use_fnc_rules = match lookup(settings, &[USE_FNC_RULES_KEY]) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(other) => return Err(type_error(MAIN_SECTION, "UseFncRules", "a boolean", other)),
    };
    let session_id = match lookup(settings, &[SESSION_ID_KEY]) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => return Err(type_error(MAIN_SECTION, "SessionId", "a string", other)),
    };
    Ok(MainConfig {
        rule: parse_rule(MAIN_SECTION, settings)?,
        use_fnc_rules,
        session_id,
    })
}

fn parse_rule(component: &str, settings: &Map<String, Value>) -> Result<BaseRule> {
    let severity = match lookup(settings, SEVERITY_KEYS) {
        None => None,
        Some(value) => parse_level(component, "Severity", value, Severity::from_ordinal)?,
    };
    let debug_level = match lookup(settings, DEBUG_LEVEL_KEYS) {
        None => None,
        Some(value) => parse_level(component, "DebugLevel", value, DebugLevel::from_ordinal)?,
    };
    Ok(BaseRule {
        severity,
        debug_level,
    })
}

fn parse_level<T>(
    component: &str,
    key: &str,
    value: &Value,
    from_ordinal: fn(u64) -> Option<T>,
) -> Result<Option<T>>
where
    T: FromStr<Err = String>,
{
    match value {
        Value::Null => Ok(None),
        Value::String(s) => s
            .parse::<T>()
            .map(Some)
            .map_err(|e| LoggerError::config(component, format!("{}: {}", key, e))),
        other => match as_ordinal(other) {
            Some(0) => Ok(None),
            Some(n) => from_ordinal(n).map(Some).ok_or_else(|| {
                LoggerError::config(component, format!("{} must be in 0..=5, got {}", key, n))
            }),
            None => Err(type_error(component, key, "a level number or name", other)),
        },
    }
}

fn lookup<'a>(settings: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    settings
        .iter()
        .find(|(k, _)| keys.iter().any(|key| k.eq_ignore_ascii_case(key)))
        .map(|(_, v)| v)
}

/// Integral JSON numbers, including `5.0` as produced by some encoders
fn as_ordinal(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| *f >= 0.0 && f.fract() == 0.0)
            .map(|f| f as u64)
    })
}

fn type_error(component: &str, key: &str, expected: &str, found: &Value) -> LoggerError {
    LoggerError::config(component, format!("{} must be {}, got {}", key, expected, found))
}
