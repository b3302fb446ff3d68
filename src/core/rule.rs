//! Write rules: severity/debug-level thresholds and their inheritance
//!
//! Rules form a three-level hierarchy: the logger's global rule, one rule
//! per writer, and optional per-function rules inside each writer. Unset
//! fields inherit from the level above through [`BaseRule::get`].

use super::log_message::LogMessage;
use super::severity::{DebugLevel, Severity};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Severity and debug-level threshold; `None` fields inherit from a parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BaseRule {
    pub severity: Option<Severity>,
    pub debug_level: Option<DebugLevel>,
}

impl BaseRule {
    /// Global fallback when the configuration leaves a field unset
    pub const DEFAULT_GLOBAL: BaseRule = BaseRule {
        severity: Some(Severity::Error),
        debug_level: Some(DebugLevel::Base),
    };

    pub const fn new(severity: Severity, debug_level: DebugLevel) -> Self {
        Self {
            severity: Some(severity),
            debug_level: Some(debug_level),
        }
    }

    pub const fn unset() -> Self {
        Self {
            severity: None,
            debug_level: None,
        }
    }

    pub const fn with_severity(severity: Severity) -> Self {
        Self {
            severity: Some(severity),
            debug_level: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.severity.is_some() && self.debug_level.is_some()
    }

    /// Fill every unset field from `parent`; set fields are kept.
    #[must_use]
    pub fn get(&self, parent: &BaseRule) -> BaseRule {
        BaseRule {
            severity: self.severity.or(parent.severity),
            debug_level: self.debug_level.or(parent.debug_level),
        }
    }

    /// Whether an already resolved rule admits `msg`.
    ///
    /// Non-debug messages pass when at least as severe as the threshold.
    /// Debug messages pass only when the threshold itself is `Debug` and the
    /// message's debug level does not exceed the rule's. An unset field
    /// never admits anything it would have gated.
    pub fn eval(&self, msg: &LogMessage) -> bool {
        let Some(threshold) = self.severity else {
            return false;
        };
        match msg.severity() {
            Severity::Debug => {
                let level = msg.debug_level().unwrap_or_default();
                threshold == Severity::Debug && self.debug_level.is_some_and(|max| level <= max)
            }
            sev => sev <= threshold,
        }
    }
}

/// A writer's rule plus its per-function overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteRules {
    pub base: BaseRule,
    pub fnc_rules: HashMap<String, BaseRule>,
}

impl WriteRules {
    pub fn new(base: BaseRule) -> Self {
        Self {
            base,
            fnc_rules: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_fnc_rule(mut self, function: impl Into<String>, rule: BaseRule) -> Self {
        self.fnc_rules.insert(function.into(), rule);
        self
    }

    /// Longest prefix of `function` with a configured rule.
    ///
    /// The tag is shortened one character at a time, so `"A.Bx"` reaches a
    /// rule keyed `"A.B"` just as `"A.B.C"` does.
    pub fn lookup_fnc_rule(&self, function: &str) -> Option<&BaseRule> {
        let mut tag = function;
        while !tag.is_empty() {
            if let Some(rule) = self.fnc_rules.get(tag) {
                return Some(rule);
            }
            let cut = tag.char_indices().next_back().map_or(0, |(idx, _)| idx);
            tag = &tag[..cut];
        }
        None
    }
}

/// Rule state of one logger, frozen once the logger is built.
///
/// Shared between the producer side, the dispatch thread and every writer
/// (writers consult it through their `WriterContext`).
#[derive(Debug, Clone)]
pub struct RuleBook {
    global: BaseRule,
    use_fnc_rules: bool,
    writers: HashMap<String, WriteRules>,
}

impl RuleBook {
    /// Unset global fields fall back to [`BaseRule::DEFAULT_GLOBAL`].
    pub fn new(global: BaseRule, use_fnc_rules: bool) -> Self {
        Self {
            global: global.get(&BaseRule::DEFAULT_GLOBAL),
            use_fnc_rules,
            writers: HashMap::new(),
        }
    }

    pub fn insert_writer(&mut self, name: impl Into<String>, rules: WriteRules) {
        self.writers.insert(name.into(), rules);
    }

    pub fn global(&self) -> &BaseRule {
        &self.global
    }

    pub fn use_fnc_rules(&self) -> bool {
        self.use_fnc_rules
    }

    pub fn write_rules(&self, writer: &str) -> Option<&WriteRules> {
        self.writers.get(writer)
    }

    /// Writer rule resolved against the global rule
    pub fn writer_rule(&self, writer: &str) -> Option<BaseRule> {
        self.writers.get(writer).map(|rules| rules.base.get(&self.global))
    }

    /// Per-writer, per-message admission decision.
    ///
    /// With function rules disabled, or none configured for the writer, the
    /// writer rule decides. Otherwise the longest matching function-name
    /// prefix decides, and a message with no matching prefix is rejected.
    pub fn must_write(&self, writer: &str, msg: &LogMessage) -> bool {
        let Some(rules) = self.writers.get(writer) else {
            return false;
        };
        let writer_rule = rules.base.get(&self.global);

        if !self.use_fnc_rules || rules.fnc_rules.is_empty() {
            let accepted = writer_rule.eval(msg);
            crate::internal_trace!(
                "must_write writer={} fnc={} rule={:?} -> {}",
                writer,
                msg.function(),
                writer_rule,
                accepted
            );
            return accepted;
        }

        match rules.lookup_fnc_rule(msg.function()) {
            Some(rule) => {
                let effective = rule.get(&writer_rule);
                let accepted = effective.eval(msg);
                crate::internal_trace!(
                    "must_write writer={} fnc={} fnc-rule={:?} -> {}",
                    writer,
                    msg.function(),
                    effective,
                    accepted
                );
                accepted
            }
            None => {
                crate::internal_trace!(
                    "must_write writer={} fnc={} no matching function rule",
                    writer,
                    msg.function()
                );
                false
            }
        }
    }

    /// Least urgent severity any writer rule admits.
    pub fn max_severity(&self) -> Option<Severity> {
        self.writers
            .values()
            .filter_map(|rules| rules.base.get(&self.global).severity)
            .max()
    }

    /// Highest debug level any rule that can be consulted admits.
    ///
    /// Function rules count only while they are enabled, so the producer
    /// pre-filter never drops what one of them would accept.
    pub fn max_debug_level(&self) -> Option<DebugLevel> {
        let global = self.global;
        let use_fnc_rules = self.use_fnc_rules;
        self.writers
            .values()
            .flat_map(move |rules| {
                let writer_rule = rules.base.get(&global);
                let fnc_levels = rules
                    .fnc_rules
                    .values()
                    .filter(move |_| use_fnc_rules)
                    .map(move |rule| rule.get(&writer_rule).debug_level);
                std::iter::once(writer_rule.debug_level).chain(fnc_levels)
            })
            .flatten()
            .max()
    }

    pub fn writer_names(&self) -> impl Iterator<Item = &str> {
        self.writers.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deb(level: DebugLevel) -> LogMessage {
        LogMessage::debug("Test.fnc", "debug", level)
    }

    #[test]
    fn test_get_fills_unset_fields_only() {
        let parent = BaseRule::new(Severity::Warn, DebugLevel::Verbose);
        let child = BaseRule::with_severity(Severity::Debug);
        assert_eq!(
            child.get(&parent),
            BaseRule::new(Severity::Debug, DebugLevel::Verbose)
        );
        assert_eq!(BaseRule::unset().get(&parent), parent);
    }

    #[test]
    fn test_get_keeps_complete_rule() {
        let rule = BaseRule::new(Severity::Info, DebugLevel::Extended);
        let parent = BaseRule::new(Severity::Fatal, DebugLevel::EvenMoreVerbose);
        assert_eq!(rule.get(&parent), rule);
        assert_eq!(rule.get(&BaseRule::unset()), rule);
    }

    #[test]
    fn test_eval_non_debug_by_severity() {
        let rule = BaseRule::new(Severity::Warn, DebugLevel::Base);
        assert!(rule.eval(&LogMessage::new("f", "m", Severity::Fatal)));
        assert!(rule.eval(&LogMessage::new("f", "m", Severity::Error)));
        assert!(rule.eval(&LogMessage::new("f", "m", Severity::Warn)));
        assert!(!rule.eval(&LogMessage::new("f", "m", Severity::Info)));
    }

    #[test]
    fn test_eval_debug_by_level() {
        let rule = BaseRule::new(Severity::Debug, DebugLevel::Verbose);
        assert!(rule.eval(&deb(DebugLevel::Base)));
        assert!(rule.eval(&deb(DebugLevel::Verbose)));
        assert!(!rule.eval(&deb(DebugLevel::VeryVerbose)));
    }

    #[test]
    fn test_eval_error_rule_never_admits_debug() {
        let rule = BaseRule::new(Severity::Error, DebugLevel::EvenMoreVerbose);
        for level in DebugLevel::ALL {
            assert!(!rule.eval(&deb(level)));
        }
    }

    #[test]
    fn test_eval_unset_rule_rejects() {
        assert!(!BaseRule::unset().eval(&LogMessage::new("f", "m", Severity::Fatal)));
        assert!(!BaseRule::with_severity(Severity::Debug).eval(&deb(DebugLevel::Base)));
    }

    #[test]
    fn test_lookup_truncates_character_by_character() {
        let rules = WriteRules::default()
            .with_fnc_rule("A.B", BaseRule::with_severity(Severity::Debug));
        assert!(rules.lookup_fnc_rule("A.B").is_some());
        assert!(rules.lookup_fnc_rule("A.B.C").is_some());
        assert!(rules.lookup_fnc_rule("A.Bogus").is_some());
        assert!(rules.lookup_fnc_rule("A.").is_none());
        assert!(rules.lookup_fnc_rule("Z").is_none());
        assert!(rules.lookup_fnc_rule("").is_none());
    }

    #[test]
    fn test_lookup_prefers_longest_prefix() {
        let rules = WriteRules::default()
            .with_fnc_rule("A", BaseRule::with_severity(Severity::Fatal))
            .with_fnc_rule("A.B", BaseRule::with_severity(Severity::Info));
        assert_eq!(
            rules.lookup_fnc_rule("A.B.C").and_then(|r| r.severity),
            Some(Severity::Info)
        );
        assert_eq!(
            rules.lookup_fnc_rule("A.X").and_then(|r| r.severity),
            Some(Severity::Fatal)
        );
    }

    #[test]
    fn test_lookup_handles_multibyte_tags() {
        let rules = WriteRules::default().with_fnc_rule("modulé", BaseRule::unset());
        assert!(rules.lookup_fnc_rule("modulé.ß").is_some());
        assert!(rules.lookup_fnc_rule("ü").is_none());
    }

    #[test]
    fn test_must_write_writer_rule_inherits_global() {
        let mut book = RuleBook::new(BaseRule::new(Severity::Debug, DebugLevel::Extended), false);
        book.insert_writer("console", WriteRules::default());
        assert!(book.must_write("console", &deb(DebugLevel::Extended)));
        assert!(!book.must_write("console", &deb(DebugLevel::Verbose)));
    }

    #[test]
    fn test_must_write_ignores_fnc_rules_when_disabled() {
        let mut book = RuleBook::new(BaseRule::with_severity(Severity::Error), false);
        book.insert_writer(
            "console",
            WriteRules::default().with_fnc_rule("Foo", BaseRule::with_severity(Severity::Debug)),
        );
        assert!(!book.must_write("console", &LogMessage::new("Foo", "m", Severity::Warn)));
        assert!(book.must_write("console", &LogMessage::new("Bar", "m", Severity::Error)));
    }

    #[test]
    fn test_must_write_fnc_rule_two_level_inheritance() {
        let mut book = RuleBook::new(BaseRule::new(Severity::Error, DebugLevel::Verbose), true);
        book.insert_writer(
            "console",
            WriteRules::new(BaseRule::with_severity(Severity::Error))
                .with_fnc_rule("Foo.bar", BaseRule::with_severity(Severity::Debug)),
        );
        // debug level comes from the global rule through the writer rule
        assert!(book.must_write("console", &deb_tagged("Foo.bar.baz", DebugLevel::Verbose)));
        assert!(!book.must_write("console", &deb_tagged("Foo.bar.baz", DebugLevel::VeryVerbose)));
        assert!(!book.must_write("console", &deb_tagged("Qux", DebugLevel::Base)));
        // no matching prefix rejects even errors
        assert!(!book.must_write("console", &LogMessage::new("Qux", "m", Severity::Fatal)));
    }

    #[test]
    fn test_must_write_unknown_writer() {
        let book = RuleBook::new(BaseRule::unset(), false);
        assert!(!book.must_write("nope", &LogMessage::new("f", "m", Severity::Fatal)));
    }

    #[test]
    fn test_caches() {
        let mut book = RuleBook::new(BaseRule::unset(), true);
        book.insert_writer("a", WriteRules::new(BaseRule::with_severity(Severity::Warn)));
        book.insert_writer(
            "b",
            WriteRules::default().with_fnc_rule(
                "X",
                BaseRule::new(Severity::Debug, DebugLevel::VeryVerbose),
            ),
        );
        assert_eq!(book.max_severity(), Some(Severity::Warn));
        assert_eq!(book.max_debug_level(), Some(DebugLevel::VeryVerbose));

        let mut disabled = book.clone();
        disabled.use_fnc_rules = false;
        assert_eq!(disabled.max_debug_level(), Some(DebugLevel::Base));
    }

    fn deb_tagged(function: &str, level: DebugLevel) -> LogMessage {
        LogMessage::debug(function, "debug", level)
    }
}
