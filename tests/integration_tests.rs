//! Integration tests for the logger system
//!
//! These tests verify:
//! - End-to-end rule evaluation through configuration
//! - Function-name rules with prefix fallback
//! - Main-section (global) rules and their inheritance
//! - Console and file writers bound through the registry
//! - Construction errors

use parking_lot::Mutex;
use rust_leveled_logger::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::io::{self, Write};
use std::sync::Arc;
use tempfile::TempDir;

/// One logging call and whether it must reach the writer
struct Case {
    severity: Severity,
    debug_level: Option<DebugLevel>,
    function: &'static str,
    message: &'static str,
    expected: bool,
}

fn case(severity: Severity, function: &'static str, message: &'static str, expected: bool) -> Case {
    Case {
        severity,
        debug_level: None,
        function,
        message,
        expected,
    }
}

fn debug_case(
    level: DebugLevel,
    function: &'static str,
    message: &'static str,
    expected: bool,
) -> Case {
    Case {
        severity: Severity::Debug,
        debug_level: Some(level),
        function,
        message,
        expected,
    }
}

fn emit(logger: &Logger, case: &Case) {
    match (case.severity, case.debug_level) {
        (Severity::Fatal, _) => logger.fatal(case.function, case.message),
        (Severity::Error, _) => logger.error(case.function, case.message),
        (Severity::Warn, _) => logger.warn(case.function, case.message),
        (Severity::Info, _) => logger.info(case.function, case.message),
        (Severity::Debug, None) => logger.debug(case.function, case.message),
        (Severity::Debug, Some(level)) => logger.debug_at(case.function, case.message, level),
    }
}

/// Build a logger whose "console" writer records into memory, run the
/// cases, destroy the logger and compare the delivered lines.
fn run_cases(config: Value, cases: &[Case]) {
    let sink = MemorySink::new();
    let registry = WriterRegistry::new();
    registry
        .register("console", MemoryWriter::factory(sink.clone()))
        .unwrap();

    let logger = Logger::builder()
        .buffer_size(10)
        .registry(&registry)
        .config(config.clone())
        .build()
        .expect("Failed to build logger");
    for case in cases {
        emit(&logger, case);
    }
    // destroy drains the channel before returning
    logger.destroy();

    let expected: Vec<String> = cases
        .iter()
        .filter(|c| c.expected)
        .map(|c| format!("{}[{}] ||| {}", c.function, c.severity, c.message))
        .collect();
    assert_eq!(sink.lines(), expected, "config: {}", config);
}

#[test]
fn test_warn_rejected_by_error_writer() {
    run_cases(
        json!({"console": {"Severity": "error"}}),
        &[case(Severity::Warn, "Test.warn", "not delivered", false)],
    );
}

#[test]
fn test_fnc_rule_prefix_match() {
    let config = json!({
        "main": {"UseFncRules": true},
        "console": {"Severity": 2, "FncRules": {"Foo.bar": {"Severity": 5, "DebugLevel": 2}}}
    });
    run_cases(
        config,
        &[
            debug_case(DebugLevel::Extended, "Foo.bar.baz", "prefix match", true),
            debug_case(DebugLevel::Extended, "Qux", "no rule", false),
            debug_case(DebugLevel::Verbose, "Foo.bar", "above rule level", false),
        ],
    );
}

#[test]
fn test_debug_without_config_is_dropped() {
    run_cases(
        json!({"console": {}}),
        &[debug_case(DebugLevel::Base, "Test.noconf", "debug without config", false)],
    );
}

#[test]
fn test_writer_debug_level_threshold() {
    run_cases(
        json!({"console": {"Severity": 5, "DebugLevel": 3}}),
        &[
            case(Severity::Debug, "Test.dlev", "base level", true),
            debug_case(DebugLevel::VeryVerbose, "Test.dlev", "debug level 4", false),
            debug_case(DebugLevel::Verbose, "Test.dlev", "debug level 3", true),
        ],
    );
}

#[test]
fn test_writer_debug_level_defaults_to_base() {
    run_cases(
        json!({"console": {"Severity": 5}}),
        &[
            debug_case(DebugLevel::Base, "Test.default", "debug level 1", true),
            debug_case(DebugLevel::Extended, "Test.default", "debug level 2", false),
        ],
    );
}

#[test]
fn test_fnc_rules_select_per_function() {
    let config = json!({
        "main": {"usefncrules": true},
        "console": {"sev": 5, "fncrules": {
            "Rules.writeme": {"sev": 5},
            "Rules.dontwriteme": {"sev": 2}
        }}
    });
    run_cases(
        config,
        &[
            case(Severity::Debug, "Rules.writeme", "rule 1", true),
            case(Severity::Debug, "Rules.dontwriteme", "rule 2", false),
        ],
    );
}

#[test]
fn test_main_severity_inherited_by_writer() {
    run_cases(
        json!({"main": {"Severity": 5}, "console": {}}),
        &[
            case(Severity::Debug, "Main.debug", "Debug with MAIN severity Debug", true),
            case(Severity::Error, "Main.debug", "Error with MAIN severity Debug", true),
        ],
    );
    run_cases(
        json!({"main": {"Severity": 2}, "console": {}}),
        &[case(Severity::Warn, "Main.error", "Warning with MAIN severity Error", false)],
    );
}

#[test]
fn test_fnc_rules_ignored_when_disabled() {
    run_cases(
        json!({"main": {"Severity": 2}, "console": {"FncRules": {"Main.fnc": {"Severity": 5}}}}),
        &[case(Severity::Warn, "Main.fnc", "FncRule present but disabled", false)],
    );
}

#[test]
fn test_fnc_rule_overrides_main_severity() {
    run_cases(
        json!({
            "main": {"Severity": 2, "UseFncRules": true},
            "console": {"FncRules": {"Main.fnc": {"Severity": 3}}}
        }),
        &[case(Severity::Warn, "Main.fnc", "FncRule used", true)],
    );
}

#[test]
fn test_named_levels_in_config() {
    run_cases(
        json!({"console": {"Severity": "debug", "DebugLevel": "very_verbose"}}),
        &[
            debug_case(DebugLevel::VeryVerbose, "Named.levels", "allowed", true),
            debug_case(DebugLevel::EvenMoreVerbose, "Named.levels", "too verbose", false),
            case(Severity::Fatal, "Named.levels", "always", true),
        ],
    );
}

#[test]
fn test_every_writer_sees_same_order() {
    let first = MemorySink::new();
    let second = MemorySink::new();
    let registry = WriterRegistry::new();
    registry.register("first", MemoryWriter::factory(first.clone())).unwrap();
    registry.register("second", MemoryWriter::factory(second.clone())).unwrap();

    let logger = Logger::builder()
        .buffer_size(4)
        .registry(&registry)
        .config(json!({"first": {"Severity": "info"}, "second": {"Severity": "warn"}}))
        .build()
        .unwrap();
    for i in 0..50 {
        logger.warn("Order.test", format!("warn {}", i));
        logger.info("Order.test", format!("info {}", i));
    }
    logger.destroy();

    assert_eq!(first.len(), 100);
    let warns: Vec<String> = first
        .messages()
        .into_iter()
        .filter(|m| m.severity() == Severity::Warn)
        .map(|m| m.message().to_string())
        .collect();
    let second_messages: Vec<String> = second
        .messages()
        .into_iter()
        .map(|m| m.message().to_string())
        .collect();
    assert_eq!(warns, second_messages);
}

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_console_writer_end_to_end() {
    let buffer = SharedBuffer::default();
    let registry = WriterRegistry::new();
    let output = buffer.clone();
    registry
        .register("console", move || {
            Box::new(ConsoleWriter::with_output(output.clone())) as Box<dyn LogWriter>
        })
        .unwrap();

    let logger = Logger::builder()
        .registry(&registry)
        .config_json(r#"{"console":{"flags":0, "sev":5, "dlev":3}}"#)
        .build()
        .unwrap();
    logger.debug("Console.e2e", "test console");
    logger.debug_at("Console.e2e", "debug level 4", DebugLevel::VeryVerbose);
    logger.debug_at("Console.e2e", "debug level 3", DebugLevel::Verbose);
    logger.destroy();

    let out = String::from_utf8(buffer.0.lock().clone()).unwrap();
    assert_eq!(
        out,
        "Console.e2e[D] ||| test console\nConsole.e2e[D] ||| debug level 3\n"
    );
}

#[test]
fn test_file_writer_through_global_registry() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("file.log");
    let config = json!({
        "file": {"flags": 0, "sev": 5, "dlev": 3, "filename": log_file.to_str().unwrap()}
    });

    let logger = Logger::builder().config(config).build().expect("Failed to build logger");
    logger.debug("File.e2e", "test file 1");
    logger.debug("File.e2e", "test file 2");
    logger.info("File.e2e", "info");
    logger.debug_at("File.e2e", "too verbose", DebugLevel::VeryVerbose);
    logger.destroy();

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines,
        vec![
            "File.e2e[D] ||| test file 1",
            "File.e2e[D] ||| test file 2",
            "File.e2e[I] ||| info",
        ]
    );
}

#[test]
fn test_file_writer_default_flags_prefix_timestamp() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("stamped.log");
    let config = format!(r#"{{"file":{{"filename":{:?}}}}}"#, log_file.to_str().unwrap());

    let logger = Logger::from_json(8, &config).unwrap();
    logger.error("File.stamp", "test file");
    logger.flush().unwrap();

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    let line = content.lines().next().expect("one line");
    // "YYYY/MM/DD HH:MM:SS ||| File.stamp[E] ||| test file"
    assert!(line.ends_with(" ||| File.stamp[E] ||| test file"), "line: {}", line);
    assert_eq!(line.find(" ||| "), Some("2024/01/02 03:04:05".len()));
    logger.destroy();
}

#[test]
fn test_file_writer_missing_filename_aborts_construction() {
    let err = Logger::from_json(8, r#"{"file":{"flags":0}}"#).err().unwrap();
    assert!(err.is_construction_error());
    assert!(err.to_string().contains("filename not configured"));
}

#[test]
fn test_construction_errors() {
    assert!(matches!(
        Logger::from_json(8, r#"{"nosuchwriter":{}}"#),
        Err(LoggerError::UnknownWriter(_))
    ));
    assert!(matches!(
        Logger::from_json(8, r#"{"main":{"Severity":2}}"#),
        Err(LoggerError::NoWriters)
    ));
    assert!(matches!(Logger::from_json(8, "{}"), Err(LoggerError::NoWriters)));
    assert!(matches!(
        Logger::from_json(8, "not json"),
        Err(LoggerError::JsonError(_))
    ));
    assert!(matches!(
        Logger::from_json(8, r#"{"console":{"Severity":7}}"#),
        Err(LoggerError::InvalidConfiguration { .. })
    ));
}

#[test]
fn test_global_registry_accepts_custom_writer_once() {
    let sink = MemorySink::new();
    let registry = WriterRegistry::global();
    registry
        .register("integration-memory", MemoryWriter::factory(sink.clone()))
        .unwrap();
    assert!(matches!(
        registry.register("integration-memory", MemoryWriter::factory(sink.clone())),
        Err(LoggerError::DuplicateWriter(_))
    ));

    let logger = Logger::from_json(8, r#"{"integration-memory":{"Severity":"fatal"}}"#).unwrap();
    logger.fatal("Global.registry", "delivered");
    logger.destroy();
    assert_eq!(sink.lines(), vec!["Global.registry[F] ||| delivered"]);
}
