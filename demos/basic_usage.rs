//! Basic logger usage example
//!
//! Demonstrates a console writer configured from JSON and the per-severity
//! logging calls.
//!
//! Run with: cargo run --example basic_usage

use rust_leveled_logger::prelude::*;

fn main() -> Result<()> {
    println!("=== Rust Leveled Logger - Basic Usage Example ===\n");

    // Console writer admitting everything down to verbose debug output
    let config = r#"{"console":{"Severity":"debug","DebugLevel":"verbose","flags":3}}"#;
    let logger = Logger::from_json(64, config)?;
    println!("Session: {}\n", logger.session_id());

    logger.fatal("Demo.main", "This is a fatal message");
    logger.error("Demo.main", "This is an error message");
    logger.warn("Demo.main", "This is a warning message");
    logger.info("Demo.main", "This is an info message");
    logger.debug("Demo.main", "This is a base debug message");
    logger.debug_at("Demo.main", "This is a verbose debug message", DebugLevel::Verbose);
    logger.debug_at("Demo.main", "Hidden: above the configured debug level", DebugLevel::VeryVerbose);

    // destroy waits until every accepted message reached the console
    logger.destroy();

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
