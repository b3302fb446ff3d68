//! Function-name rules example
//!
//! A console writer that only shows errors, except for the `Net.recv`
//! component which also shows debug output up to the extended level.
//!
//! Run with: cargo run --example function_rules

use rust_leveled_logger::prelude::*;
use rust_leveled_logger::{debug_at, error, info};
use serde_json::json;

fn main() -> Result<()> {
    println!("=== Rust Leveled Logger - Function Rules Example ===\n");

    let logger = Logger::builder()
        .buffer_size(32)
        .config(json!({
            "main": {"UseFncRules": true},
            "console": {
                "Severity": "error",
                "flags": 0,
                "FncRules": {
                    "Net": {"Severity": "error"},
                    "Net.recv": {"Severity": "debug", "DebugLevel": "extended"}
                }
            }
        }))
        .build()?;

    for (i, size) in [12usize, 512, 64].iter().enumerate() {
        // matches "Net.recv" through prefix fallback
        debug_at!(logger, "Net.recv.packet", DebugLevel::Extended, "packet {} has {} bytes", i, size);
    }
    info!(logger, "Net.send", "hidden: Net only admits errors");
    error!(logger, "Net.send", "connection reset");
    error!(logger, "Storage.flush", "hidden: no rule matches Storage");

    logger.flush()?;
    println!("\nDelivered {} messages", logger.metrics().delivered());
    logger.destroy();

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
