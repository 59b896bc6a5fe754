//! Basic usage example
//!
//! Demonstrates registering cells, logging at each level and the verbose
//! checks, with output on the console.
//!
//! Run with: cargo run --example basic_usage

use rust_vlog::prelude::*;
use rust_vlog::{err, info, v1, v2};

fn main() -> Result<()> {
    println!("=== Rust VLog - Basic Usage Example ===\n");

    // Lines go to stderr by default
    let registry = LevelRegistry::new();
    let app = registry.register("app")?;
    let db = registry.register("app/db")?;

    println!("1. Logging at different levels (default threshold is info):");
    v2!(app, "This is a v2 message (hidden)");
    v1!(app, "This is a v1 message (hidden)");
    info!(app, "This is an info message");
    err!(app, "This is an error message");

    println!("\n2. Raising verbosity for one cell:");
    db.vset(2);
    v2!(db, "query plan for {}", "SELECT 1");
    v1!(app, "app is still at info (hidden)");

    println!("\n3. Guarding expensive work with a verbose check:");
    if db.on(1) {
        let stats: Vec<u32> = (1..=5).map(|i| i * i).collect();
        v1!(db, "pool stats {:?}", stats);
    }

    println!("\n4. Building errors that carry context:");
    db.vset(1);
    let error = db.error(format_args!("connection refused"));
    info!(app, "got error: {}", error);

    println!("\n5. Special values:");
    info!(
        app,
        "key={} digest={}",
        Value::bytes(b"session-1"),
        Value::bytes(&[0xca, 0xfe, 0x00])
    );

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
