//! File logging example
//!
//! Demonstrates routing every cell to a size-rotated log file.
//!
//! Run with: cargo run --example file_logging

use rust_vlog::prelude::*;
use rust_vlog::{err, info, v1};
use std::sync::Arc;

fn main() -> Result<()> {
    println!("=== Rust VLog - File Logging Example ===\n");

    let sink = Arc::new(RotatingFileSink::with_config(
        "logs/application",
        RotationConfig::new().with_max_bytes(4 * 1024),
    )?);
    let registry = LevelRegistry::with_router(Router::with_sink(sink.clone()));
    let server = registry.register("server")?;
    let worker = registry.register("server/worker")?;
    registry.configure("*=i,server/worker=v1")?;

    println!("1. Logging to {}", sink.current_path().display());
    info!(server, "Application started");
    v1!(server, "Loading configuration... (hidden)");
    info!(server, "Configuration loaded successfully");
    err!(server, "Failed to load optional plugin");

    println!("\n2. Writing enough to rotate the file:");
    for i in 1..=200 {
        v1!(worker, "Processing item {}/200", i);
    }
    println!("   Now at file number {}", sink.sequence());

    info!(server, "All operations completed");

    // Flush what is still buffered
    sink.shutdown()?;

    println!("\n=== Example completed successfully! ===");
    println!("Check the 'logs' directory for the full log output");

    Ok(())
}
