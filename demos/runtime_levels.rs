//! Runtime level control example
//!
//! Demonstrates loading levels from the environment, changing them while the
//! program runs and exporting the current state.
//!
//! Run with: RUST_VLOG='*=e,net/*=v1' cargo run --example runtime_levels

use rust_vlog::prelude::*;
use rust_vlog::{info, v1, v2};

fn main() -> Result<()> {
    println!("=== Rust VLog - Runtime Levels Example ===\n");

    let registry = LevelRegistry::new();
    let net = registry.register("net")?;
    let http = registry.register("net/http")?;
    let storage = registry.register("storage")?;

    let config = VlogConfig::from_env()?;
    config.apply(&registry)?;
    println!("1. Levels after applying the environment: {}", registry.export());

    v1!(http, "request from {}", "10.0.0.1");
    info!(storage, "storage ready");

    println!("\n2. Turning on v2 for http only:");
    registry.configure("*=i,net/*=v1,net/http=v2")?;
    v2!(http, "headers parsed");
    v2!(net, "net stays at v1 (hidden)");

    println!("\n3. Saving and restoring levels:");
    let saved = registry.export();
    registry.configure("*=e")?;
    println!("   quiet: {}", registry.export());
    registry.configure(&saved)?;
    println!("   restored: {}", registry.export());

    println!("\n4. Snapshot as JSON:");
    let snapshot = registry.snapshot();
    println!(
        "{}",
        serde_json::to_string_pretty(&snapshot).map_err(VlogError::from)?
    );

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
