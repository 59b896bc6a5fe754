//! # Rust VLog
//!
//! Leveled logging with per-component thresholds that can be changed while
//! the program runs.
//!
//! ## Features
//!
//! - **Hierarchical Levels**: Slash separated cell names configured with
//!   rules such as `*=e,net/*=v1,net/http=v2`
//! - **Cheap Checks**: A disabled message costs one atomic load
//! - **Pluggable Sinks**: Console, in-memory and size-rotated files
//! - **Runtime Control**: Export the current levels and apply new ones at any
//!   time
//!
//! ## Example
//!
//! ```
//! use rust_vlog::prelude::*;
//! use rust_vlog::{info, v1};
//! use std::sync::Arc;
//!
//! let sink = Arc::new(MemorySink::new());
//! let registry = LevelRegistry::with_router(Router::with_sink(sink.clone()));
//! let http = registry.register("net/http").unwrap();
//!
//! info!(http, "serving");
//! v1!(http, "hidden");
//!
//! registry.configure("net/*=v1").unwrap();
//! v1!(http, "shown");
//! assert_eq!(sink.len(), 2);
//! ```

pub mod config;
pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::config::VlogConfig;
    pub use crate::core::{
        CellHandle, CellSnapshot, DefaultFormatter, Formatter, Joined, LevelRegistry, LogLevel,
        Result, Router, RuleSet, Sink, TracedError, Value, VlogError,
    };
    pub use crate::sinks::{ConsoleSink, MemorySink, RotatingFileSink, RotationConfig};
}

pub use config::VlogConfig;
pub use core::{
    CellHandle, CellSnapshot, DefaultFormatter, FatalHandler, Formatter, Joined, LevelCell,
    LevelRegistry, LogLevel, Result, Router, RouterMetrics, RuleSet, Sink, TracedError, Value,
    VlogError,
};
pub use sinks::{ConsoleSink, ConsoleTarget, MemorySink, RotatingFileSink, RotationConfig};
