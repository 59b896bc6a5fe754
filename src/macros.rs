//! Logging macros for ergonomic message formatting.
//!
//! The message is built with `format_args!`, so nothing is rendered unless
//! the cell's threshold lets the message through.
//!
//! # Examples
//!
//! ```
//! use rust_vlog::prelude::*;
//! use rust_vlog::{info, v1};
//!
//! let registry = LevelRegistry::new();
//! let server = registry.register("server").unwrap();
//!
//! let port = 8080;
//! info!(server, "listening on port {}", port);
//! v1!(server, "accepted connection from {}", "10.0.0.7");
//! ```

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use rust_vlog::prelude::*;
/// # let registry = LevelRegistry::new();
/// # let cell = registry.register("doc").unwrap();
/// use rust_vlog::vlog;
/// vlog!(cell, LogLevel::Info, "Simple message");
/// vlog!(cell, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! vlog {
    ($cell:expr, $level:expr, $($arg:tt)+) => {
        $cell.emit($level, format_args!($($arg)+))
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! err {
    ($cell:expr, $($arg:tt)+) => {
        $crate::vlog!($cell, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($cell:expr, $($arg:tt)+) => {
        $crate::vlog!($cell, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a verbose level 1 message.
#[macro_export]
macro_rules! v1 {
    ($cell:expr, $($arg:tt)+) => {
        $crate::vlog!($cell, $crate::LogLevel::V1, $($arg)+)
    };
}

/// Log a verbose level 2 message.
#[macro_export]
macro_rules! v2 {
    ($cell:expr, $($arg:tt)+) => {
        $crate::vlog!($cell, $crate::LogLevel::V2, $($arg)+)
    };
}

/// Build a [`TracedError`](crate::TracedError) from a format string.
///
/// # Examples
///
/// ```
/// # use rust_vlog::prelude::*;
/// # let registry = LevelRegistry::new();
/// # let cell = registry.register("doc").unwrap();
/// use rust_vlog::traced_error;
/// let err = traced_error!(cell, "open {} failed", "db.sqlite");
/// assert_eq!(err.to_string(), "open db.sqlite failed");
/// ```
#[macro_export]
macro_rules! traced_error {
    ($cell:expr, $($arg:tt)+) => {
        $cell.error(format_args!($($arg)+))
    };
}

/// Register a cell named after the calling module, `a::b` becoming `a/b`.
///
/// # Examples
///
/// ```
/// # use rust_vlog::prelude::*;
/// use rust_vlog::register_module;
/// let registry = LevelRegistry::new();
/// let cell = register_module!(registry).unwrap();
/// assert_eq!(cell.name(), module_path!().replace("::", "/"));
/// ```
#[macro_export]
macro_rules! register_module {
    ($registry:expr) => {
        $registry.register(&module_path!().replace("::", "/"))
    };
}
