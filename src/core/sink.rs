//! Sink trait for log output destinations

use super::error::Result;

/// Destination for fully rendered log lines.
///
/// Implementations are shared between threads behind an `Arc`, so both
/// operations take `&self`. A line handed to `log` must reach the output as
/// one complete record, never interleaved with another caller's line.
pub trait Sink: Send + Sync {
    fn log(&self, line: &str) -> Result<()>;
    fn flush(&self) -> Result<()>;
    fn name(&self) -> &str;
}
