//! Console sink implementation

use crate::core::format::record_header;
use crate::core::{Result, Sink, VlogError};
use chrono::Local;
use colored::Colorize;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleTarget {
    Stdout,
    Stderr,
}

/// Writes each line to stdout or stderr behind a timestamp header.
///
/// The stream is locked for the duration of one record, so lines from
/// concurrent callers never interleave.
pub struct ConsoleSink {
    target: ConsoleTarget,
    use_colors: bool,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::stderr()
    }

    pub fn stderr() -> Self {
        Self {
            target: ConsoleTarget::Stderr,
            use_colors: true,
        }
    }

    pub fn stdout() -> Self {
        Self {
            target: ConsoleTarget::Stdout,
            use_colors: true,
        }
    }

    /// Enable or disable dimming of the timestamp header
    ///
    /// # Example
    ///
    /// ```
    /// use rust_vlog::ConsoleSink;
    ///
    /// let sink = ConsoleSink::stdout().with_colors(false);
    /// ```
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    pub fn target(&self) -> ConsoleTarget {
        self.target
    }

    fn format_record(&self, line: &str) -> String {
        let header = record_header(&Local::now());
        if self.use_colors {
            format!("{} {}\n", header.dimmed(), line)
        } else {
            format!("{} {}\n", header, line)
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn log(&self, line: &str) -> Result<()> {
        let record = self.format_record(line);
        let written = match self.target {
            ConsoleTarget::Stdout => io::stdout().lock().write_all(record.as_bytes()),
            ConsoleTarget::Stderr => io::stderr().lock().write_all(record.as_bytes()),
        };
        written.map_err(|e| VlogError::io_operation("writing to console", "write failed", e))
    }

    fn flush(&self) -> Result<()> {
        let flushed = match self.target {
            ConsoleTarget::Stdout => io::stdout().flush(),
            ConsoleTarget::Stderr => io::stderr().flush(),
        };
        flushed.map_err(|e| VlogError::io_operation("flushing console", "flush failed", e))
    }

    fn name(&self) -> &str {
        "console"
    }
}
