//! Router metrics
//!
//! Counters for lines that made it to a sink and lines a sink refused.
//! Suppressed messages are never counted: a message below a cell's
//! threshold must cost nothing beyond the threshold check.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for router observability
///
/// # Example
///
/// ```
/// use rust_vlog::RouterMetrics;
///
/// let metrics = RouterMetrics::new();
/// metrics.record_emitted();
/// metrics.record_sink_failure();
///
/// assert_eq!(metrics.lines_emitted(), 1);
/// assert_eq!(metrics.sink_failures(), 1);
/// ```
#[derive(Debug)]
pub struct RouterMetrics {
    /// Lines accepted by the active sink
    lines_emitted: AtomicU64,

    /// Lines the active sink failed to accept
    sink_failures: AtomicU64,

    /// Diagnostic lines produced by the vlog system itself
    diagnostics: AtomicU64,
}

impl RouterMetrics {
    pub const fn new() -> Self {
        Self {
            lines_emitted: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
            diagnostics: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn lines_emitted(&self) -> u64 {
        self.lines_emitted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn diagnostics(&self) -> u64 {
        self.diagnostics.load(Ordering::Relaxed)
    }

    /// Record a line accepted by the sink, returning the previous count
    #[inline]
    pub fn record_emitted(&self) -> u64 {
        self.lines_emitted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_failure(&self) -> u64 {
        self.sink_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_diagnostic(&self) -> u64 {
        self.diagnostics.fetch_add(1, Ordering::Relaxed)
    }

    /// Failure rate as a percentage (0.0 - 100.0)
    pub fn failure_rate(&self) -> f64 {
        let failed = self.sink_failures() as f64;
        let total = self.lines_emitted() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    pub fn reset(&self) {
        self.lines_emitted.store(0, Ordering::Relaxed);
        self.sink_failures.store(0, Ordering::Relaxed);
        self.diagnostics.store(0, Ordering::Relaxed);
    }
}

impl Default for RouterMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for RouterMetrics {
    /// Snapshot of the current values
    fn clone(&self) -> Self {
        Self {
            lines_emitted: AtomicU64::new(self.lines_emitted()),
            sink_failures: AtomicU64::new(self.sink_failures()),
            diagnostics: AtomicU64::new(self.diagnostics()),
        }
    }
}
