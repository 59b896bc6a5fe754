//! Routing of rendered lines to the active sink

use super::{
    error::{Result, VlogError},
    format::{DefaultFormatter, Formatter},
    log_level::LogLevel,
    metrics::RouterMetrics,
    sink::Sink,
};
use crate::sinks::ConsoleSink;
use parking_lot::RwLock;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Callback for sink failures that leave the sink without a destination.
pub type FatalHandler = Arc<dyn Fn(&VlogError) + Send + Sync>;

/// Shared handle to the active sink and formatter.
///
/// Cloning is cheap; every clone routes to the same sink. Swapping the sink
/// takes effect for all cells at once.
///
/// # Example
///
/// ```
/// use rust_vlog::{MemorySink, Router};
/// use std::sync::Arc;
///
/// let sink = Arc::new(MemorySink::new());
/// let router = Router::with_sink(sink.clone());
/// router.log_line("hello");
/// assert_eq!(sink.lines(), vec!["hello".to_string()]);
/// ```
#[derive(Clone)]
pub struct Router {
    shared: Arc<RouterShared>,
}

struct RouterShared {
    sink: RwLock<Arc<dyn Sink>>,
    formatter: RwLock<Arc<dyn Formatter>>,
    on_fatal: RwLock<FatalHandler>,
    metrics: RouterMetrics,
}

impl Router {
    /// Router writing to stderr through a [`ConsoleSink`]
    #[must_use]
    pub fn new() -> Self {
        Self::with_sink(Arc::new(ConsoleSink::stderr()))
    }

    #[must_use]
    pub fn with_sink(sink: Arc<dyn Sink>) -> Self {
        Self {
            shared: Arc::new(RouterShared {
                sink: RwLock::new(sink),
                formatter: RwLock::new(Arc::new(DefaultFormatter::new())),
                on_fatal: RwLock::new(Arc::new(abort_on_fatal)),
                metrics: RouterMetrics::new(),
            }),
        }
    }

    /// Replace the active sink, returning the previous one after flushing it.
    pub fn set_sink(&self, sink: Arc<dyn Sink>) -> Arc<dyn Sink> {
        let previous = std::mem::replace(&mut *self.shared.sink.write(), sink);
        if let Err(e) = previous.flush() {
            eprintln!("[VLOG ERROR] Failed to flush replaced sink '{}': {}", previous.name(), e);
        }
        previous
    }

    pub fn sink(&self) -> Arc<dyn Sink> {
        Arc::clone(&self.shared.sink.read())
    }

    pub fn set_formatter(&self, formatter: Arc<dyn Formatter>) {
        *self.shared.formatter.write() = formatter;
    }

    /// Replace the handler invoked on fatal sink failures.
    ///
    /// The default handler reports the error on stderr and aborts the process.
    pub fn set_fatal_handler(&self, handler: FatalHandler) {
        *self.shared.on_fatal.write() = handler;
    }

    pub fn metrics(&self) -> &RouterMetrics {
        &self.shared.metrics
    }

    /// Render a message that already passed its cell's threshold and send it.
    pub fn emit(&self, level: LogLevel, location: &Location<'_>, args: fmt::Arguments<'_>) {
        let formatter = Arc::clone(&self.shared.formatter.read());
        let line = formatter.render(level, location, args);
        self.log_line(&line);
    }

    /// Send a line to the sink as is.
    pub fn log_line(&self, line: &str) {
        let sink = self.sink();
        match sink.log(line) {
            Ok(()) => {
                self.shared.metrics.record_emitted();
            }
            Err(e) => {
                self.shared.metrics.record_sink_failure();
                if e.is_fatal() {
                    let handler = Arc::clone(&self.shared.on_fatal.read());
                    handler(&e);
                } else {
                    eprintln!("[VLOG ERROR] Sink '{}' failed: {}", sink.name(), e);
                }
            }
        }
    }

    /// Report a problem of the vlog system itself through the active sink.
    pub fn diagnostic(&self, args: fmt::Arguments<'_>) {
        self.shared.metrics.record_diagnostic();
        self.log_line(&args.to_string());
    }

    pub fn flush(&self) -> Result<()> {
        self.sink().flush()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("sink", &self.sink().name())
            .field("metrics", &self.shared.metrics)
            .finish()
    }
}

fn abort_on_fatal(err: &VlogError) {
    eprintln!("[VLOG FATAL] {}. No destination left for log output, aborting.", err);
    std::process::abort();
}
