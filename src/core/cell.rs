//! Level cells and the handles application code logs through

use super::{log_level::LogLevel, router::Router};
use std::backtrace::Backtrace;
use std::fmt;
use std::panic::Location;
use std::sync::atomic::{AtomicI8, Ordering};
use std::sync::Arc;

/// A named severity threshold.
///
/// The level is a single atomic word so a configuration pass can rewrite it
/// while other threads are checking it.
#[derive(Debug)]
pub struct LevelCell {
    name: String,
    source: String,
    level: AtomicI8,
}

impl LevelCell {
    pub(crate) fn new(name: String, source: String, level: LogLevel) -> Self {
        Self {
            name,
            source,
            level: AtomicI8::new(level.as_i8()),
        }
    }

    /// Slash separated name, `""` for the root cell
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where the cell was registered, as `file:line`
    pub fn source(&self) -> &str {
        &self.source
    }

    #[inline]
    pub fn level(&self) -> LogLevel {
        LogLevel::from_i8(self.level.load(Ordering::Relaxed)).unwrap_or_default()
    }

    /// Store `level`, returning the previous one
    #[inline]
    pub(crate) fn store(&self, level: LogLevel) -> LogLevel {
        let previous = self.level.swap(level.as_i8(), Ordering::Relaxed);
        LogLevel::from_i8(previous).unwrap_or_default()
    }
}

impl fmt::Display for LevelCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.source)
    }
}

/// Error built by [`CellHandle::error`], carrying as much context as the
/// cell's level asked for when it was built.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct TracedError {
    message: String,
}

impl TracedError {
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Handle to a registered cell.
///
/// Handles are cheap to clone, and every handle for a name refers to the same
/// cell, so a level change through one is seen by all of them.
///
/// # Example
///
/// ```
/// use rust_vlog::{LevelRegistry, LogLevel, MemorySink, Router};
/// use std::sync::Arc;
///
/// let sink = Arc::new(MemorySink::new());
/// let registry = LevelRegistry::with_router(Router::with_sink(sink.clone()));
/// let net = registry.register("net").unwrap();
///
/// net.info(format_args!("listening on {}", 8080));
/// net.v1(format_args!("suppressed at the default level"));
/// assert_eq!(sink.len(), 1);
///
/// net.vset(1);
/// assert!(net.on(1));
/// assert!(!net.on(2));
/// ```
#[derive(Clone)]
pub struct CellHandle {
    cell: Arc<LevelCell>,
    router: Router,
}

impl CellHandle {
    pub(crate) fn new(cell: Arc<LevelCell>, router: Router) -> Self {
        Self { cell, router }
    }

    pub fn name(&self) -> &str {
        self.cell.name()
    }

    pub fn source(&self) -> &str {
        self.cell.source()
    }

    #[inline]
    pub fn level(&self) -> LogLevel {
        self.cell.level()
    }

    /// Set the threshold directly, returning the previous one.
    pub fn set_level(&self, level: LogLevel) -> LogLevel {
        self.cell.store(level)
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// True when both handles refer to the same cell.
    pub fn same_cell(&self, other: &CellHandle) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }

    /// True when a message at `level` passes this cell's threshold.
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.level() <= level
    }

    /// Render and send a message when `level` passes the threshold.
    #[inline]
    #[track_caller]
    pub fn emit(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        if self.enabled(level) {
            self.router.emit(level, Location::caller(), args);
        }
    }

    #[inline]
    #[track_caller]
    pub fn err(&self, args: fmt::Arguments<'_>) {
        self.emit(LogLevel::Error, args);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.emit(LogLevel::Info, args);
    }

    #[inline]
    #[track_caller]
    pub fn v1(&self, args: fmt::Arguments<'_>) {
        self.emit(LogLevel::V1, args);
    }

    #[inline]
    #[track_caller]
    pub fn v2(&self, args: fmt::Arguments<'_>) {
        self.emit(LogLevel::V2, args);
    }

    /// True when verbose level `n` is enabled.
    pub fn on(&self, n: i32) -> bool {
        i64::from(self.level().as_i8()) <= -i64::from(n)
    }

    /// Set the threshold to verbose level `n` (1 or 2), returning the previous
    /// level. Any other `n` is reported and leaves the threshold unchanged.
    pub fn vset(&self, n: i32) -> LogLevel {
        match LogLevel::from_verbosity(n) {
            Some(level) if level.is_verbose() => self.cell.store(level),
            _ => {
                self.router
                    .diagnostic(format_args!("invalid verbose level={} for {}", n, self.cell));
                self.level()
            }
        }
    }

    /// Build an error from `args`.
    ///
    /// At `V2` the message is followed by the captured call stack, at `V1` it
    /// is prefixed with the caller's `file:line`, otherwise it is the message
    /// alone.
    #[track_caller]
    pub fn error(&self, args: fmt::Arguments<'_>) -> TracedError {
        let message = match self.level() {
            LogLevel::V2 => format!("{}\n{}", args, Backtrace::force_capture()),
            LogLevel::V1 => {
                let location = Location::caller();
                format!("{}:{} {}", location.file(), location.line(), args)
            }
            _ => args.to_string(),
        };
        TracedError { message }
    }

    /// Log the message followed by the current call stack when verbose
    /// logging is enabled for this cell.
    #[track_caller]
    pub fn vstack(&self, args: fmt::Arguments<'_>) {
        if !self.level().is_verbose() {
            return;
        }
        let backtrace = Backtrace::force_capture();
        self.router.emit(
            LogLevel::V1,
            Location::caller(),
            format_args!("{}\n{}", args, backtrace),
        );
    }
}

impl fmt::Debug for CellHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellHandle")
            .field("name", &self.cell.name())
            .field("level", &self.level())
            .finish()
    }
}
