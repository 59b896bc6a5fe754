//! Core types: levels, cells, the registry, rules and routing

pub mod cell;
pub mod error;
pub mod format;
pub mod log_level;
pub mod metrics;
pub mod registry;
pub mod router;
pub mod rules;
pub mod sink;

pub use cell::{CellHandle, LevelCell, TracedError};
pub use error::{Result, VlogError};
pub use format::{DefaultFormatter, Formatter, Joined, Value};
pub use log_level::LogLevel;
pub use metrics::RouterMetrics;
pub use registry::{CellSnapshot, LevelRegistry};
pub use router::{FatalHandler, Router};
pub use rules::RuleSet;
pub use sink::Sink;
