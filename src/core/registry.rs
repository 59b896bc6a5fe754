//! Registry of level cells
//!
//! The registry owns every [`LevelCell`], compiles rule strings into a
//! [`RuleSet`] and writes the resolved level into each cell. It is an explicit
//! object: the application creates one at startup and hands it (or handles
//! obtained from it) to the code that logs.

use super::{
    cell::{CellHandle, LevelCell},
    error::{Result, VlogError},
    log_level::LogLevel,
    router::Router,
    rules::RuleSet,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{self, Write as _};
use std::panic::Location;
use std::sync::Arc;

/// Index of the root cell in registration order
const ROOT: usize = 0;

/// Point-in-time view of one cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub name: String,
    pub level: LogLevel,
    pub source: String,
}

/// Owner of all level cells.
///
/// # Example
///
/// ```
/// use rust_vlog::{LevelRegistry, LogLevel};
///
/// let registry = LevelRegistry::new();
/// let db = registry.register("db").unwrap();
/// let pool = registry.register("db/pool").unwrap();
///
/// registry.configure("*=e,db/*=i,db/pool=v2").unwrap();
/// assert_eq!(db.level(), LogLevel::Info);
/// assert_eq!(pool.level(), LogLevel::V2);
/// assert_eq!(registry.export(), "*=err,db=info,db/pool=v2");
/// ```
pub struct LevelRegistry {
    router: Router,
    state: Mutex<RegistryState>,
}

struct RegistryState {
    /// Registration order, root first
    cells: Vec<Arc<LevelCell>>,
    index: HashMap<String, usize>,
    /// Rules of the last non-empty configuration
    rules: RuleSet,
}

impl LevelRegistry {
    /// Registry routing to stderr
    #[must_use]
    pub fn new() -> Self {
        Self::with_router(Router::new())
    }

    #[must_use]
    pub fn with_router(router: Router) -> Self {
        let root = Arc::new(LevelCell::new(String::new(), String::new(), LogLevel::Info));
        let mut index = HashMap::new();
        index.insert(String::new(), ROOT);
        Self {
            router,
            state: Mutex::new(RegistryState {
                cells: vec![root],
                index,
                rules: RuleSet::default(),
            }),
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Handle to the root cell, whose level is the default for all others
    pub fn root(&self) -> CellHandle {
        let root = Arc::clone(&self.state.lock().cells[ROOT]);
        CellHandle::new(root, self.router.clone())
    }

    /// Handle for `name`, registering the cell on first use.
    ///
    /// The name is lowercased and stripped of trailing `/`. Registering a name
    /// twice reports a diagnostic and returns a handle to the existing cell.
    /// A new cell starts at the level the last configuration assigns to its
    /// name.
    ///
    /// # Errors
    ///
    /// Returns [`VlogError::Config`] if the name contains `*`, `=` or `,`,
    /// which no rule could address.
    #[track_caller]
    pub fn register(&self, name: &str) -> Result<CellHandle> {
        let location = Location::caller();
        let source = format!("{}:{}", location.file(), location.line());
        let name = name.trim_end_matches('/').to_lowercase();
        if name.contains(['*', '=', ',']) {
            return Err(VlogError::config(
                name,
                "cell names cannot contain '*', '=' or ','",
            ));
        }

        let mut state = self.state.lock();
        if let Some(&idx) = state.index.get(&name) {
            let cell = Arc::clone(&state.cells[idx]);
            drop(state);
            self.router
                .diagnostic(format_args!("dup level name={} registered at {}", name, source));
            return Ok(CellHandle::new(cell, self.router.clone()));
        }

        let level = state.rules.resolve(&name, state.cells[ROOT].level());
        let cell = Arc::new(LevelCell::new(name.clone(), source, level));
        let idx = state.cells.len();
        state.cells.push(Arc::clone(&cell));
        state.index.insert(name, idx);
        Ok(CellHandle::new(cell, self.router.clone()))
    }

    /// Handle for an already registered name
    pub fn get(&self, name: &str) -> Option<CellHandle> {
        let state = self.state.lock();
        let name = name.trim_end_matches('/').to_lowercase();
        state
            .index
            .get(&name)
            .map(|&idx| CellHandle::new(Arc::clone(&state.cells[idx]), self.router.clone()))
    }

    /// Apply a rule string to every registered cell.
    ///
    /// A bare `*` rule sets the root level. Every other cell then takes, in
    /// increasing precedence: the root level, the first matching prefix rule
    /// in descending lexicographic order of prefix, and its exact rule. An
    /// empty string changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`VlogError::Config`] for a malformed rule, in which case no
    /// cell is modified.
    pub fn configure(&self, rules: &str) -> Result<()> {
        if rules.is_empty() {
            return Ok(());
        }

        let mut bad_levels = Vec::new();
        let ruleset = RuleSet::parse(rules, |token| bad_levels.push(token.to_string()))?;
        for token in &bad_levels {
            self.router
                .diagnostic(format_args!("ignore invalid logging level={}", token));
        }

        let mut state = self.state.lock();
        if let Some(default) = ruleset.default_level() {
            state.cells[ROOT].store(default);
        }
        let default = state.cells[ROOT].level();
        for cell in state.cells.iter().skip(1) {
            cell.store(ruleset.resolve(cell.name(), default));
        }
        state.rules = ruleset;
        Ok(())
    }

    /// Current levels as a rule string, `*=<default>` first, then every cell
    /// in registration order. Feeding it back to [`configure`](Self::configure)
    /// reproduces the same levels.
    pub fn export(&self) -> String {
        let state = self.state.lock();
        let mut out = format!("*={}", state.cells[ROOT].level());
        for cell in state.cells.iter().skip(1) {
            let _ = write!(out, ",{}={}", cell.name(), cell.level());
        }
        out
    }

    /// Every cell, root first, in registration order
    pub fn snapshot(&self) -> Vec<CellSnapshot> {
        self.state
            .lock()
            .cells
            .iter()
            .map(|cell| CellSnapshot {
                name: cell.name().to_string(),
                level: cell.level(),
                source: cell.source().to_string(),
            })
            .collect()
    }

    /// Number of cells, including the root
    pub fn cell_count(&self) -> usize {
        self.state.lock().cells.len()
    }
}

impl Default for LevelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LevelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelRegistry")
            .field("levels", &self.export())
            .field("router", &self.router)
            .finish()
    }
}
