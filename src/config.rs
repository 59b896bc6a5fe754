//! Startup settings
//!
//! Levels and the output file can come from the environment or from a JSON
//! document. Applying the settings configures a registry and, when a file
//! prefix is present, routes it to a [`RotatingFileSink`].

use crate::core::{LevelRegistry, Result, VlogError};
use crate::sinks::{RotatingFileSink, RotationConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Rule string, e.g. `*=e,net/*=v1`
pub const ENV_LEVELS: &str = "RUST_VLOG";
/// Prefix of rotated log files
pub const ENV_FILE: &str = "RUST_VLOG_FILE";
/// Size limit of one log file in bytes
pub const ENV_MAX_BYTES: &str = "RUST_VLOG_MAX_BYTES";

/// # Example
///
/// ```
/// use rust_vlog::{LevelRegistry, LogLevel, VlogConfig};
///
/// let config = VlogConfig::from_json_str(r#"{"levels": "*=e,db=v1"}"#).unwrap();
/// let registry = LevelRegistry::new();
/// let db = registry.register("db").unwrap();
///
/// config.apply(&registry).unwrap();
/// assert_eq!(db.level(), LogLevel::V1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VlogConfig {
    pub levels: String,
    pub file_prefix: Option<PathBuf>,
    pub rotation: RotationConfig,
}

impl VlogConfig {
    /// Read [`ENV_LEVELS`], [`ENV_FILE`] and [`ENV_MAX_BYTES`].
    ///
    /// # Errors
    ///
    /// Returns [`VlogError::InvalidEnv`] if the size limit is not a number.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(levels) = lookup(ENV_LEVELS) {
            config.levels = levels;
        }
        config.file_prefix = lookup(ENV_FILE).filter(|p| !p.is_empty()).map(PathBuf::from);
        if let Some(value) = lookup(ENV_MAX_BYTES) {
            config.rotation.max_bytes_per_file =
                value.trim().parse().map_err(|_| VlogError::InvalidEnv {
                    key: ENV_MAX_BYTES.to_string(),
                    value,
                })?;
        }
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`VlogError::ConfigParse`] for invalid JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Configure `registry` with these settings.
    ///
    /// Returns the file sink that was installed, if any. A failure to create
    /// the first log file is returned before any level is changed.
    pub fn apply(&self, registry: &LevelRegistry) -> Result<Option<Arc<RotatingFileSink>>> {
        let sink = match &self.file_prefix {
            Some(prefix) => Some(Arc::new(RotatingFileSink::with_config(
                prefix,
                self.rotation.clone(),
            )?)),
            None => None,
        };
        registry.configure(&self.levels)?;
        if let Some(sink) = &sink {
            registry.router().set_sink(sink.clone());
        }
        Ok(sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogLevel, Router};
    use crate::sinks::MemorySink;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_from_lookup() {
        let config = VlogConfig::from_lookup(lookup(&[
            (ENV_LEVELS, "*=e,a=v1"),
            (ENV_FILE, "/tmp/server"),
            (ENV_MAX_BYTES, "4096"),
        ]))
        .unwrap();
        assert_eq!(config.levels, "*=e,a=v1");
        assert_eq!(config.file_prefix, Some(PathBuf::from("/tmp/server")));
        assert_eq!(config.rotation.max_bytes_per_file, 4096);
    }

    #[test]
    fn test_from_lookup_empty() {
        let config = VlogConfig::from_lookup(lookup(&[(ENV_FILE, "")])).unwrap();
        assert_eq!(config, VlogConfig::default());
    }

    #[test]
    fn test_from_lookup_bad_size() {
        let err = VlogConfig::from_lookup(lookup(&[(ENV_MAX_BYTES, "lots")])).unwrap_err();
        assert!(matches!(err, VlogError::InvalidEnv { .. }));
    }

    #[test]
    fn test_from_json() {
        let config = VlogConfig::from_json_str(
            r#"{"levels": "db/*=v2", "file_prefix": "logs/app", "rotation": {"max_bytes_per_file": 100}}"#,
        )
        .unwrap();
        assert_eq!(config.levels, "db/*=v2");
        assert_eq!(config.file_prefix, Some(PathBuf::from("logs/app")));
        assert_eq!(config.rotation.max_bytes_per_file, 100);
        assert_eq!(config.rotation.record_overhead, 50);

        assert!(matches!(
            VlogConfig::from_json_str("{levels"),
            Err(VlogError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_apply_installs_file_sink() {
        let dir = tempfile::tempdir().unwrap();
        let memory = Arc::new(MemorySink::new());
        let registry = LevelRegistry::with_router(Router::with_sink(memory.clone()));
        let cell = registry.register("net").unwrap();

        let config = VlogConfig {
            levels: "net=v2".to_string(),
            file_prefix: Some(dir.path().join("app")),
            rotation: RotationConfig::default(),
        };
        let sink = config.apply(&registry).unwrap().unwrap();

        assert_eq!(cell.level(), LogLevel::V2);
        assert_eq!(registry.router().sink().name(), "rotating_file");
        cell.v2(format_args!("to file"));
        sink.shutdown().unwrap();
        assert!(memory.is_empty());
        let content = std::fs::read_to_string(sink.current_path()).unwrap();
        assert!(content.contains("to file"));
    }

    #[test]
    fn test_apply_bad_rules_keeps_sink() {
        let memory = Arc::new(MemorySink::new());
        let registry = LevelRegistry::with_router(Router::with_sink(memory.clone()));
        let config = VlogConfig {
            levels: "a*=i".to_string(),
            ..VlogConfig::default()
        };
        assert!(config.apply(&registry).is_err());
        assert_eq!(registry.router().sink().name(), "memory");
    }
}
