//! Integration tests for rust_vlog
//!
//! These tests verify:
//! - Rule resolution across a cell hierarchy
//! - Message gating per level
//! - Duplicate and late registration
//! - Export and re-apply of levels
//! - Output through memory and rotating file sinks

use rust_vlog::prelude::*;
use rust_vlog::{err, info, v1, v2};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

fn memory_registry() -> (LevelRegistry, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let router = Router::with_sink(sink.clone());
    router.set_formatter(Arc::new(DefaultFormatter::without_location()));
    (LevelRegistry::with_router(router), sink)
}

fn log_files(dir: &TempDir) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir.path())
        .expect("Failed to read temp dir")
        .map(|entry| entry.expect("Failed to read entry").path())
        .collect();
    files.sort();
    files
}

#[test]
fn test_hierarchy_resolution() {
    let (registry, _) = memory_registry();
    let a = registry.register("a").unwrap();
    let ab = registry.register("a/b").unwrap();
    let abc = registry.register("a/b/c").unwrap();
    let abd = registry.register("a/b/d").unwrap();
    let c = registry.register("c").unwrap();

    registry.configure("*=e,a=i,a/b=v1,a/b/c=v2").unwrap();

    assert_eq!(registry.root().level(), LogLevel::Error);
    assert_eq!(a.level(), LogLevel::Info);
    assert_eq!(ab.level(), LogLevel::V1);
    assert_eq!(abc.level(), LogLevel::V2);
    // Exact rules do not reach descendants
    assert_eq!(abd.level(), LogLevel::Error);
    assert_eq!(c.level(), LogLevel::Error);
}

#[test]
fn test_prefix_rules_cover_descendants() {
    let (registry, _) = memory_registry();
    let ab = registry.register("a/b").unwrap();
    let abc = registry.register("a/b/c").unwrap();
    let abd = registry.register("a/b/d").unwrap();
    let abx = registry.register("a/bx").unwrap();

    registry.configure("*=e,a/b/*=v1,a/b/c=v2").unwrap();

    assert_eq!(ab.level(), LogLevel::V1);
    assert_eq!(abc.level(), LogLevel::V2);
    assert_eq!(abd.level(), LogLevel::V1);
    // "a/bx" is not below "a/b"
    assert_eq!(abx.level(), LogLevel::Error);
}

#[test]
fn test_gating_matrix() {
    let (registry, sink) = memory_registry();
    let a = registry.register("a").unwrap();
    let ab = registry.register("a/b").unwrap();
    let abc = registry.register("a/b/c").unwrap();
    let d = registry.register("d").unwrap();

    registry.configure("*=e,a=i,a/b/*=v1,a/b/c=v2").unwrap();

    for cell in [&a, &ab, &abc, &d] {
        err!(cell, "{} err", cell.name());
        info!(cell, "{} info", cell.name());
        v1!(cell, "{} v1", cell.name());
        v2!(cell, "{} v2", cell.name());
    }

    assert_eq!(
        sink.take(),
        vec![
            "E a err",
            "a info",
            "E a/b err",
            "a/b info",
            "a/b v1",
            "E a/b/c err",
            "a/b/c info",
            "a/b/c v1",
            "a/b/c v2",
            "E d err",
        ]
    );

    assert!(!a.on(1));
    assert!(ab.on(1));
    assert!(!ab.on(2));
    assert!(abc.on(2));
    assert!(!d.on(1));
}

#[test]
fn test_duplicate_registration_shares_cell() {
    let (registry, sink) = memory_registry();
    let first = registry.register("net").unwrap();
    let second = registry.register("NET/").unwrap();

    assert!(first.same_cell(&second));
    assert_eq!(registry.cell_count(), 2);

    let lines = sink.take();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("dup level name=net registered at "));

    second.set_level(LogLevel::V2);
    assert_eq!(first.level(), LogLevel::V2);
}

#[test]
fn test_late_registration_uses_last_rules() {
    let (registry, _) = memory_registry();
    registry.configure("*=e,db/*=v1,db/pool=v2").unwrap();

    let db = registry.register("db").unwrap();
    let pool = registry.register("db/pool").unwrap();
    let cache = registry.register("cache").unwrap();

    assert_eq!(db.level(), LogLevel::V1);
    assert_eq!(pool.level(), LogLevel::V2);
    assert_eq!(cache.level(), LogLevel::Error);
}

#[test]
fn test_export_roundtrip() {
    let (registry, _) = memory_registry();
    for name in ["a", "a/b", "a/b/c", "z"] {
        registry.register(name).unwrap();
    }
    registry.configure("*=v1,a/*=e,a/b/c=v2").unwrap();
    let exported = registry.export();
    assert_eq!(exported, "*=v1,a=err,a/b=err,a/b/c=v2,z=v1");

    registry.configure("*=i").unwrap();
    assert_eq!(registry.export(), "*=info,a=info,a/b=info,a/b/c=info,z=info");

    registry.configure(&exported).unwrap();
    assert_eq!(registry.export(), exported);
}

#[test]
fn test_empty_configure_is_noop() {
    let (registry, _) = memory_registry();
    let cell = registry.register("a").unwrap();
    registry.configure("*=e,a=v2").unwrap();
    let before = registry.export();

    registry.configure("").unwrap();
    assert_eq!(registry.export(), before);
    assert_eq!(cell.level(), LogLevel::V2);
}

#[test]
fn test_malformed_rules_leave_levels() {
    let (registry, _) = memory_registry();
    let cell = registry.register("a").unwrap();
    registry.configure("a=v1").unwrap();

    for bad in [",", "a*=i", "*/*=i", "a/*/b=i", "**=e"] {
        let result = registry.configure(bad);
        assert!(
            matches!(result, Err(VlogError::Config { .. })),
            "{} should be rejected",
            bad
        );
        assert_eq!(cell.level(), LogLevel::V1);
    }
}

#[test]
fn test_invalid_level_token_is_reported() {
    let (registry, sink) = memory_registry();
    let cell = registry.register("a").unwrap();

    registry.configure("a=loud,*=v1").unwrap();

    // The rule still applies, at the info level
    assert_eq!(cell.level(), LogLevel::Info);
    assert_eq!(registry.root().level(), LogLevel::V1);
    assert_eq!(sink.take(), vec!["ignore invalid logging level=loud"]);
}

#[test]
fn test_vset_rejects_non_verbose() {
    let (registry, sink) = memory_registry();
    let cell = registry.register("a").unwrap();

    assert_eq!(cell.vset(2), LogLevel::Info);
    assert_eq!(cell.level(), LogLevel::V2);

    cell.vset(3);
    assert_eq!(cell.level(), LogLevel::V2);
    assert_eq!(sink.len(), 1);
}

#[test]
fn test_default_formatter_location() {
    let sink = Arc::new(MemorySink::new());
    let registry = LevelRegistry::with_router(Router::with_sink(sink.clone()));
    let cell = registry.register("a").unwrap();

    let line = line!() + 1;
    err!(cell, "failed {}", 7);
    assert_eq!(
        sink.lines(),
        vec![format!("integration_tests.rs:{}: E failed 7", line)]
    );
}

#[test]
fn test_values_in_messages() {
    let (registry, sink) = memory_registry();
    let cell = registry.register("a").unwrap();

    info!(
        cell,
        "{} {} {}",
        Value::bytes(b"key"),
        Value::bytes(&[0xde, 0xad]),
        Joined(&[&"x", &1])
    );
    assert_eq!(sink.take(), vec!["key dead x 1"]);
}

#[test]
fn test_rotating_file_through_registry() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let file_sink = Arc::new(
        RotatingFileSink::with_config(
            temp_dir.path().join("app"),
            RotationConfig::new().with_max_bytes(180),
        )
        .expect("Failed to create sink"),
    );
    let router = Router::with_sink(file_sink.clone());
    router.set_formatter(Arc::new(DefaultFormatter::without_location()));
    let registry = LevelRegistry::with_router(router);
    let cell = registry.register("a").unwrap();

    info!(cell, "a");
    info!(cell, "bc");
    info!(cell, "{}", "x".repeat(128));
    info!(cell, "def");
    registry.router().flush().expect("Failed to flush");

    let files = log_files(&temp_dir);
    assert_eq!(files.len(), 3);
    assert_eq!(file_sink.sequence(), 2);

    let contents: Vec<String> = files
        .iter()
        .map(|path| fs::read_to_string(path).expect("Failed to read log file"))
        .collect();
    let first: Vec<&str> = contents[0].lines().collect();
    assert_eq!(first.len(), 2);
    assert!(first[0].ends_with(" a"));
    assert!(first[1].ends_with(" bc"));
    assert_eq!(contents[1].lines().count(), 1);
    assert!(contents[2].ends_with(" def\n"));
}

#[test]
fn test_config_apply_from_json() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let json = format!(
        r#"{{"levels": "*=e,svc/*=v1", "file_prefix": {:?}}}"#,
        temp_dir.path().join("logs").join("svc")
    );
    let config = VlogConfig::from_json_str(&json).unwrap();

    let registry = LevelRegistry::with_router(Router::with_sink(Arc::new(MemorySink::new())));
    let svc = registry.register("svc/api").unwrap();
    let sink = config.apply(&registry).unwrap().expect("file sink installed");

    assert_eq!(svc.level(), LogLevel::V1);
    v1!(svc, "request handled");
    sink.shutdown().unwrap();

    let content = fs::read_to_string(sink.current_path()).unwrap();
    assert!(content.contains("request handled"));
}
