//! # Configuration Tests
//!
//! Tests for configuration structures, JSON deserialization, defaults,
//! and backend aliases.

use pretty_assertions::assert_eq;
use pspmem_core::config::*;
use pspmem_core::MemoryError;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.memory.backend, BackendKind::Unified);
    assert_eq!(config.debug.max_breakpoint_depth, 8);
    assert_eq!(config.debug.dump_path, "memory.bin");
}

#[test]
fn test_empty_json_uses_defaults() {
    let config = Config::from_json("{}").unwrap();
    assert_eq!(config.memory.backend, BackendKind::Unified);
    assert_eq!(config.debug.max_breakpoint_depth, 8);
}

#[test]
fn test_partial_debug_section() {
    let config = Config::from_json(r#"{ "debug": { "dump_path": "/tmp/ram.bin" } }"#).unwrap();
    assert_eq!(config.debug.dump_path, "/tmp/ram.bin");
    assert_eq!(config.debug.max_breakpoint_depth, 8);
}

#[test]
fn test_backend_aliases() {
    let fast = Config::from_json(r#"{ "memory": { "backend": "Fast" } }"#).unwrap();
    let low = Config::from_json(r#"{ "memory": { "backend": "Low" } }"#).unwrap();
    assert_eq!(fast.memory.backend, BackendKind::Unified);
    assert_eq!(low.memory.backend, BackendKind::Segmented);
}

#[test]
fn test_unknown_backend_is_config_error() {
    let err = Config::from_json(r#"{ "memory": { "backend": "Paged" } }"#).unwrap_err();
    assert!(matches!(err, MemoryError::Config(_)));
}
