//! Environment variable configuration tests
//!
//! These tests modify environment variables and must run sequentially:
//!
//! ```bash
//! cargo test -p edi-infrastructure --test unit config_env -- --test-threads=1 --ignored
//! ```
//!
//! # Safety
//!
//! Tests use `unsafe` blocks for `env::set_var`/`env::remove_var` because
//! Rust 2024 edition requires this for environment variable mutations.
//! Tests MUST run with `--test-threads=1` to prevent data races.

use edi_infrastructure::config::loader::ConfigLoader;
use std::env;
use tempfile::TempDir;

/// Helper to set env var safely
fn set_env(key: &str, value: &str) {
    // SAFETY: Tests must run with --test-threads=1
    unsafe {
        env::set_var(key, value);
    }
}

/// Helper to remove env var safely
fn remove_env(key: &str) {
    // SAFETY: Tests must run with --test-threads=1
    unsafe {
        env::remove_var(key);
    }
}

#[test]
#[ignore = "requires --test-threads=1 due to env var mutations"]
fn test_nested_env_vars_override_defaults() {
    set_env("EDI_SYNTHESIS__TYPE_NAME_PREFIX", "Env_");
    set_env("EDI_LOGGING__JSON_FORMAT", "true");

    let config = ConfigLoader::new().load().expect("Should load config");

    assert_eq!(config.synthesis.type_name_prefix, "Env_");
    assert!(config.logging.json_format);

    remove_env("EDI_SYNTHESIS__TYPE_NAME_PREFIX");
    remove_env("EDI_LOGGING__JSON_FORMAT");
}

#[test]
#[ignore = "requires --test-threads=1 due to env var mutations"]
fn test_env_vars_override_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("edi.toml");
    std::fs::write(&config_path, "[logging]\nlevel = \"debug\"\n").unwrap();
    set_env("EDI_LOGGING__LEVEL", "error");

    let config = ConfigLoader::new()
        .with_config_path(&config_path)
        .load()
        .expect("Should load config");
    assert_eq!(config.logging.level, "error");

    remove_env("EDI_LOGGING__LEVEL");
}

#[test]
#[ignore = "requires --test-threads=1 due to env var mutations"]
fn test_custom_prefix() {
    set_env("WOVEN_SYNTHESIS__REUSE_SUBTYPES", "false");

    let config = ConfigLoader::new()
        .with_env_prefix("WOVEN")
        .load()
        .expect("Should load config");
    assert!(!config.synthesis.reuse_subtypes);

    remove_env("WOVEN_SYNTHESIS__REUSE_SUBTYPES");
}
