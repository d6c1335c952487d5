//! Configuration Loader Tests

use edi_domain::error::Error;
use edi_infrastructure::config::loader::{ConfigBuilder, ConfigLoader};
use edi_infrastructure::config::{AppConfig, LoggingConfig, SynthesisConfig};
use edi_infrastructure::constants::DEFAULT_LOG_LEVEL;
use tempfile::TempDir;

#[test]
fn test_config_defaults() {
    let config = AppConfig::default();
    assert_eq!(config.synthesis.type_name_prefix, "DI_");
    assert!(config.synthesis.reuse_subtypes);
    assert_eq!(config.logging.level, DEFAULT_LOG_LEVEL);
    assert!(!config.logging.json_format);
}

#[test]
fn test_config_builder() {
    let config = ConfigBuilder::new()
        .with_type_name_prefix("Proxy_")
        .with_logging(LoggingConfig {
            level: "debug".to_string(),
            ..LoggingConfig::default()
        })
        .build();

    assert_eq!(config.synthesis.type_name_prefix, "Proxy_");
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_config_save_load() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("edi.toml");

    let original = ConfigBuilder::new()
        .with_synthesis(SynthesisConfig {
            type_name_prefix: "Woven".to_string(),
            reuse_subtypes: false,
        })
        .build();

    let loader = ConfigLoader::new();
    loader.save_to_file(&original, &config_path).unwrap();

    let loaded = ConfigLoader::new()
        .with_config_path(&config_path)
        .load()
        .unwrap();

    assert_eq!(loaded.synthesis, original.synthesis);
    assert_eq!(loaded.logging, original.logging);
}

#[test]
fn test_partial_file_keeps_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("partial.toml");
    std::fs::write(&config_path, "[logging]\njson_format = true\n").unwrap();

    let loaded = ConfigLoader::new()
        .with_config_path(&config_path)
        .load()
        .unwrap();

    assert!(loaded.logging.json_format);
    assert_eq!(loaded.logging.level, DEFAULT_LOG_LEVEL);
    assert_eq!(loaded.synthesis.type_name_prefix, "DI_");
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let loader = ConfigLoader::new().with_config_path(temp_dir.path().join("absent.toml"));
    assert!(loader.config_path().is_some());

    let loaded = loader.load().unwrap();
    assert_eq!(loaded.synthesis, SynthesisConfig::default());
}

#[test]
fn test_invalid_prefix_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("bad.toml");
    std::fs::write(&config_path, "[synthesis]\ntype_name_prefix = \"has space\"\n").unwrap();

    let err = ConfigLoader::new()
        .with_config_path(&config_path)
        .load()
        .unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}

#[test]
fn test_invalid_log_level_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("bad.toml");
    std::fs::write(&config_path, "[logging]\nlevel = \"loud\"\n").unwrap();

    let err = ConfigLoader::new()
        .with_config_path(&config_path)
        .load()
        .unwrap_err();
    assert!(err.to_string().contains("Invalid log level: loud"));
}

#[test]
fn test_malformed_file_is_a_configuration_error() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("broken.toml");
    std::fs::write(&config_path, "[synthesis\n").unwrap();

    let err = ConfigLoader::new()
        .with_config_path(&config_path)
        .load()
        .unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
    assert!(err.to_string().contains("Invalid configuration"));
}

#[test]
fn test_mistyped_value_names_its_key() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("typed.toml");
    std::fs::write(&config_path, "[synthesis]\nreuse_subtypes = \"yes\"\n").unwrap();

    let err = ConfigLoader::new()
        .with_config_path(&config_path)
        .load()
        .unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
    assert!(err.to_string().contains("synthesis.reuse_subtypes"));
}
