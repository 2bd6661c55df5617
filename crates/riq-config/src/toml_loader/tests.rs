//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use crate::schema::{LogLevel, RiqConfig};
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let err = load_from_path(Path::new("/tmp/nonexistent_restaurantiq_config.toml")).unwrap_err();
    assert!(matches!(err, riq_common::ConfigError::FileNotFound(_)));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[session]
max_tool_rounds = 8
require_confirmation = true

[logging]
level = "DEBUG"
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.session.max_tool_rounds, 8);
    assert!(config.session.require_confirmation);
    assert_eq!(config.logging.level, LogLevel::Debug);
    // Defaults preserved
    assert_eq!(config.model.model, "gemini-2.0-flash");
    assert_eq!(config.backend.timeout_secs, 30);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[model\ntemperature = ").unwrap();

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, riq_common::ConfigError::ParseError(_)));
}

#[test]
fn out_of_range_values_are_returned_as_parsed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[model]\ntemperature = 9.0\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.model.temperature, 9.0);
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("restaurantiq").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config, RiqConfig::default());
}

#[test]
fn default_config_toml_is_valid() {
    let config: RiqConfig = toml::from_str(super::template::default_config_toml()).unwrap();
    assert_eq!(config, RiqConfig::default());
}

#[test]
fn default_config_path_is_reasonable() {
    if let Ok(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("restaurantiq"));
        assert!(path_str.ends_with("config.toml"));
    }
}
