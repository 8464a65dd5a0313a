//! File round trips for grundton-config.

use grundton_config::{ConfigError, SwitchPolicyName, TrackerConfig};
use grundton_tracker::{StringCatalog, SwitchPolicy};
use tempfile::TempDir;

#[test]
fn save_then_load_preserves_everything() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("grundton.toml");

    let mut config = TrackerConfig::default().with_catalog(&StringCatalog::guitar());
    config.audio.block_size = 64;
    config.selection.switch_policy = SwitchPolicyName::Reset;
    config.save(&path).unwrap();

    let loaded = TrackerConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
    let settings = loaded.settings().unwrap();
    assert_eq!(settings.block_size, 64);
    assert_eq!(settings.switch_policy, SwitchPolicy::ResetHeldPitch);
}

#[test]
fn missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");
    let err = TrackerConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn malformed_file_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[audio\nblock_size = ").unwrap();
    assert!(matches!(TrackerConfig::load(&path), Err(ConfigError::TomlParse(_))));
}

#[test]
fn invalid_values_surface_from_settings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("grundton.toml");
    std::fs::write(&path, "[audio]\nblock_size = 0\n\n[oscillators]\nbaseline_amplitude = 2.0\n").unwrap();

    let config = TrackerConfig::load(&path).unwrap();
    match config.settings() {
        Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 2),
        other => panic!("expected validation errors, got {other:?}"),
    }
}
