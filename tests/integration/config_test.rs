use std::fs;
use std::path::PathBuf;
use taskmon::core::config::Config;
use tempfile::TempDir;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.cpu_sample_ms, 1000);
    assert_eq!(config.command_timeout_secs, 5);
    assert_eq!(config.ram_watts_per_8gb, 3.0);
    assert_eq!(config.recent_backups, 10);
}

#[test]
fn test_config_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("taskmon").join("config.json");

    let mut config = Config::default();
    config.set_value("data_dir", "/srv/taskmon").unwrap();
    config.set_value("ram_watts_per_8gb", "2.5").unwrap();
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.data_dir, PathBuf::from("/srv/taskmon"));
    assert_eq!(loaded.ram_watts_per_8gb, 2.5);
}

#[test]
fn test_missing_config_is_default() {
    let temp_dir = TempDir::new().unwrap();
    let loaded = Config::load_from(&temp_dir.path().join("absent.json")).unwrap();
    assert_eq!(loaded, Config::default());
}

#[test]
fn test_corrupt_config_falls_back_to_default() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(&path, "{ this is not json").unwrap();

    assert_eq!(Config::load_from(&path).unwrap(), Config::default());
}

#[test]
fn test_partial_config_fills_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(&path, r#"{ "cpu_sample_ms": 250 }"#).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded.cpu_sample_ms, 250);
    assert_eq!(loaded.recent_backups, 10);
}
