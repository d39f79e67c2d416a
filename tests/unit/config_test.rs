//! Tests for configuration validation

use robotic_cell::config::CellConfig;

#[test]
fn test_default_config_is_valid() {
    let config = CellConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.tick_interval_ms, 1000);
    assert_eq!(config.tick_interval().as_secs(), 1);
}

#[test]
fn test_config_invalid_tick_interval() {
    let invalid = CellConfig {
        tick_interval_ms: 0,
        ..CellConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_config_invalid_event_buffer() {
    let invalid = CellConfig {
        event_buffer: 0,
        ..CellConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_config_rejects_blank_fleet_id() {
    let invalid = CellConfig {
        robots: vec!["r1".into(), "  ".into()],
        ..CellConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_config_rejects_duplicate_fleet_id() {
    let invalid = CellConfig {
        workers: vec!["ann".into(), "ann".into()],
        ..CellConfig::default()
    };
    let err = invalid.validate().unwrap_err();
    assert!(err.contains("ann"));
}

#[test]
fn test_config_from_json() {
    let json = r#"{
        "tick_interval_ms": 250,
        "robots": ["arm-1", "arm-2"],
        "workers": ["ann"]
    }"#;

    let config = CellConfig::from_json_str(json).unwrap();
    assert_eq!(config.tick_interval_ms, 250);
    assert_eq!(config.event_buffer, 256);
    assert_eq!(config.robots, vec!["arm-1", "arm-2"]);
}

#[test]
fn test_config_from_json_rejects_invalid() {
    assert!(CellConfig::from_json_str(r#"{"tick_interval_ms": 0}"#).is_err());
    assert!(CellConfig::from_json_str("not json").is_err());
}

#[test]
fn test_config_from_missing_file() {
    assert!(CellConfig::from_file("/definitely/not/here.json").is_err());
}
