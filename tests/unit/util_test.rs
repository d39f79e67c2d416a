//! Tests for utility functions

use robotic_cell::util::{now_ms, ResourceKind, ResourceStatus};

#[test]
fn test_resource_kind_labels() {
    assert_eq!(ResourceKind::Robot.to_string(), "robot");
    assert_eq!(ResourceKind::Worker.as_str(), "worker");
}

#[test]
fn test_resource_status_display() {
    assert_eq!(ResourceStatus::Idle.to_string(), "idle");
    assert_eq!(ResourceStatus::Working.to_string(), "working");
}

#[test]
fn test_resource_kind_serde() {
    let json = serde_json::to_string(&ResourceKind::Worker).unwrap();
    assert_eq!(json, "\"worker\"");
    let kind: ResourceKind = serde_json::from_str("\"robot\"").unwrap();
    assert_eq!(kind, ResourceKind::Robot);
}

#[test]
fn test_now_ms_is_positive() {
    assert!(now_ms() > 0);
}
