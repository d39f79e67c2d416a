//! Tests for error types

use robotic_cell::core::CellError;
use robotic_cell::util::ResourceKind;

#[test]
fn test_invalid_argument_error() {
    let err = CellError::invalid("task duration must be a positive integer");
    assert_eq!(
        format!("{}", err),
        "invalid argument: task duration must be a positive integer"
    );
}

#[test]
fn test_duplicate_id_error() {
    let err = CellError::DuplicateId {
        kind: ResourceKind::Robot,
        id: "r1".to_string(),
    };
    assert_eq!(format!("{}", err), "robot `r1` is already registered");
}

#[test]
fn test_not_found_error() {
    let err = CellError::NotFound {
        kind: ResourceKind::Worker,
        id: "bob".to_string(),
    };
    assert_eq!(format!("{}", err), "no worker with id `bob`");
}

#[test]
fn test_busy_error() {
    let err = CellError::Busy {
        kind: ResourceKind::Robot,
        id: "r1".to_string(),
    };
    assert_eq!(format!("{}", err), "robot `r1` is busy with a task");
}

#[test]
fn test_insufficient_resources_error() {
    let err = CellError::InsufficientResources {
        kind: ResourceKind::Worker,
        requested: 3,
        available: 1,
    };
    assert_eq!(
        format!("{}", err),
        "insufficient workers: requested 3, idle 1"
    );
}
