//! Tests for resource registration through the cell

use robotic_cell::core::{CellError, RoboticCell};
use robotic_cell::util::{ResourceKind, ResourceStatus};

#[test]
fn test_add_and_snapshot() {
    let cell = RoboticCell::new();
    cell.add_resource(ResourceKind::Robot, "r1").unwrap();
    cell.add_resource(ResourceKind::Robot, "r2").unwrap();

    let snapshot = cell.snapshot(ResourceKind::Robot);
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot[0].id, "r1");
    assert!(snapshot.iter().all(|e| e.status == ResourceStatus::Idle));
    assert!(cell.snapshot(ResourceKind::Worker).is_empty());
}

#[test]
fn test_same_id_allowed_across_kinds() {
    let cell = RoboticCell::new();
    cell.add_resource(ResourceKind::Robot, "unit-7").unwrap();
    cell.add_resource(ResourceKind::Worker, "unit-7").unwrap();
    assert!(matches!(
        cell.add_resource(ResourceKind::Worker, "unit-7"),
        Err(CellError::DuplicateId { .. })
    ));
}

#[test]
fn test_blank_remove_is_invalid_and_mutates_nothing() {
    let cell = RoboticCell::new();
    cell.add_resource(ResourceKind::Worker, "w1").unwrap();
    assert!(matches!(
        cell.remove_resource(ResourceKind::Worker, "  "),
        Err(CellError::InvalidArgument(_))
    ));
    assert!(matches!(
        cell.check_removal(ResourceKind::Worker, ""),
        Err(CellError::InvalidArgument(_))
    ));
    assert_eq!(cell.snapshot(ResourceKind::Worker).len(), 1);
}

#[test]
fn test_remove_missing_is_not_found() {
    let cell = RoboticCell::new();
    assert_eq!(
        cell.remove_resource(ResourceKind::Robot, "ghost"),
        Err(CellError::NotFound {
            kind: ResourceKind::Robot,
            id: "ghost".into()
        })
    );
}
