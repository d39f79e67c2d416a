//! All-or-nothing allocation of idle robots and workers.

use serde::Serialize;

use crate::core::error::{CellError, CellResult};
use crate::core::registry::Fleet;
use crate::util::serde::{ResourceKind, ResourceStatus};

/// Resources bound to one task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Allocation {
    /// Robot ids in selection order.
    pub robots: Vec<String>,
    /// Worker ids in selection order.
    pub workers: Vec<String>,
}

impl Allocation {
    /// True when nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.robots.is_empty() && self.workers.is_empty()
    }
}

/// Check that `requested` units of `kind` are idle right now.
///
/// # Errors
///
/// `InsufficientResources` naming the kind that ran short.
pub fn ensure_idle(fleet: &Fleet, kind: ResourceKind, requested: usize) -> CellResult<()> {
    let available = fleet.registry(kind).idle_count();
    if available < requested {
        return Err(CellError::InsufficientResources {
            kind,
            requested,
            available,
        });
    }
    Ok(())
}

/// Bind the first `robots` idle robots and first `workers` idle workers.
///
/// Selection follows registry insertion order. Both counts are checked before
/// any status changes, so a failure leaves the fleet untouched.
///
/// # Errors
///
/// `InsufficientResources` if either kind has too few idle units.
pub fn try_allocate(fleet: &mut Fleet, robots: usize, workers: usize) -> CellResult<Allocation> {
    ensure_idle(fleet, ResourceKind::Robot, robots)?;
    ensure_idle(fleet, ResourceKind::Worker, workers)?;

    let allocation = Allocation {
        robots: pick_idle(fleet, ResourceKind::Robot, robots),
        workers: pick_idle(fleet, ResourceKind::Worker, workers),
    };
    mark(fleet, &allocation, ResourceStatus::Working)?;
    Ok(allocation)
}

/// Set every resource in `allocation` back to idle.
///
/// # Errors
///
/// `NotFound` if a bound id is no longer registered; earlier ids stay released.
pub fn release(fleet: &mut Fleet, allocation: &Allocation) -> CellResult<()> {
    mark(fleet, allocation, ResourceStatus::Idle)
}

fn pick_idle(fleet: &Fleet, kind: ResourceKind, count: usize) -> Vec<String> {
    fleet
        .registry(kind)
        .idle_ids()
        .take(count)
        .map(str::to_string)
        .collect()
}

fn mark(fleet: &mut Fleet, allocation: &Allocation, status: ResourceStatus) -> CellResult<()> {
    for id in &allocation.robots {
        fleet.registry_mut(ResourceKind::Robot).set_status(id, status)?;
    }
    for id in &allocation.workers {
        fleet.registry_mut(ResourceKind::Worker).set_status(id, status)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fleet(robots: &[&str], workers: &[&str]) -> Fleet {
        let mut fleet = Fleet::new();
        for id in robots {
            fleet.registry_mut(ResourceKind::Robot).add(id).unwrap();
        }
        for id in workers {
            fleet.registry_mut(ResourceKind::Worker).add(id).unwrap();
        }
        fleet
    }

    #[test]
    fn test_allocates_first_idle_in_insertion_order() {
        let mut fleet = fleet(&["r1", "r2", "r3"], &["w1", "w2"]);
        let alloc = try_allocate(&mut fleet, 2, 1).unwrap();
        assert_eq!(alloc.robots, vec!["r1", "r2"]);
        assert_eq!(alloc.workers, vec!["w1"]);
        assert_eq!(fleet.robots().status("r1"), Some(ResourceStatus::Working));
        assert_eq!(fleet.robots().status("r3"), Some(ResourceStatus::Idle));

        let next = try_allocate(&mut fleet, 1, 1).unwrap();
        assert_eq!(next.robots, vec!["r3"]);
        assert_eq!(next.workers, vec!["w2"]);
    }

    #[test]
    fn test_failure_does_not_mutate() {
        let mut fleet = fleet(&["r1", "r2"], &["w1"]);
        let before_robots = fleet.robots().snapshot();
        let before_workers = fleet.workers().snapshot();

        let err = try_allocate(&mut fleet, 2, 2).unwrap_err();
        assert_eq!(
            err,
            CellError::InsufficientResources {
                kind: ResourceKind::Worker,
                requested: 2,
                available: 1
            }
        );
        assert_eq!(fleet.robots().snapshot(), before_robots);
        assert_eq!(fleet.workers().snapshot(), before_workers);
    }

    #[test]
    fn test_zero_request_binds_nothing() {
        let mut fleet = Fleet::new();
        let alloc = try_allocate(&mut fleet, 0, 0).unwrap();
        assert!(alloc.is_empty());
    }

    #[test]
    fn test_release_returns_to_idle() {
        let mut fleet = fleet(&["r1"], &["w1"]);
        let alloc = try_allocate(&mut fleet, 1, 1).unwrap();
        release(&mut fleet, &alloc).unwrap();
        assert_eq!(fleet.robots().idle_count(), 1);
        assert_eq!(fleet.workers().idle_count(), 1);
    }
}
