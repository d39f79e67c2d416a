//! Resource registries for robots and workers.
//!
//! A registry keeps its entries in insertion order. The allocator relies on
//! that order to pick resources deterministically, so entries live in a
//! `Vec` rather than a hash map; fleets are small enough that linear lookup
//! is not a concern.

use serde::Serialize;

use crate::core::error::{CellError, CellResult};
use crate::util::serde::{ResourceKind, ResourceStatus};

/// A registered resource and its current occupancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceEntry {
    /// Unique, non-blank identifier.
    pub id: String,
    /// Idle or working.
    pub status: ResourceStatus,
}

/// Id to status mapping for one resource kind.
#[derive(Debug, Clone)]
pub struct ResourceRegistry {
    kind: ResourceKind,
    entries: Vec<ResourceEntry>,
}

impl ResourceRegistry {
    /// Create an empty registry for `kind`.
    #[must_use]
    pub const fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
        }
    }

    /// Resource family held by this registry.
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Register a new idle resource.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a blank id, `DuplicateId` if already present.
    pub fn add(&mut self, id: &str) -> CellResult<()> {
        if id.trim().is_empty() {
            return Err(CellError::invalid(format!("{} id can't be blank", self.kind)));
        }
        if self.position(id).is_some() {
            return Err(CellError::DuplicateId {
                kind: self.kind,
                id: id.to_string(),
            });
        }
        self.entries.push(ResourceEntry {
            id: id.to_string(),
            status: ResourceStatus::Idle,
        });
        Ok(())
    }

    /// Decide whether `id` may be removed right now, without mutating anything.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a blank id, `NotFound` if absent, `Busy` if working.
    pub fn check_removal(&self, id: &str) -> CellResult<()> {
        if id.trim().is_empty() {
            return Err(CellError::invalid(format!("{} id can't be blank", self.kind)));
        }
        match self.status(id) {
            None => Err(CellError::NotFound {
                kind: self.kind,
                id: id.to_string(),
            }),
            Some(ResourceStatus::Working) => Err(CellError::Busy {
                kind: self.kind,
                id: id.to_string(),
            }),
            Some(ResourceStatus::Idle) => Ok(()),
        }
    }

    /// Remove an idle resource.
    ///
    /// # Errors
    ///
    /// Same as [`ResourceRegistry::check_removal`]; nothing is removed on error.
    pub fn remove(&mut self, id: &str) -> CellResult<()> {
        self.check_removal(id)?;
        if let Some(idx) = self.position(id) {
            self.entries.remove(idx);
        }
        Ok(())
    }

    /// Current status of `id`, if registered.
    #[must_use]
    pub fn status(&self, id: &str) -> Option<ResourceStatus> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.status)
    }

    /// Point-in-time copy of every entry in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ResourceEntry> {
        self.entries.clone()
    }

    /// Idle ids in insertion order.
    pub fn idle_ids(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| e.status == ResourceStatus::Idle)
            .map(|e| e.id.as_str())
    }

    /// Number of idle resources.
    #[must_use]
    pub fn idle_count(&self) -> usize {
        self.idle_ids().count()
    }

    /// Total number of registered resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overwrite the status of a registered resource.
    ///
    /// Only the allocator (binding) and the ledger (release) call this.
    pub(crate) fn set_status(&mut self, id: &str, status: ResourceStatus) -> CellResult<()> {
        let kind = self.kind;
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| CellError::NotFound {
                kind,
                id: id.to_string(),
            })?;
        entry.status = status;
        Ok(())
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }
}

/// Both registries, addressed by kind.
#[derive(Debug, Clone)]
pub struct Fleet {
    robots: ResourceRegistry,
    workers: ResourceRegistry,
}

impl Default for Fleet {
    fn default() -> Self {
        Self::new()
    }
}

impl Fleet {
    /// Empty robot and worker registries.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            robots: ResourceRegistry::new(ResourceKind::Robot),
            workers: ResourceRegistry::new(ResourceKind::Worker),
        }
    }

    /// Registry for `kind`.
    #[must_use]
    pub const fn registry(&self, kind: ResourceKind) -> &ResourceRegistry {
        match kind {
            ResourceKind::Robot => &self.robots,
            ResourceKind::Worker => &self.workers,
        }
    }

    /// Mutable registry for `kind`.
    pub fn registry_mut(&mut self, kind: ResourceKind) -> &mut ResourceRegistry {
        match kind {
            ResourceKind::Robot => &mut self.robots,
            ResourceKind::Worker => &mut self.workers,
        }
    }

    /// Robot registry.
    #[must_use]
    pub const fn robots(&self) -> &ResourceRegistry {
        &self.robots
    }

    /// Worker registry.
    #[must_use]
    pub const fn workers(&self) -> &ResourceRegistry {
        &self.workers
    }
}
