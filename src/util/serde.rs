//! Shared identifiers and serializable enums used across the cell.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier handed out by the task ledger.
pub type TaskId = u64;

/// Identifier handed out by the product pipeline.
pub type ProductId = u64;

/// The two interchangeable resource families tracked by the cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Robot unit.
    Robot,
    /// Human worker.
    Worker,
}

impl ResourceKind {
    /// Lowercase label used in messages and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Robot => "robot",
            Self::Worker => "worker",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Occupancy of a single resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceStatus {
    /// Available for allocation.
    Idle,
    /// Bound to exactly one in-progress task.
    Working,
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Working => f.write_str("working"),
        }
    }
}
