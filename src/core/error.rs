//! Error types for cell operations.

use thiserror::Error;

use crate::util::serde::ResourceKind;

/// Errors produced by registry, allocator, ledger and pipeline operations.
///
/// None of these are fatal: every variant leaves the cell state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CellError {
    /// Blank identifier, malformed number, non-positive duration or similar.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A resource with this id is already registered.
    #[error("{kind} `{id}` is already registered")]
    DuplicateId {
        /// Resource family.
        kind: ResourceKind,
        /// Offending id.
        id: String,
    },
    /// No resource with this id is registered.
    #[error("no {kind} with id `{id}`")]
    NotFound {
        /// Resource family.
        kind: ResourceKind,
        /// Missing id.
        id: String,
    },
    /// The resource is bound to an in-progress task.
    #[error("{kind} `{id}` is busy with a task")]
    Busy {
        /// Resource family.
        kind: ResourceKind,
        /// Busy id.
        id: String,
    },
    /// Not enough idle resources of one kind to satisfy a request.
    #[error("insufficient {kind}s: requested {requested}, idle {available}")]
    InsufficientResources {
        /// Resource family that ran short.
        kind: ResourceKind,
        /// Units requested.
        requested: usize,
        /// Units idle at the time of the request.
        available: usize,
    },
}

impl CellError {
    /// Shorthand for [`CellError::InvalidArgument`].
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

/// Result alias for cell operations.
pub type CellResult<T> = Result<T, CellError>;

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
