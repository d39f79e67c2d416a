//! Core allocation, ledger and pipeline engine.

pub mod allocator;
pub mod cell;
pub mod clock;
pub mod error;
pub mod events;
pub mod ledger;
pub mod pipeline;
pub mod registry;

pub use allocator::{try_allocate, Allocation};
pub use cell::{ProductSummary, RoboticCell, StatusReport, TickReport};
pub use clock::ProgressClock;
pub use error::{AppResult, CellError, CellResult};
pub use events::{
    CellEvent, CellEventKind, ChannelEventSink, EventSink, InMemoryEventSink, NullEventSink,
};
pub use ledger::{Task, TaskLedger, TaskStatus, TickOutcome};
pub use pipeline::{Product, ProductPipeline, ProductStatus, Stage, StageSpec, StageStatus};
pub use registry::{Fleet, ResourceEntry, ResourceRegistry};
