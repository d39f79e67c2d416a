//! The robotic cell: fleet, ledger and pipeline behind one lock.
//!
//! Every public operation takes the lock once, does its work and releases it
//! on every exit path. Nothing here waits on a human; callers that need a
//! confirmation ask for it between [`RoboticCell::check_removal`] and
//! [`RoboticCell::remove_resource`].

use parking_lot::Mutex;
use serde::Serialize;

use crate::core::allocator::{self, Allocation};
use crate::core::error::CellResult;
use crate::core::events::{CellEvent, CellEventKind, EventSink, NullEventSink};
use crate::core::ledger::{validate_task, Task, TaskLedger};
use crate::core::pipeline::{Product, ProductPipeline, ProductStatus, StageSpec};
use crate::core::registry::{Fleet, ResourceEntry};
use crate::util::serde::{ProductId, ResourceKind, TaskId};

struct CellState {
    fleet: Fleet,
    ledger: TaskLedger,
    pipeline: ProductPipeline,
    ticks: u64,
    sink: Box<dyn EventSink>,
}

impl CellState {
    fn emit(&mut self, kind: CellEventKind) {
        self.sink.record(CellEvent::new(kind));
    }
}

/// Summary of one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// One-based tick number.
    pub tick: u64,
    /// Tasks that finished during this tick.
    pub completed_tasks: Vec<TaskId>,
    /// Products that finished during this tick.
    pub completed_products: Vec<ProductId>,
}

/// Product line in a [`StatusReport`].
#[derive(Debug, Clone, Serialize)]
pub struct ProductSummary {
    /// Product id.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Overall state.
    pub status: ProductStatus,
    /// Active stage index.
    pub current_stage: usize,
    /// Number of stages.
    pub stage_count: usize,
}

/// Consistent point-in-time view of the whole cell.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    /// Ticks processed so far.
    pub ticks: u64,
    /// Robots in insertion order.
    pub robots: Vec<ResourceEntry>,
    /// Workers in insertion order.
    pub workers: Vec<ResourceEntry>,
    /// Every task in creation order.
    pub tasks: Vec<Task>,
    /// Every product in definition order.
    pub products: Vec<ProductSummary>,
}

/// Shared cell state. Wrap in an `Arc` to share with a [`crate::core::ProgressClock`].
pub struct RoboticCell {
    state: Mutex<CellState>,
}

impl Default for RoboticCell {
    fn default() -> Self {
        Self::new()
    }
}

impl RoboticCell {
    /// Empty cell that discards events.
    #[must_use]
    pub fn new() -> Self {
        Self::with_event_sink(Box::new(NullEventSink))
    }

    /// Empty cell reporting transitions to `sink`.
    #[must_use]
    pub fn with_event_sink(sink: Box<dyn EventSink>) -> Self {
        Self {
            state: Mutex::new(CellState {
                fleet: Fleet::new(),
                ledger: TaskLedger::new(),
                pipeline: ProductPipeline::new(),
                ticks: 0,
                sink,
            }),
        }
    }

    /// Register an idle robot or worker.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a blank id, `DuplicateId` if already registered.
    pub fn add_resource(&self, kind: ResourceKind, id: &str) -> CellResult<()> {
        let mut state = self.state.lock();
        if let Err(e) = state.fleet.registry_mut(kind).add(id) {
            tracing::warn!(%kind, id, error = %e, "add rejected");
            return Err(e);
        }
        tracing::info!(%kind, id, "resource added");
        state.emit(CellEventKind::ResourceAdded {
            kind,
            id: id.to_string(),
        });
        Ok(())
    }

    /// Decide whether a resource could be removed now. Mutates nothing.
    ///
    /// # Errors
    ///
    /// `InvalidArgument`, `NotFound` or `Busy`.
    pub fn check_removal(&self, kind: ResourceKind, id: &str) -> CellResult<()> {
        self.state.lock().fleet.registry(kind).check_removal(id)
    }

    /// Remove an idle resource. The check is repeated under the lock because
    /// the resource may have been bound since [`RoboticCell::check_removal`].
    ///
    /// # Errors
    ///
    /// `InvalidArgument`, `NotFound` or `Busy`; nothing changes on error.
    pub fn remove_resource(&self, kind: ResourceKind, id: &str) -> CellResult<()> {
        let mut state = self.state.lock();
        if let Err(e) = state.fleet.registry_mut(kind).remove(id) {
            tracing::warn!(%kind, id, error = %e, "remove rejected");
            return Err(e);
        }
        tracing::info!(%kind, id, "resource removed");
        state.emit(CellEventKind::ResourceRemoved {
            kind,
            id: id.to_string(),
        });
        Ok(())
    }

    /// Allocate idle resources and start an ad-hoc task.
    ///
    /// A request that cannot be satisfied is dropped, not queued.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a blank type or zero duration,
    /// `InsufficientResources` when too few units are idle.
    pub fn assign_task(
        &self,
        task_type: &str,
        robots: usize,
        workers: usize,
        duration: u32,
    ) -> CellResult<TaskId> {
        validate_task(task_type, duration)?;
        let mut state = self.state.lock();
        let allocation = match allocator::try_allocate(&mut state.fleet, robots, workers) {
            Ok(allocation) => allocation,
            Err(e) => {
                tracing::warn!(task_type, robots, workers, error = %e, "task not assigned");
                return Err(e);
            }
        };
        let task_id = state.ledger.create_task(task_type, duration, allocation)?;
        tracing::info!(task_id, task_type, duration, "task assigned");
        state.emit(CellEventKind::TaskAssigned {
            task_id,
            task_type: task_type.to_string(),
            duration,
        });
        Ok(task_id)
    }

    /// Queue a multi-stage product.
    ///
    /// Every stage is checked against the resources idle right now. This is
    /// not a reservation: a stage that later finds its resources busy waits.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a blank name, no stages or an invalid stage;
    /// `InsufficientResources` when a stage asks for more than is idle.
    pub fn define_product(&self, name: &str, stages: Vec<StageSpec>) -> CellResult<ProductId> {
        let mut state = self.state.lock();
        for spec in &stages {
            spec.validate()?;
            spec.check_idle(&state.fleet)?;
        }
        let stage_count = stages.len();
        let product_id = state.pipeline.define_product(name, stages)?;
        tracing::info!(product_id, name, stages = stage_count, "product queued for assembly");
        state.emit(CellEventKind::ProductDefined {
            product_id,
            name: name.to_string(),
            stages: stage_count,
        });
        Ok(product_id)
    }

    /// Advance time by one unit: count down tasks, then move products along.
    pub fn tick(&self) -> TickReport {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.ticks += 1;

        let outcome = state.ledger.tick(&mut state.fleet);
        let transitions = state.pipeline.advance(&mut state.fleet, &mut state.ledger);

        let mut report = TickReport {
            tick: state.ticks,
            completed_tasks: outcome.completed,
            completed_products: Vec::new(),
        };
        for &task_id in &report.completed_tasks {
            let task_type = state
                .ledger
                .get(task_id)
                .map(|t| t.task_type.clone())
                .unwrap_or_default();
            state.emit(CellEventKind::TaskCompleted { task_id, task_type });
        }
        for transition in transitions {
            if let CellEventKind::ProductCompleted { product_id, .. } = &transition {
                report.completed_products.push(*product_id);
            }
            state.emit(transition);
        }
        tracing::debug!(
            tick = state.ticks,
            advanced = outcome.advanced,
            completed = report.completed_tasks.len(),
            "tick processed"
        );
        report
    }

    /// Consistent view of everything, taken under one lock acquisition.
    #[must_use]
    pub fn status(&self) -> StatusReport {
        let state = self.state.lock();
        StatusReport {
            ticks: state.ticks,
            robots: state.fleet.robots().snapshot(),
            workers: state.fleet.workers().snapshot(),
            tasks: state.ledger.tasks().to_vec(),
            products: state
                .pipeline
                .products()
                .iter()
                .map(|p| ProductSummary {
                    id: p.id,
                    name: p.name.clone(),
                    status: p.status,
                    current_stage: p.current_stage,
                    stage_count: p.stages.len(),
                })
                .collect(),
        }
    }

    /// Id to status mapping for one kind, in insertion order.
    #[must_use]
    pub fn snapshot(&self, kind: ResourceKind) -> Vec<ResourceEntry> {
        self.state.lock().fleet.registry(kind).snapshot()
    }

    /// Number of idle resources of `kind`.
    #[must_use]
    pub fn idle_count(&self, kind: ResourceKind) -> usize {
        self.state.lock().fleet.registry(kind).idle_count()
    }

    /// Copy of one task.
    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<Task> {
        self.state.lock().ledger.get(id).cloned()
    }

    /// Copy of one product.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<Product> {
        self.state.lock().pipeline.get(id).cloned()
    }

    /// See [`TaskLedger::all_completed_of_type`].
    #[must_use]
    pub fn all_completed_of_type(&self, task_type: &str) -> bool {
        self.state.lock().ledger.all_completed_of_type(task_type)
    }

    /// Allocation currently held by a task, if it is still running.
    #[must_use]
    pub fn bound_resources(&self, id: TaskId) -> Option<Allocation> {
        self.task(id)
            .filter(|t| t.status == crate::core::ledger::TaskStatus::InProgress)
            .map(|t| t.allocation)
    }

    /// Ticks processed so far.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.state.lock().ticks
    }
}
