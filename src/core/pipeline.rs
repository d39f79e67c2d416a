//! Multi-stage products advanced one stage at a time.
//!
//! Each stage remembers the id of the task it spawned, so completion is
//! detected per task rather than by label across the whole ledger.

use serde::{Deserialize, Serialize};

use crate::core::allocator::{self, ensure_idle};
use crate::core::error::{CellError, CellResult};
use crate::core::events::CellEventKind;
use crate::core::ledger::{validate_task, TaskLedger};
use crate::core::registry::Fleet;
use crate::util::serde::{ProductId, ResourceKind, TaskId};

/// Parameters of one stage, as supplied at definition time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSpec {
    /// Label given to the spawned task.
    pub task_type: String,
    /// Robots the stage needs.
    pub robots: usize,
    /// Workers the stage needs.
    pub workers: usize,
    /// Task duration in seconds.
    pub duration: u32,
}

impl StageSpec {
    /// Build a stage spec.
    pub fn new(task_type: impl Into<String>, robots: usize, workers: usize, duration: u32) -> Self {
        Self {
            task_type: task_type.into(),
            robots,
            workers,
            duration,
        }
    }

    /// Reject blank labels and zero durations.
    ///
    /// # Errors
    ///
    /// `InvalidArgument`.
    pub fn validate(&self) -> CellResult<()> {
        validate_task(&self.task_type, self.duration)
    }

    /// Soft check that the fleet has enough idle units right now.
    ///
    /// Nothing is reserved; by the time the stage runs the resources may be
    /// busy elsewhere, in which case the stage waits.
    ///
    /// # Errors
    ///
    /// `InsufficientResources`.
    pub fn check_idle(&self, fleet: &Fleet) -> CellResult<()> {
        ensure_idle(fleet, ResourceKind::Robot, self.robots)?;
        ensure_idle(fleet, ResourceKind::Worker, self.workers)
    }
}

/// Lifecycle of a stage. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// Waiting for resources.
    Pending,
    /// Its task is running.
    InProgress,
    /// Its task finished.
    Completed,
}

/// A stage inside a product.
#[derive(Debug, Clone, Serialize)]
pub struct Stage {
    /// Definition parameters.
    pub spec: StageSpec,
    /// Current state.
    pub status: StageStatus,
    /// Task spawned once the stage started.
    pub task_id: Option<TaskId>,
}

/// Lifecycle of a product. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    /// Some stage has not completed yet.
    InProgress,
    /// Every stage completed.
    Completed,
}

/// A named assembly job.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    /// Pipeline-assigned identifier.
    pub id: ProductId,
    /// Display name; not required to be unique.
    pub name: String,
    /// Ordered stages.
    pub stages: Vec<Stage>,
    /// Index of the active stage, or `stages.len()` once done.
    pub current_stage: usize,
    /// Overall state.
    pub status: ProductStatus,
}

/// Every defined product in definition order.
#[derive(Debug, Default)]
pub struct ProductPipeline {
    products: Vec<Product>,
    next_id: ProductId,
}

impl ProductPipeline {
    /// Empty pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a product whose stages start in order on later ticks.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a blank name, no stages, or an invalid stage.
    pub fn define_product(&mut self, name: &str, stages: Vec<StageSpec>) -> CellResult<ProductId> {
        if name.trim().is_empty() {
            return Err(CellError::invalid("product name cannot be empty"));
        }
        if stages.is_empty() {
            return Err(CellError::invalid(
                "the number of assembly steps must be greater than zero",
            ));
        }
        for spec in &stages {
            spec.validate()?;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.products.push(Product {
            id,
            name: name.to_string(),
            stages: stages
                .into_iter()
                .map(|spec| Stage {
                    spec,
                    status: StageStatus::Pending,
                    task_id: None,
                })
                .collect(),
            current_stage: 0,
            status: ProductStatus::InProgress,
        });
        Ok(id)
    }

    /// Move every in-progress product forward as far as it can go this tick.
    ///
    /// Must run after [`TaskLedger::tick`] so tasks finished this tick are
    /// seen. A pending stage that cannot be allocated stays pending and is
    /// retried on the next call. A stage that completes lets the next stage
    /// try to start in the same call.
    pub fn advance(&mut self, fleet: &mut Fleet, ledger: &mut TaskLedger) -> Vec<CellEventKind> {
        let mut transitions = Vec::new();
        for product in self
            .products
            .iter_mut()
            .filter(|p| p.status == ProductStatus::InProgress)
        {
            advance_product(product, fleet, ledger, &mut transitions);
        }
        transitions
    }

    /// Look up a product.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        usize::try_from(id).ok().and_then(|idx| self.products.get(idx))
    }

    /// All products in definition order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

fn advance_product(
    product: &mut Product,
    fleet: &mut Fleet,
    ledger: &mut TaskLedger,
    transitions: &mut Vec<CellEventKind>,
) {
    while product.current_stage < product.stages.len() {
        let idx = product.current_stage;
        let stage = &mut product.stages[idx];
        match stage.status {
            StageStatus::Pending => {
                let Some(task_id) = start_stage(product.id, idx, stage, fleet, ledger) else {
                    return;
                };
                transitions.push(CellEventKind::TaskAssigned {
                    task_id,
                    task_type: stage.spec.task_type.clone(),
                    duration: stage.spec.duration,
                });
                transitions.push(CellEventKind::StageStarted {
                    product_id: product.id,
                    stage: idx,
                    task_id,
                });
            }
            StageStatus::InProgress => {
                if !stage.task_id.is_some_and(|id| ledger.is_completed(id)) {
                    return;
                }
                stage.status = StageStatus::Completed;
                product.current_stage += 1;
                tracing::info!(product_id = product.id, stage = idx, "stage completed");
                transitions.push(CellEventKind::StageCompleted {
                    product_id: product.id,
                    stage: idx,
                });
            }
            StageStatus::Completed => product.current_stage += 1,
        }
    }

    product.status = ProductStatus::Completed;
    tracing::info!(product_id = product.id, name = %product.name, "product fully assembled");
    transitions.push(CellEventKind::ProductCompleted {
        product_id: product.id,
        name: product.name.clone(),
    });
}

fn start_stage(
    product_id: ProductId,
    idx: usize,
    stage: &mut Stage,
    fleet: &mut Fleet,
    ledger: &mut TaskLedger,
) -> Option<TaskId> {
    let spec = &stage.spec;
    let allocation = match allocator::try_allocate(fleet, spec.robots, spec.workers) {
        Ok(allocation) => allocation,
        Err(e) => {
            tracing::debug!(product_id, stage = idx, reason = %e, "stage waiting for resources");
            return None;
        }
    };

    match ledger.create_task(&spec.task_type, spec.duration, allocation.clone()) {
        Ok(task_id) => {
            stage.status = StageStatus::InProgress;
            stage.task_id = Some(task_id);
            tracing::info!(product_id, stage = idx, task_id, "stage started");
            Some(task_id)
        }
        Err(e) => {
            tracing::error!(product_id, stage = idx, error = %e, "stage task rejected");
            if let Err(e) = allocator::release(fleet, &allocation) {
                tracing::error!(error = %e, "failed to release stage resources");
            }
            None
        }
    }
}
