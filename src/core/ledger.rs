//! Task ledger: every task ever assigned, in creation order.

use serde::Serialize;

use crate::core::allocator::{self, Allocation};
use crate::core::error::{CellError, CellResult};
use crate::core::registry::Fleet;
use crate::util::serde::TaskId;

/// Lifecycle of a task. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Counting down with resources bound.
    InProgress,
    /// Duration reached zero and resources were released.
    Completed,
}

/// One unit of work bound to a set of resources.
#[derive(Debug, Clone, Serialize)]
pub struct Task {
    /// Ledger-assigned identifier.
    pub id: TaskId,
    /// Free-form, non-empty label.
    pub task_type: String,
    /// Seconds left; only [`TaskLedger::tick`] changes it.
    pub remaining: u32,
    /// Current lifecycle state.
    pub status: TaskStatus,
    /// Resources held while in progress.
    pub allocation: Allocation,
}

/// Outcome of one ledger tick.
#[derive(Debug, Clone, Default)]
pub struct TickOutcome {
    /// Tasks that were in progress at the start of the tick.
    pub advanced: usize,
    /// Tasks that reached zero during this tick.
    pub completed: Vec<TaskId>,
}

/// Append-only list of tasks.
#[derive(Debug, Default)]
pub struct TaskLedger {
    tasks: Vec<Task>,
    next_id: TaskId,
}

impl TaskLedger {
    /// Empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new in-progress task bound to `allocation`.
    ///
    /// Counts are not re-checked; the allocator already enforced them.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a blank type or zero duration.
    pub fn create_task(
        &mut self,
        task_type: &str,
        duration: u32,
        allocation: Allocation,
    ) -> CellResult<TaskId> {
        validate_task(task_type, duration)?;
        let id = self.next_id;
        self.next_id += 1;
        self.tasks.push(Task {
            id,
            task_type: task_type.to_string(),
            remaining: duration,
            status: TaskStatus::InProgress,
            allocation,
        });
        Ok(id)
    }

    /// Decrement every in-progress task by one second and release the
    /// resources of those that reach zero.
    pub fn tick(&mut self, fleet: &mut Fleet) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        for task in self
            .tasks
            .iter_mut()
            .filter(|t| t.status == TaskStatus::InProgress)
        {
            outcome.advanced += 1;
            task.remaining = task.remaining.saturating_sub(1);
            if task.remaining > 0 {
                continue;
            }
            task.status = TaskStatus::Completed;
            if let Err(e) = allocator::release(fleet, &task.allocation) {
                tracing::error!(task_id = task.id, error = %e, "failed to release task resources");
            }
            tracing::info!(task_id = task.id, task_type = %task.task_type, "task completed");
            outcome.completed.push(task.id);
        }
        outcome
    }

    /// True iff at least one task has this label and none of them is running.
    ///
    /// Matches on exact label equality, so unrelated tasks sharing a label
    /// are conflated. Stage tracking uses [`TaskLedger::is_completed`] instead.
    #[must_use]
    pub fn all_completed_of_type(&self, task_type: &str) -> bool {
        let mut matching = self.tasks.iter().filter(|t| t.task_type == task_type).peekable();
        matching.peek().is_some() && matching.all(|t| t.status == TaskStatus::Completed)
    }

    /// True when the task exists and has completed.
    #[must_use]
    pub fn is_completed(&self, id: TaskId) -> bool {
        self.get(id)
            .is_some_and(|t| t.status == TaskStatus::Completed)
    }

    /// Look up a task.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        usize::try_from(id).ok().and_then(|idx| self.tasks.get(idx))
    }

    /// All tasks in creation order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Number of tasks still running.
    #[must_use]
    pub fn in_progress(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.status == TaskStatus::InProgress)
            .count()
    }
}

/// Validate the label and duration shared by tasks and stages.
///
/// # Errors
///
/// `InvalidArgument` for a blank label or zero duration.
pub fn validate_task(task_type: &str, duration: u32) -> CellResult<()> {
    if task_type.trim().is_empty() {
        return Err(CellError::invalid("task type cannot be empty"));
    }
    if duration == 0 {
        return Err(CellError::invalid("task duration must be a positive integer"));
    }
    Ok(())
}
