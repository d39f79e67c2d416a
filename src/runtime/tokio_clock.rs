//! Progress clock driven by a tokio interval.
//!
//! Same contract as [`crate::core::ProgressClock`] for callers that already
//! live inside a tokio runtime: a late tick delays the schedule instead of
//! bursting to catch up, and stopping is immediate.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::core::RoboticCell;

/// Handle to a clock task spawned with [`spawn_async_clock`].
pub struct AsyncClockHandle {
    stop_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl AsyncClockHandle {
    /// Signal the task and wait for it to finish.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        if let Err(e) = self.join.await {
            tracing::warn!(error = %e, "async clock task failed");
        }
    }
}

/// Tick `cell` every `period` on the current tokio runtime.
///
/// The first tick fires one full period after the call.
///
/// # Panics
///
/// Panics if called outside a tokio runtime.
#[must_use]
pub fn spawn_async_clock(cell: Arc<RoboticCell>, period: Duration) -> AsyncClockHandle {
    let (stop_tx, mut stop_rx) = watch::channel(false);
    let join = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        interval.tick().await;
        tracing::info!(period_ms = period.as_millis(), "async clock started");

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    cell.tick();
                }
                changed = stop_rx.changed() => {
                    if changed.is_err() || *stop_rx.borrow() {
                        break;
                    }
                }
            }
        }
        tracing::info!("async clock stopped");
    });
    AsyncClockHandle { stop_tx, join }
}
