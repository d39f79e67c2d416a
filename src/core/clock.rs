//! Progress clock on a dedicated OS thread.
//!
//! The thread ticks the cell, then waits one interval on a stop channel.
//! A tick that overruns simply delays the next one; there is no catch-up.
//! Dropping the sender wakes the thread immediately, so shutdown never waits
//! for a full interval.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::core::cell::RoboticCell;

/// Handle to a running clock thread.
pub struct ProgressClock {
    stop_tx: Mutex<Option<Sender<()>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
    stopped: AtomicBool,
}

impl ProgressClock {
    /// Start ticking `cell` every `interval`.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub fn spawn(cell: Arc<RoboticCell>, interval: Duration) -> std::io::Result<Self> {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let handle = thread::Builder::new()
            .name("cell-clock".into())
            .spawn(move || run(&cell, interval, &stop_rx))?;

        info!(interval_ms = interval.as_millis(), "progress clock started");
        Ok(Self {
            stop_tx: Mutex::new(Some(stop_tx)),
            handle: Mutex::new(Some(handle)),
            stopped: AtomicBool::new(false),
        })
    }

    /// True until [`ProgressClock::stop`] has been called.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.stopped.load(Ordering::Acquire)
    }

    /// Stop the clock and wait for the thread to exit. Idempotent.
    ///
    /// A tick already in progress finishes first.
    pub fn stop(&self) {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return;
        }
        self.stop_tx.lock().take();

        if let Some(handle) = self.handle.lock().take() {
            if handle.join().is_err() {
                warn!("progress clock thread panicked");
            }
        }
        info!("progress clock stopped");
    }
}

impl Drop for ProgressClock {
    fn drop(&mut self) {
        // Signal only; the thread exits on its own once the sender is gone.
        if !self.stopped.swap(true, Ordering::AcqRel) {
            self.stop_tx.lock().take();
            debug!("progress clock dropped without explicit stop");
        }
    }
}

fn run(cell: &RoboticCell, interval: Duration, stop_rx: &Receiver<()>) {
    debug!("clock thread started");
    loop {
        match stop_rx.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {
                cell.tick();
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    debug!("clock thread exiting");
}
