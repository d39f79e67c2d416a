//! Cell event sinks.
//!
//! Every state transition worth telling an operator about is emitted as a
//! [`CellEvent`]. Sinks are called while the cell lock is held, so they must
//! not block.

use std::collections::VecDeque;
use std::sync::Arc;

use crossbeam_channel::Sender;
use parking_lot::Mutex;
use serde::Serialize;

use crate::util::clock::now_ms;
use crate::util::serde::{ProductId, ResourceKind, TaskId};

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CellEventKind {
    /// A robot or worker joined the fleet.
    ResourceAdded {
        /// Resource family.
        kind: ResourceKind,
        /// Resource id.
        id: String,
    },
    /// A robot or worker left the fleet.
    ResourceRemoved {
        /// Resource family.
        kind: ResourceKind,
        /// Resource id.
        id: String,
    },
    /// A task was allocated and started.
    TaskAssigned {
        /// Task id.
        task_id: TaskId,
        /// Task label.
        task_type: String,
        /// Initial duration in seconds.
        duration: u32,
    },
    /// A task finished and released its resources.
    TaskCompleted {
        /// Task id.
        task_id: TaskId,
        /// Task label.
        task_type: String,
    },
    /// A product was queued for assembly.
    ProductDefined {
        /// Product id.
        product_id: ProductId,
        /// Product name.
        name: String,
        /// Number of stages.
        stages: usize,
    },
    /// A product stage obtained resources and spawned its task.
    StageStarted {
        /// Product id.
        product_id: ProductId,
        /// Zero-based stage index.
        stage: usize,
        /// Spawned task.
        task_id: TaskId,
    },
    /// A product stage's task completed.
    StageCompleted {
        /// Product id.
        product_id: ProductId,
        /// Zero-based stage index.
        stage: usize,
    },
    /// Every stage of a product completed.
    ProductCompleted {
        /// Product id.
        product_id: ProductId,
        /// Product name.
        name: String,
    },
}

/// Event envelope.
#[derive(Debug, Clone, Serialize)]
pub struct CellEvent {
    /// Event identifier.
    pub event_id: String,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
    /// Event body.
    pub kind: CellEventKind,
}

impl CellEvent {
    /// Stamp `kind` with a fresh id and the current time.
    #[must_use]
    pub fn new(kind: CellEventKind) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            created_at_ms: now_ms(),
            kind,
        }
    }
}

/// Event sink abstraction.
pub trait EventSink: Send {
    /// Record an event.
    fn record(&mut self, event: CellEvent);
}

/// Bounded in-memory sink. Clones share the same buffer.
#[derive(Clone)]
pub struct InMemoryEventSink {
    events: Arc<Mutex<VecDeque<CellEvent>>>,
    max_events: usize,
}

impl InMemoryEventSink {
    /// Create a sink that keeps the newest `max_events` events.
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(max_events))),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    #[must_use]
    pub fn events(&self) -> Vec<CellEvent> {
        self.events.lock().iter().cloned().collect()
    }

    /// Event bodies only, oldest first.
    #[must_use]
    pub fn kinds(&self) -> Vec<CellEventKind> {
        self.events.lock().iter().map(|e| e.kind.clone()).collect()
    }
}

impl EventSink for InMemoryEventSink {
    fn record(&mut self, event: CellEvent) {
        let mut events = self.events.lock();
        if events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(event);
    }
}

/// Forwards events over an unbounded channel.
pub struct ChannelEventSink {
    tx: Sender<CellEvent>,
}

impl ChannelEventSink {
    /// Wrap a sender. A disconnected receiver silently drops events.
    #[must_use]
    pub const fn new(tx: Sender<CellEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn record(&mut self, event: CellEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("event receiver dropped");
        }
    }
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn record(&mut self, _event: CellEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn added(id: &str) -> CellEvent {
        CellEvent::new(CellEventKind::ResourceAdded {
            kind: ResourceKind::Robot,
            id: id.into(),
        })
    }

    #[test]
    fn test_in_memory_sink_overflow() {
        let sink = InMemoryEventSink::new(2);
        let mut writer = sink.clone();
        writer.record(added("a"));
        writer.record(added("b"));
        writer.record(added("c"));

        let kinds = sink.kinds();
        assert_eq!(kinds.len(), 2);
        assert_eq!(
            kinds[0],
            CellEventKind::ResourceAdded {
                kind: ResourceKind::Robot,
                id: "b".into()
            }
        );
    }

    #[test]
    fn test_channel_sink_forwards() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut sink = ChannelEventSink::new(tx);
        sink.record(added("r1"));
        let event = rx.try_recv().unwrap();
        assert!(!event.event_id.is_empty());
        assert!(event.created_at_ms > 0);
    }

    #[test]
    fn test_channel_sink_survives_dropped_receiver() {
        let (tx, rx) = crossbeam_channel::unbounded();
        drop(rx);
        let mut sink = ChannelEventSink::new(tx);
        sink.record(added("r1"));
    }

    #[test]
    fn test_event_serializes_with_action_tag() {
        let json = serde_json::to_value(added("r1")).unwrap();
        assert_eq!(json["kind"]["action"], "resource_added");
        assert_eq!(json["kind"]["kind"], "robot");
    }
}
