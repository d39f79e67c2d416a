//! Build a [`RoboticCell`] from a [`CellConfig`].

use std::sync::Arc;

use crate::config::CellConfig;
use crate::core::{AppResult, CellError, EventSink, InMemoryEventSink, ProgressClock, RoboticCell};
use crate::util::serde::ResourceKind;

/// Fluent builder seeding the fleet from configuration.
pub struct CellBuilder {
    config: CellConfig,
    sink: Option<Box<dyn EventSink>>,
}

impl CellBuilder {
    /// Start from a configuration.
    #[must_use]
    pub const fn new(config: CellConfig) -> Self {
        Self { config, sink: None }
    }

    /// Configuration the cell will be built from.
    #[must_use]
    pub const fn config(&self) -> &CellConfig {
        &self.config
    }

    /// Report cell events to `sink`.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Box<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Record events in memory, keeping the newest `event_buffer` of them.
    ///
    /// The returned handle shares its buffer with the sink given to the cell.
    #[must_use]
    pub fn with_memory_events(mut self) -> (Self, InMemoryEventSink) {
        let sink = InMemoryEventSink::new(self.config.event_buffer);
        self.sink = Some(Box::new(sink.clone()));
        (self, sink)
    }

    /// Validate the configuration and register the initial fleet.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the configuration does not validate.
    pub fn build(self) -> Result<RoboticCell, CellError> {
        self.config
            .validate()
            .map_err(|e| CellError::invalid(format!("config invalid: {e}")))?;

        let cell = match self.sink {
            Some(sink) => RoboticCell::with_event_sink(sink),
            None => RoboticCell::new(),
        };
        for id in &self.config.robots {
            cell.add_resource(ResourceKind::Robot, id)?;
        }
        for id in &self.config.workers {
            cell.add_resource(ResourceKind::Worker, id)?;
        }
        Ok(cell)
    }

    /// Build the cell and start a progress clock at the configured interval.
    ///
    /// # Errors
    ///
    /// Invalid configuration or failure to spawn the clock thread.
    pub fn start(self) -> AppResult<(Arc<RoboticCell>, ProgressClock)> {
        let interval = self.config.tick_interval();
        let cell = Arc::new(self.build()?);
        let clock = ProgressClock::spawn(Arc::clone(&cell), interval)?;
        Ok((cell, clock))
    }
}
