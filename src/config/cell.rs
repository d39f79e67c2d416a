//! Cell configuration: clock period, event buffer and initial fleet.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::AppResult;

/// Environment variable naming a JSON config file.
pub const CONFIG_PATH_ENV: &str = "ROBOTIC_CELL_CONFIG";
/// Environment variable overriding [`CellConfig::tick_interval_ms`].
pub const TICK_MS_ENV: &str = "ROBOTIC_CELL_TICK_MS";

const fn default_tick_interval_ms() -> u64 {
    1000
}

const fn default_event_buffer() -> usize {
    256
}

/// Root cell configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellConfig {
    /// Progress clock period in milliseconds. One tick is one task second.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Events kept by in-memory sinks.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
    /// Robots registered at startup.
    #[serde(default)]
    pub robots: Vec<String>,
    /// Workers registered at startup.
    #[serde(default)]
    pub workers: Vec<String>,
}

impl Default for CellConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            event_buffer: default_event_buffer(),
            robots: Vec::new(),
            workers: Vec::new(),
        }
    }
}

impl CellConfig {
    /// Clock period as a `Duration`.
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// A message naming the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.tick_interval_ms == 0 {
            return Err("tick_interval_ms must be greater than 0".into());
        }
        if self.event_buffer == 0 {
            return Err("event_buffer must be greater than 0".into());
        }
        validate_ids("robots", &self.robots)?;
        validate_ids("workers", &self.workers)
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Parse or validation failure.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load configuration from the environment.
    ///
    /// Reads `.env` if present, then the JSON file named by
    /// `ROBOTIC_CELL_CONFIG` (defaults when unset), then applies
    /// `ROBOTIC_CELL_TICK_MS`.
    ///
    /// # Errors
    ///
    /// Unreadable file, parse failure, bad override or invalid result.
    pub fn from_env() -> AppResult<Self> {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!(error = %e, "no .env loaded");
        }

        let mut cfg = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        if let Ok(raw) = std::env::var(TICK_MS_ENV) {
            cfg.tick_interval_ms = raw
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("{TICK_MS_ENV}={raw:?}: {e}"))?;
        }
        cfg.validate().map_err(anyhow::Error::msg)?;
        Ok(cfg)
    }

    /// Read and validate a JSON config file.
    ///
    /// # Errors
    ///
    /// Unreadable file, parse failure or invalid values.
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading {}: {e}", path.display()))?;
        Self::from_json_str(&raw).map_err(|e| anyhow::anyhow!("{}: {e}", path.display()))
    }
}

fn validate_ids(field: &str, ids: &[String]) -> Result<(), String> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.trim().is_empty() {
            return Err(format!("{field} contains a blank id"));
        }
        if !seen.insert(id.as_str()) {
            return Err(format!("{field} contains duplicate id `{id}`"));
        }
    }
    Ok(())
}
