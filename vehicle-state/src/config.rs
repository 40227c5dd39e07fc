//! State configuration types
//!
//! A `StateConfig` presets slots that should not start at zero (a bench
//! setup with the ignition on, a nominal battery voltage, ...) and sizes the
//! outbound change queue. It deserializes from any serde format; the CLI
//! reads it from TOML.

use crate::defs::{Switch, Value};
use crate::notify::{ChangeQueue, DEFAULT_QUEUE_CAPACITY};
use crate::state::VehicleState;
use crate::types::{Result, VehicleError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Initial state presets and queue sizing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateConfig {
    /// Switches to preset, by name
    #[serde(default)]
    pub switches: BTreeMap<Switch, bool>,

    /// Values to preset, by name
    #[serde(default)]
    pub values: BTreeMap<Value, u16>,

    /// Maximum number of pending outbound changes (default: 16)
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            switches: BTreeMap::new(),
            values: BTreeMap::new(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl StateConfig {
    /// Create an empty configuration: everything off, default queue size
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: preset a switch
    pub fn with_switch(mut self, switch: Switch, state: bool) -> Self {
        self.switches.insert(switch, state);
        self
    }

    /// Builder method: preset a value
    pub fn with_value(mut self, value: Value, val: u16) -> Self {
        self.values.insert(value, val);
        self
    }

    /// Builder method: set the change queue capacity
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Build a state with all presets applied
    pub fn build_state(&self) -> VehicleState {
        let mut state = VehicleState::new();
        for (&switch, &on) in &self.switches {
            state.set_switch(switch, on);
        }
        for (&value, &val) in &self.values {
            state.set_value(value, val);
        }
        log::debug!(
            "Built initial state with {} switch and {} value presets",
            self.switches.len(),
            self.values.len()
        );
        state
    }

    /// Build an empty change queue of the configured size
    pub fn build_queue(&self) -> Result<ChangeQueue> {
        if self.queue_capacity == 0 {
            return Err(VehicleError::InvalidConfig(
                "queue_capacity must be at least 1".to_string(),
            ));
        }
        Ok(ChangeQueue::with_capacity(self.queue_capacity))
    }
}
