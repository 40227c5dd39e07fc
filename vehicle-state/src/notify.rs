//! Change notification
//!
//! State storage never talks to a transport directly. Instead, every actual
//! transition is described by a `StateChange` and handed to a
//! `ChangeListener`. A transport (CAN or otherwise) drains a `ChangeQueue`
//! at its own pace; tests usually just collect into a `Vec`.

use crate::defs::{Switch, Value};
use crate::state::VehicleState;
use crate::types::Result;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Default number of pending changes a `ChangeQueue` holds
pub const DEFAULT_QUEUE_CAPACITY: usize = 16;

/// A single observed transition of a switch or value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StateChange {
    /// A switch flipped
    Switch { switch: Switch, old: bool, new: bool },
    /// An analog value moved
    Value { value: Value, old: u16, new: u16 },
}

impl StateChange {
    /// Name of the slot that changed
    pub fn slot_name(&self) -> &'static str {
        match self {
            StateChange::Switch { switch, .. } => switch.name(),
            StateChange::Value { value, .. } => value.name(),
        }
    }
}

impl fmt::Display for StateChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateChange::Switch { switch, old, new } => write!(f, "{}: {} -> {}", switch, old, new),
            StateChange::Value { value, old, new } => write!(f, "{}: {} -> {}", value, old, new),
        }
    }
}

/// Receives every transition a `NotifyingState` makes
pub trait ChangeListener {
    /// Called once per actual change, never for a no-op write
    fn on_change(&mut self, change: &StateChange);
}

impl ChangeListener for Vec<StateChange> {
    fn on_change(&mut self, change: &StateChange) {
        self.push(*change);
    }
}

impl<L: ChangeListener + ?Sized> ChangeListener for &mut L {
    fn on_change(&mut self, change: &StateChange) {
        (**self).on_change(change);
    }
}

/// Adapts a closure into a `ChangeListener`
pub struct FnListener<F>(pub F);

impl<F: FnMut(&StateChange)> ChangeListener for FnListener<F> {
    fn on_change(&mut self, change: &StateChange) {
        (self.0)(change);
    }
}

/// Bounded FIFO of changes waiting to be sent
///
/// When full, pushing drops the oldest pending change so the newest state
/// always gets through.
#[derive(Debug, Clone)]
pub struct ChangeQueue {
    pending: VecDeque<StateChange>,
    capacity: usize,
    dropped: usize,
}

impl ChangeQueue {
    /// Create a queue holding at most `capacity` changes (minimum 1)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            pending: VecDeque::with_capacity(capacity),
            capacity,
            dropped: 0,
        }
    }

    /// Enqueue a change, evicting the oldest if the queue is full
    pub fn push(&mut self, change: StateChange) {
        if self.pending.len() == self.capacity {
            if let Some(evicted) = self.pending.pop_front() {
                self.dropped += 1;
                log::warn!("Change queue full, dropping oldest change ({})", evicted);
            }
        }
        self.pending.push_back(change);
    }

    /// Take the oldest pending change
    pub fn pop(&mut self) -> Option<StateChange> {
        self.pending.pop_front()
    }

    /// Take every pending change, oldest first
    pub fn drain(&mut self) -> impl Iterator<Item = StateChange> + '_ {
        self.pending.drain(..)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of changes evicted by overflow since creation
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

impl Default for ChangeQueue {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }
}

impl ChangeListener for ChangeQueue {
    fn on_change(&mut self, change: &StateChange) {
        self.push(*change);
    }
}

/// A `VehicleState` that reports every transition to a listener
pub struct NotifyingState<L> {
    state: VehicleState,
    listener: L,
}

impl<L: ChangeListener> NotifyingState<L> {
    /// Wrap a fresh, zeroed state
    pub fn new(listener: L) -> Self {
        Self::with_state(VehicleState::new(), listener)
    }

    /// Wrap an existing state; its current contents are not reported
    pub fn with_state(state: VehicleState, listener: L) -> Self {
        Self { state, listener }
    }

    /// Set a switch, notifying the listener if it changed
    pub fn set_switch(&mut self, switch: Switch, new_state: bool) -> Option<StateChange> {
        let change = self.state.set_switch(switch, new_state);
        self.notify(change)
    }

    /// Set a value, notifying the listener if it changed
    pub fn set_value(&mut self, value: Value, new_val: u16) -> Option<StateChange> {
        let change = self.state.set_value(value, new_val);
        self.notify(change)
    }

    /// Raw-index form of `set_switch`
    pub fn set_switch_at(&mut self, index: u8, new_state: bool) -> Result<Option<StateChange>> {
        let change = self.state.set_switch_at(index, new_state)?;
        Ok(self.notify(change))
    }

    /// Raw-index form of `set_value`
    pub fn set_value_at(&mut self, index: u8, new_val: u16) -> Result<Option<StateChange>> {
        let change = self.state.set_value_at(index, new_val)?;
        Ok(self.notify(change))
    }

    /// Set a switch without notifying
    ///
    /// For updates that arrived from the bus: echoing them back would only
    /// produce redundant traffic.
    pub fn sync_switch(&mut self, switch: Switch, new_state: bool) -> Option<StateChange> {
        self.state.set_switch(switch, new_state)
    }

    /// Set a value without notifying
    pub fn sync_value(&mut self, value: Value, new_val: u16) -> Option<StateChange> {
        self.state.set_value(value, new_val)
    }

    /// Raw-index form of `sync_switch`, for indices taken straight off the bus
    pub fn sync_switch_at(&mut self, index: u8, new_state: bool) -> Result<Option<StateChange>> {
        self.state.set_switch_at(index, new_state)
    }

    /// Raw-index form of `sync_value`
    pub fn sync_value_at(&mut self, index: u8, new_val: u16) -> Result<Option<StateChange>> {
        self.state.set_value_at(index, new_val)
    }

    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    pub fn into_parts(self) -> (VehicleState, L) {
        (self.state, self.listener)
    }

    fn notify(&mut self, change: Option<StateChange>) -> Option<StateChange> {
        if let Some(change) = &change {
            self.listener.on_change(change);
        }
        change
    }
}
