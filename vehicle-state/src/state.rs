//! Vehicle state holder
//!
//! `VehicleState` is the current snapshot of every switch and analog value.
//! All writes go through the setters, which only touch the array when the
//! new value differs from the stored one and report the transition when they
//! do.

use crate::defs::{Switch, Value, SW_COUNT, VAL_COUNT};
use crate::notify::StateChange;
use crate::types::Result;

/// Snapshot of all vehicle switches and analog values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleState {
    /// Switch states, indexed by `Switch`
    switches: [bool; SW_COUNT],
    /// Analog values, indexed by `Value`
    values: [u16; VAL_COUNT],
}

impl VehicleState {
    /// Create a state with every switch off and every value zero
    ///
    /// This is a `const fn` so a single instance can live in a `static` on
    /// the device.
    pub const fn new() -> Self {
        Self {
            switches: [false; SW_COUNT],
            values: [0; VAL_COUNT],
        }
    }

    /// Set the state of a switch
    ///
    /// Returns the transition if the stored state changed, `None` if it
    /// already held `new_state`.
    pub fn set_switch(&mut self, switch: Switch, new_state: bool) -> Option<StateChange> {
        let slot = &mut self.switches[switch.index()];
        if *slot == new_state {
            return None;
        }
        let old = *slot;
        *slot = new_state;
        log::trace!("Switch {} changed: {} -> {}", switch, old, new_state);
        Some(StateChange::Switch {
            switch,
            old,
            new: new_state,
        })
    }

    /// Set an analog value
    ///
    /// Returns the transition if the stored value changed, `None` if it
    /// already held `new_val`.
    pub fn set_value(&mut self, value: Value, new_val: u16) -> Option<StateChange> {
        let slot = &mut self.values[value.index()];
        if *slot == new_val {
            return None;
        }
        let old = *slot;
        *slot = new_val;
        log::trace!("Value {} changed: {} -> {}", value, old, new_val);
        Some(StateChange::Value {
            value,
            old,
            new: new_val,
        })
    }

    /// Set a switch by raw slot index
    ///
    /// Fails without touching the state if `index` is not a switch slot.
    pub fn set_switch_at(&mut self, index: u8, new_state: bool) -> Result<Option<StateChange>> {
        let switch = Switch::try_from(index)?;
        Ok(self.set_switch(switch, new_state))
    }

    /// Set an analog value by raw slot index
    ///
    /// Fails without touching the state if `index` is not a value slot.
    pub fn set_value_at(&mut self, index: u8, new_val: u16) -> Result<Option<StateChange>> {
        let value = Value::try_from(index)?;
        Ok(self.set_value(value, new_val))
    }

    /// Re-apply a recorded change, returning the resulting transition (if any)
    ///
    /// Only the `new` side of the record matters; the current stored state is
    /// what the guard compares against.
    pub fn apply(&mut self, change: &StateChange) -> Option<StateChange> {
        match *change {
            StateChange::Switch { switch, new, .. } => self.set_switch(switch, new),
            StateChange::Value { value, new, .. } => self.set_value(value, new),
        }
    }

    /// Current state of a switch
    pub fn switch(&self, switch: Switch) -> bool {
        self.switches[switch.index()]
    }

    /// Current analog value
    pub fn value(&self, value: Value) -> u16 {
        self.values[value.index()]
    }

    /// Current state of a switch by raw slot index
    pub fn switch_at(&self, index: u8) -> Result<bool> {
        Switch::try_from(index).map(|switch| self.switch(switch))
    }

    /// Current analog value by raw slot index
    pub fn value_at(&self, index: u8) -> Result<u16> {
        Value::try_from(index).map(|value| self.value(value))
    }

    /// All switch states in slot order
    pub fn switches(&self) -> &[bool; SW_COUNT] {
        &self.switches
    }

    /// All analog values in slot order
    pub fn values(&self) -> &[u16; VAL_COUNT] {
        &self.values
    }
}

impl Default for VehicleState {
    fn default() -> Self {
        Self::new()
    }
}
