//! Vehicle State Library
//!
//! An in-memory holder for a vehicle's digital switches and analog values,
//! small enough to live in a `static` on a microcontroller.
//!
//! # Architecture
//!
//! - `VehicleState` stores one `bool` per `Switch` and one `u16` per `Value`
//! - Setters only write when the new value differs, and return the
//!   transition as a `StateChange`
//! - `NotifyingState` forwards each transition to a `ChangeListener`, such as
//!   a bounded `ChangeQueue` that a bus transport drains
//!
//! The library does NOT:
//! - Encode or decode CAN frames
//! - Talk to any bus or peripheral
//! - Synchronize access between execution contexts
//!
//! # Example Usage
//!
//! ```
//! use vehicle_state::{ChangeQueue, NotifyingState, Switch, Value};
//!
//! let mut state = NotifyingState::new(ChangeQueue::default());
//! state.set_switch(Switch::Headlights, true);
//! state.set_value(Value::EngineRpm, 850);
//! state.set_value(Value::EngineRpm, 850); // unchanged, not queued
//!
//! let queue = state.listener_mut();
//! assert_eq!(queue.len(), 2);
//! while let Some(change) = queue.pop() {
//!     println!("{}", change);
//! }
//! ```

// Public modules
pub mod config;
pub mod defs;
pub mod notify;
pub mod state;
pub mod types;

// Re-export main types for convenience
pub use config::StateConfig;
pub use defs::{Switch, Value, SW_COUNT, VAL_COUNT};
pub use notify::{ChangeListener, ChangeQueue, FnListener, NotifyingState, StateChange};
pub use state::VehicleState;
pub use types::{Result, VehicleError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
