//! Core types for the vehicle state library
//!
//! This module defines the error type shared by every operation in the crate.
//! Typed accessors never fail; only raw-index access, name lookup and
//! configuration can produce an error.

/// Result type for vehicle state operations
pub type Result<T> = std::result::Result<T, VehicleError>;

/// Errors that can occur when addressing or configuring vehicle state
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VehicleError {
    #[error("Switch index {index} out of range (switch count: {count})")]
    SwitchIndexOutOfRange { index: u8, count: usize },

    #[error("Value index {index} out of range (value count: {count})")]
    ValueIndexOutOfRange { index: u8, count: usize },

    #[error("Unknown switch: {0}")]
    UnknownSwitch(String),

    #[error("Unknown value: {0}")]
    UnknownValue(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
