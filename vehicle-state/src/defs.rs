//! Named slot definitions
//!
//! Every switch and analog value on the vehicle has a fixed slot in the state
//! arrays. The enums here name those slots; their discriminants are the slot
//! indices, and the array lengths are derived from them so the two can never
//! drift apart.

use crate::types::{Result, VehicleError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of switch slots
pub const SW_COUNT: usize = Switch::ALL.len();

/// Number of analog value slots
pub const VAL_COUNT: usize = Value::ALL.len();

/// A named boolean input on the vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
#[repr(u8)]
pub enum Switch {
    Ignition = 0,
    Headlights = 1,
    HighBeam = 2,
    LeftIndicator = 3,
    RightIndicator = 4,
    Hazard = 5,
    Brake = 6,
    Horn = 7,
    Reverse = 8,
    Wipers = 9,
}

impl Switch {
    /// All switches in slot order
    pub const ALL: [Switch; 10] = [
        Switch::Ignition,
        Switch::Headlights,
        Switch::HighBeam,
        Switch::LeftIndicator,
        Switch::RightIndicator,
        Switch::Hazard,
        Switch::Brake,
        Switch::Horn,
        Switch::Reverse,
        Switch::Wipers,
    ];

    /// Slot index in the switch array
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stable snake_case name, used in config and reports
    pub const fn name(self) -> &'static str {
        match self {
            Switch::Ignition => "ignition",
            Switch::Headlights => "headlights",
            Switch::HighBeam => "high_beam",
            Switch::LeftIndicator => "left_indicator",
            Switch::RightIndicator => "right_indicator",
            Switch::Hazard => "hazard",
            Switch::Brake => "brake",
            Switch::Horn => "horn",
            Switch::Reverse => "reverse",
            Switch::Wipers => "wipers",
        }
    }
}

impl TryFrom<u8> for Switch {
    type Error = VehicleError;

    fn try_from(index: u8) -> Result<Self> {
        Switch::ALL
            .get(index as usize)
            .copied()
            .ok_or(VehicleError::SwitchIndexOutOfRange {
                index,
                count: SW_COUNT,
            })
    }
}

impl FromStr for Switch {
    type Err = VehicleError;

    fn from_str(s: &str) -> Result<Self> {
        Switch::ALL
            .iter()
            .copied()
            .find(|switch| switch.name() == s)
            .ok_or_else(|| VehicleError::UnknownSwitch(s.to_string()))
    }
}

impl TryFrom<String> for Switch {
    type Error = VehicleError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Switch> for &'static str {
    fn from(switch: Switch) -> Self {
        switch.name()
    }
}

impl fmt::Display for Switch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named unsigned 16-bit analog input on the vehicle
///
/// Values are raw sensor counts or fixed-point readings; scaling is up to
/// whoever produces and consumes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
#[repr(u8)]
pub enum Value {
    /// Millivolts
    BatteryVoltage = 0,
    /// Pedal position, raw ADC counts
    Throttle = 1,
    EngineRpm = 2,
    /// Tenths of a degree Celsius, offset by 400
    CoolantTemp = 3,
    /// Per-mille of tank capacity
    FuelLevel = 4,
    /// Hundredths of km/h
    VehicleSpeed = 5,
}

impl Value {
    /// All values in slot order
    pub const ALL: [Value; 6] = [
        Value::BatteryVoltage,
        Value::Throttle,
        Value::EngineRpm,
        Value::CoolantTemp,
        Value::FuelLevel,
        Value::VehicleSpeed,
    ];

    /// Slot index in the value array
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stable snake_case name, used in config and reports
    pub const fn name(self) -> &'static str {
        match self {
            Value::BatteryVoltage => "battery_voltage",
            Value::Throttle => "throttle",
            Value::EngineRpm => "engine_rpm",
            Value::CoolantTemp => "coolant_temp",
            Value::FuelLevel => "fuel_level",
            Value::VehicleSpeed => "vehicle_speed",
        }
    }
}

impl TryFrom<u8> for Value {
    type Error = VehicleError;

    fn try_from(index: u8) -> Result<Self> {
        Value::ALL
            .get(index as usize)
            .copied()
            .ok_or(VehicleError::ValueIndexOutOfRange {
                index,
                count: VAL_COUNT,
            })
    }
}

impl FromStr for Value {
    type Err = VehicleError;

    fn from_str(s: &str) -> Result<Self> {
        Value::ALL
            .iter()
            .copied()
            .find(|value| value.name() == s)
            .ok_or_else(|| VehicleError::UnknownValue(s.to_string()))
    }
}

impl TryFrom<String> for Value {
    type Error = VehicleError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Value> for &'static str {
    fn from(value: Value) -> Self {
        value.name()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
