// End-to-end use of the public API: a device-style static instance, a queue
// drained by a pretend transport, and a peer applying what it receives.
use std::sync::Mutex;
use vehicle_state::{
    ChangeQueue, NotifyingState, StateChange, StateConfig, Switch, Value, VehicleState,
};

static DEVICE_STATE: Mutex<VehicleState> = Mutex::new(VehicleState::new());

#[test]
fn static_instance_starts_zeroed() {
    let mut state = DEVICE_STATE.lock().unwrap();
    assert!(!state.switch(Switch::Ignition));

    assert!(state.set_switch(Switch::Ignition, true).is_some());
    assert!(state.set_switch(Switch::Ignition, true).is_none());
}

#[test]
fn changes_flow_to_peer_without_echo() {
    let config = StateConfig::new()
        .with_switch(Switch::Ignition, true)
        .with_value(Value::BatteryVoltage, 12_400)
        .with_queue_capacity(8);

    let mut local = NotifyingState::with_state(config.build_state(), config.build_queue().unwrap());
    let mut peer = NotifyingState::with_state(config.build_state(), ChangeQueue::default());

    local.set_switch(Switch::LeftIndicator, true);
    local.set_value(Value::VehicleSpeed, 3_000);
    local.set_value(Value::VehicleSpeed, 3_000);
    local.set_switch(Switch::Ignition, true); // preset already on

    let sent: Vec<StateChange> = local.listener_mut().drain().collect();
    assert_eq!(sent.len(), 2);

    for change in &sent {
        match *change {
            StateChange::Switch { switch, new, .. } => peer.sync_switch(switch, new),
            StateChange::Value { value, new, .. } => peer.sync_value(value, new),
        };
    }

    assert_eq!(peer.state(), local.state());
    assert!(peer.listener().is_empty());
}

#[test]
fn change_records_serialize_with_slot_names() {
    let change = StateChange::Value {
        value: Value::CoolantTemp,
        old: 0,
        new: 1_250,
    };
    let json = serde_json::to_string(&change).unwrap();
    assert_eq!(
        json,
        r#"{"kind":"value","value":"coolant_temp","old":0,"new":1250}"#
    );

    let back: StateChange = serde_json::from_str(&json).unwrap();
    assert_eq!(back, change);
}
