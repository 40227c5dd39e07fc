//! Scenario execution and report generation
//!
//! Runs validated steps against a `NotifyingState` backed by a bounded
//! `ChangeQueue`, then renders what happened as text or JSON.

use crate::config::{ScenarioConfig, Step};
use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use std::fmt::{self, Write as _};
use vehicle_state::{NotifyingState, StateChange, Switch, Value};

/// The state a step asked for, typed per slot kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Requested {
    Switch(bool),
    Value(u16),
}

impl fmt::Display for Requested {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requested::Switch(on) => write!(f, "{}", on),
            Requested::Value(val) => write!(f, "{}", val),
        }
    }
}

/// Outcome of a single scenario step
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub step: usize,
    pub slot: &'static str,
    pub requested: Requested,
    pub sync: bool,
    /// The transition, or `None` if the slot already held the value
    pub change: Option<StateChange>,
}

/// Final value of one slot
#[derive(Debug, Clone, Serialize)]
pub struct SlotSnapshot {
    pub name: &'static str,
    pub index: usize,
    pub value: u16,
}

/// Everything a scenario run produced
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: String,
    pub steps: Vec<StepOutcome>,
    /// Changes still queued for transmission at the end, oldest first
    pub queued: Vec<StateChange>,
    /// Changes evicted from the queue by overflow
    pub dropped: usize,
    pub switches: Vec<SlotSnapshot>,
    pub values: Vec<SlotSnapshot>,
}

/// Run a scenario to completion
pub fn run_scenario(scenario: &ScenarioConfig) -> Result<Report> {
    let steps = scenario.resolve_steps()?;
    let queue = scenario.initial.build_queue()?;
    let mut state = NotifyingState::with_state(scenario.initial.build_state(), queue);

    let mut outcomes = Vec::with_capacity(steps.len());
    for (i, step) in steps.iter().enumerate() {
        let outcome = match *step {
            Step::Switch { switch, state: on, sync } => {
                let change = if sync {
                    state.sync_switch(switch, on)
                } else {
                    state.set_switch(switch, on)
                };
                StepOutcome {
                    step: i + 1,
                    slot: switch.name(),
                    requested: Requested::Switch(on),
                    sync,
                    change,
                }
            }
            Step::Value { value, set, sync } => {
                let change = if sync {
                    state.sync_value(value, set)
                } else {
                    state.set_value(value, set)
                };
                StepOutcome {
                    step: i + 1,
                    slot: value.name(),
                    requested: Requested::Value(set),
                    sync,
                    change,
                }
            }
        };

        match &outcome.change {
            Some(change) => log::debug!("Step {}: {}", outcome.step, change),
            None => log::debug!("Step {}: {} unchanged", outcome.step, outcome.slot),
        }
        outcomes.push(outcome);
    }

    let (final_state, mut queue) = state.into_parts();
    let dropped = queue.dropped();
    let queued: Vec<StateChange> = queue.drain().collect();

    log::info!(
        "Ran {} steps: {} queued, {} dropped",
        outcomes.len(),
        queued.len(),
        dropped
    );

    Ok(Report {
        generated_at: Utc::now().to_rfc3339(),
        steps: outcomes,
        queued,
        dropped,
        switches: Switch::ALL
            .iter()
            .map(|&switch| SlotSnapshot {
                name: switch.name(),
                index: switch.index(),
                value: u16::from(final_state.switch(switch)),
            })
            .collect(),
        values: Value::ALL
            .iter()
            .map(|&value| SlotSnapshot {
                name: value.name(),
                index: value.index(),
                value: final_state.value(value),
            })
            .collect(),
    })
}

/// Render a report as plain text
pub fn render_text(report: &Report) -> Result<String> {
    let mut out = String::new();
    write_text(&mut out, report)?;
    Ok(out)
}

fn write_text(out: &mut String, report: &Report) -> fmt::Result {
    writeln!(out, "═══════════════════════════════════════════════")?;
    writeln!(out, "  Vehicle State - Scenario Report")?;
    writeln!(out, "═══════════════════════════════════════════════")?;
    writeln!(out, "Generated: {}\n", report.generated_at)?;

    writeln!(out, "Steps:")?;
    for step in &report.steps {
        let origin = if step.sync { " (sync)" } else { "" };
        match &step.change {
            Some(change) => writeln!(out, "  {:>3}. {}{}", step.step, change, origin)?,
            None => writeln!(
                out,
                "  {:>3}. {}: unchanged ({}){}",
                step.step, step.slot, step.requested, origin
            )?,
        }
    }

    writeln!(out, "\nQueued changes: {}", report.queued.len())?;
    for change in &report.queued {
        writeln!(out, "  {}", change)?;
    }
    if report.dropped > 0 {
        writeln!(out, "Dropped (queue overflow): {}", report.dropped)?;
    }

    writeln!(out, "\nSwitches:")?;
    for slot in &report.switches {
        let on = if slot.value != 0 { "on" } else { "off" };
        writeln!(out, "  [{:>2}] {:<16} {}", slot.index, slot.name, on)?;
    }

    writeln!(out, "\nValues:")?;
    for slot in &report.values {
        writeln!(out, "  [{:>2}] {:<16} {}", slot.index, slot.name, slot.value)?;
    }

    Ok(())
}

/// Render a report as pretty-printed JSON
pub fn render_json(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_scenario;

    const SCENARIO: &str = r#"
        [initial]
        queue_capacity = 2

        [initial.switches]
        ignition = true

        [[steps]]
        switch = "ignition"
        state = true

        [[steps]]
        switch = "left_indicator"
        state = true

        [[steps]]
        value = "throttle"
        set = 512

        [[steps]]
        value = "throttle"
        set = 512

        [[steps]]
        value = "engine_rpm"
        set = 2000

        [[steps]]
        switch = "brake"
        state = true
        sync = true
    "#;

    #[test]
    fn test_run_scenario() {
        let scenario = parse_scenario(SCENARIO).unwrap();
        let report = run_scenario(&scenario).unwrap();

        assert_eq!(report.steps.len(), 6);
        // Preset already on
        assert!(report.steps[0].change.is_none());
        assert!(report.steps[1].change.is_some());
        assert!(report.steps[2].change.is_some());
        assert!(report.steps[3].change.is_none());
        // Sync steps still change state
        assert!(report.steps[5].change.is_some());

        // Three notified changes through a queue of two
        assert_eq!(report.dropped, 1);
        assert_eq!(report.queued.len(), 2);
        assert_eq!(report.queued[0].slot_name(), "throttle");
        assert_eq!(report.queued[1].slot_name(), "engine_rpm");

        assert_eq!(report.steps[0].requested, Requested::Switch(true));
        assert_eq!(report.steps[4].requested, Requested::Value(2000));

        let brake = &report.switches[Switch::Brake.index()];
        assert_eq!(brake.name, "brake");
        assert_eq!(brake.value, 1);
        assert_eq!(report.values[Value::Throttle.index()].value, 512);
    }

    #[test]
    fn test_render_text() {
        let scenario = parse_scenario(SCENARIO).unwrap();
        let report = run_scenario(&scenario).unwrap();
        let text = render_text(&report).unwrap();

        assert!(text.contains("left_indicator: false -> true"));
        assert!(text.contains("throttle: unchanged (512)"));
        assert!(text.contains("ignition: unchanged (true)"));
        assert!(text.contains("brake: false -> true (sync)"));
        assert!(text.contains("Dropped (queue overflow): 1"));
    }

    #[test]
    fn test_render_json() {
        let scenario = parse_scenario(SCENARIO).unwrap();
        let report = run_scenario(&scenario).unwrap();
        let json: serde_json::Value = serde_json::from_str(&render_json(&report).unwrap()).unwrap();

        assert_eq!(json["dropped"], 1);
        assert_eq!(json["steps"][1]["change"]["kind"], "switch");
        assert_eq!(json["steps"][1]["change"]["switch"], "left_indicator");
        assert!(json["steps"][0]["change"].is_null());
        // Requested state keeps its domain type
        assert_eq!(json["steps"][0]["requested"], true);
        assert_eq!(json["steps"][2]["requested"], 512);
    }

    #[test]
    fn test_zero_capacity_scenario_fails() {
        let scenario = parse_scenario("[initial]\nqueue_capacity = 0").unwrap();
        assert!(run_scenario(&scenario).is_err());
    }
}
