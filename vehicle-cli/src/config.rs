//! Scenario loading and parsing

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use vehicle_state::{StateConfig, Switch, Value};

/// A scenario file: initial presets plus an ordered list of writes
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub initial: StateConfig,
    #[serde(default)]
    pub steps: Vec<StepConfig>,
}

/// One `[[steps]]` table as written in the file
///
/// Exactly one of `switch` (with `state`) or `value` (with `set`) must be
/// given.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StepConfig {
    pub switch: Option<Switch>,
    pub state: Option<bool>,
    pub value: Option<Value>,
    pub set: Option<u16>,
    /// Apply without notifying (as if the write came from the bus)
    #[serde(default)]
    pub sync: bool,
}

/// A validated scenario step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Switch { switch: Switch, state: bool, sync: bool },
    Value { value: Value, set: u16, sync: bool },
}

impl StepConfig {
    /// Validate the table into a `Step`; `number` is 1-based, for messages
    pub fn resolve(&self, number: usize) -> Result<Step> {
        match (self.switch, self.value) {
            (Some(switch), None) => {
                let state = self
                    .state
                    .with_context(|| format!("Step {}: switch '{}' has no 'state'", number, switch))?;
                if self.set.is_some() {
                    bail!("Step {}: 'set' is only valid with 'value'", number);
                }
                Ok(Step::Switch {
                    switch,
                    state,
                    sync: self.sync,
                })
            }
            (None, Some(value)) => {
                let set = self
                    .set
                    .with_context(|| format!("Step {}: value '{}' has no 'set'", number, value))?;
                if self.state.is_some() {
                    bail!("Step {}: 'state' is only valid with 'switch'", number);
                }
                Ok(Step::Value {
                    value,
                    set,
                    sync: self.sync,
                })
            }
            (Some(_), Some(_)) => bail!("Step {}: give either 'switch' or 'value', not both", number),
            (None, None) => bail!("Step {}: needs a 'switch' or a 'value'", number),
        }
    }
}

impl ScenarioConfig {
    /// Validate every step, in order
    pub fn resolve_steps(&self) -> Result<Vec<Step>> {
        self.steps
            .iter()
            .enumerate()
            .map(|(i, step)| step.resolve(i + 1))
            .collect()
    }
}

/// Parse a scenario from TOML text
pub fn parse_scenario(content: &str) -> Result<ScenarioConfig> {
    let scenario: ScenarioConfig = toml::from_str(content).context("Failed to parse scenario")?;
    // Catch malformed steps before anything runs
    scenario.resolve_steps()?;
    Ok(scenario)
}

/// Load a scenario from a TOML file
pub fn load_scenario(path: &Path) -> Result<ScenarioConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario file: {:?}", path))?;

    parse_scenario(&content).with_context(|| format!("Invalid scenario file: {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_scenario_deserialization() {
        let toml_content = r#"
            [initial]
            queue_capacity = 4

            [initial.switches]
            ignition = true

            [[steps]]
            switch = "headlights"
            state = true

            [[steps]]
            value = "engine_rpm"
            set = 850
            sync = true
        "#;

        let scenario = parse_scenario(toml_content).unwrap();
        assert_eq!(scenario.initial.queue_capacity, 4);
        assert_eq!(
            scenario.resolve_steps().unwrap(),
            vec![
                Step::Switch {
                    switch: Switch::Headlights,
                    state: true,
                    sync: false,
                },
                Step::Value {
                    value: Value::EngineRpm,
                    set: 850,
                    sync: true,
                },
            ]
        );
    }

    #[test]
    fn test_empty_scenario() {
        let scenario = parse_scenario("").unwrap();
        assert!(scenario.steps.is_empty());
        assert_eq!(scenario.initial, StateConfig::default());
    }

    #[test]
    fn test_step_validation_errors() {
        let both = StepConfig {
            switch: Some(Switch::Horn),
            value: Some(Value::Throttle),
            ..Default::default()
        };
        assert!(both.resolve(2).unwrap_err().to_string().contains("Step 2"));

        let neither = StepConfig::default();
        assert!(neither.resolve(1).is_err());

        let missing_state = StepConfig {
            switch: Some(Switch::Horn),
            ..Default::default()
        };
        let err = missing_state.resolve(3).unwrap_err().to_string();
        assert_eq!(err, "Step 3: switch 'horn' has no 'state'");

        let mixed = StepConfig {
            value: Some(Value::Throttle),
            set: Some(1),
            state: Some(true),
            ..Default::default()
        };
        assert!(mixed.resolve(1).is_err());
    }

    #[test]
    fn test_bad_step_rejected_at_parse() {
        let toml_content = r#"
            [[steps]]
            value = "throttle"
        "#;
        assert!(parse_scenario(toml_content).is_err());
    }

    #[test]
    fn test_unknown_step_key_rejected() {
        let toml_content = r#"
            [[steps]]
            switch = "brake"
            state = true
            synk = true
        "#;
        let err = format!("{:#}", parse_scenario(toml_content).unwrap_err());
        assert!(err.contains("synk"), "{}", err);
    }

    #[test]
    fn test_unknown_initial_key_rejected() {
        let toml_content = r#"
            [initial]
            queue_capcity = 2
        "#;
        assert!(parse_scenario(toml_content).is_err());

        let toml_content = r#"
            [[step]]
            switch = "brake"
            state = true
        "#;
        assert!(parse_scenario(toml_content).is_err());
    }

    #[test]
    fn test_value_out_of_u16_range_rejected() {
        let toml_content = r#"
            [[steps]]
            value = "engine_rpm"
            set = 70000
        "#;
        assert!(parse_scenario(toml_content).is_err());
    }

    #[test]
    fn test_load_scenario_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[[steps]]\nswitch = \"brake\"\nstate = true").unwrap();

        let scenario = load_scenario(file.path()).unwrap();
        assert_eq!(scenario.steps.len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_scenario(Path::new("does/not/exist.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read scenario file"));
    }
}
