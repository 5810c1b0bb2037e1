//! Scenario configuration for automated panel runs
//!
//! A scenario is a TOML file of timed operator actions, each optionally
//! followed by an assertion on the session. The panel plays it frame by
//! frame and exits with the requested code.

mod runner;

pub use runner::{AssertionContext, AssertionResult, ScenarioCommand, ScenarioRunner};

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// A scenario loaded from a TOML file
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Scenario metadata
    pub scenario: ScenarioMetadata,
    /// Timed actions, in time order
    pub actions: Vec<ScenarioAction>,
}

/// Metadata about the scenario
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioMetadata {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A single action with timing
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioAction {
    /// Milliseconds after scenario start
    pub time_ms: u64,
    pub action: ActionType,
    /// Checked right after the action runs
    #[serde(default)]
    pub assert: Option<Assertion>,
}

/// Operator actions a scenario can perform
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionType {
    /// Press an option button of the current line
    PressOption { index: usize },
    /// Press a static option button
    PressStatic { index: usize },
    Forward,
    Back,
    JumpStart,
    JumpEnd,
    TogglePause,
    /// Press the participant turn button
    ParticipantTurn,
    /// Exit the panel
    Exit {
        #[serde(default)]
        code: i32,
    },
    /// Log a message
    Log { message: String },
}

/// Checks on the session after an action
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Assertion {
    /// Cursor is on this line
    CurrentLine { line: usize },
    IsPaused,
    IsUnpaused,
    /// No command in flight
    IsIdle,
    /// Advisory label contains this text (case-insensitive)
    AdvisoryContains { text: String },
    /// Static options show the redirect color
    RedirectSuggested,
}

impl Scenario {
    /// Load a scenario from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ScenarioError::IoError {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        let scenario: Scenario =
            toml::from_str(&content).map_err(|e| ScenarioError::ParseError {
                path: path.display().to_string(),
                error: e.to_string(),
            })?;

        scenario.validate()?;
        Ok(scenario)
    }

    fn validate(&self) -> Result<(), ScenarioError> {
        if self.actions.is_empty() {
            return Err(ScenarioError::ValidationError(
                "Scenario must have at least one action".to_string(),
            ));
        }

        let mut last_time = 0;
        for action in &self.actions {
            if action.time_ms < last_time {
                return Err(ScenarioError::ValidationError(format!(
                    "Actions must be ordered by time. Found action at {}ms after action at {}ms",
                    action.time_ms, last_time
                )));
            }
            last_time = action.time_ms;
        }

        let has_exit = self
            .actions
            .iter()
            .any(|a| matches!(a.action, ActionType::Exit { .. }));
        if !has_exit {
            return Err(ScenarioError::ValidationError(
                "Scenario must have an Exit action".to_string(),
            ));
        }

        Ok(())
    }
}

impl ScenarioAction {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.time_ms)
    }
}

/// Errors loading or validating a scenario
#[derive(Debug, Clone)]
pub enum ScenarioError {
    IoError { path: String, error: String },
    ParseError { path: String, error: String },
    ValidationError(String),
}

impl std::fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioError::IoError { path, error } => {
                write!(f, "Failed to read scenario '{}': {}", path, error)
            }
            ScenarioError::ParseError { path, error } => {
                write!(f, "Failed to parse scenario '{}': {}", path, error)
            }
            ScenarioError::ValidationError(msg) => write!(f, "Invalid scenario: {}", msg),
        }
    }
}

impl std::error::Error for ScenarioError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_actions() {
        let toml_str = r#"
            [scenario]
            name = "Walk the intro"

            [[actions]]
            time_ms = 100
            action = { type = "press_option", index = 0 }

            [[actions]]
            time_ms = 2000
            action = { type = "toggle_pause" }
            assert = { type = "is_paused" }

            [[actions]]
            time_ms = 2500
            action = { type = "exit", code = 0 }
        "#;

        let scenario: Scenario = toml::from_str(toml_str).unwrap();
        assert_eq!(scenario.scenario.name, "Walk the intro");
        assert_eq!(
            scenario.actions[0].action,
            ActionType::PressOption { index: 0 }
        );
        assert_eq!(scenario.actions[1].assert, Some(Assertion::IsPaused));
        assert!(scenario.validate().is_ok());
    }

    #[test]
    fn test_parse_line_assertion() {
        let toml_str = r#"
            [scenario]
            name = "Line check"

            [[actions]]
            time_ms = 0
            action = { type = "jump_end" }
            assert = { type = "current_line", line = 4 }

            [[actions]]
            time_ms = 10
            action = { type = "exit" }
        "#;

        let scenario: Scenario = toml::from_str(toml_str).unwrap();
        assert_eq!(
            scenario.actions[0].assert,
            Some(Assertion::CurrentLine { line: 4 })
        );
        assert_eq!(scenario.actions[1].action, ActionType::Exit { code: 0 });
    }

    #[test]
    fn test_rejects_missing_exit() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [scenario]
            name = "No exit"

            [[actions]]
            time_ms = 0
            action = {{ type = "forward" }}
            "#
        )
        .unwrap();

        assert!(matches!(
            Scenario::load(file.path()),
            Err(ScenarioError::ValidationError(_))
        ));
    }

    #[test]
    fn test_rejects_out_of_order() {
        let toml_str = r#"
            [scenario]
            name = "Backwards"

            [[actions]]
            time_ms = 500
            action = { type = "forward" }

            [[actions]]
            time_ms = 100
            action = { type = "exit" }
        "#;
        let scenario: Scenario = toml::from_str(toml_str).unwrap();
        assert!(scenario.validate().is_err());
    }
}
