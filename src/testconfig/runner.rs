//! Scenario runner
//!
//! Hands out scenario actions as they come due and checks assertions against
//! the session state the panel passes back.

use super::{ActionType, Assertion, Scenario};
use crate::dispatch::StaticTone;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Operator actions the runner asks the panel to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioCommand {
    PressOption(usize),
    PressStatic(usize),
    Forward,
    Back,
    JumpStart,
    JumpEnd,
    TogglePause,
    ParticipantTurn,
    /// Nothing to do in the panel
    Noop,
    Exit { code: i32 },
}

/// Result of an assertion check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionResult {
    Passed,
    Failed(String),
}

/// Session state handed to the runner for assertions
pub struct AssertionContext<'a> {
    pub current_line: usize,
    pub is_paused: bool,
    pub is_busy: bool,
    pub advisory: &'a str,
    pub tone: StaticTone,
}

/// Runs a scenario against the panel
pub struct ScenarioRunner {
    scenario: Scenario,
    start_time: Option<Instant>,
    current_action_index: usize,
    completed: bool,
    passed: bool,
}

impl ScenarioRunner {
    pub fn new(scenario: Scenario) -> Self {
        info!("[SCENARIO] Loaded: {}", scenario.scenario.name);
        if !scenario.scenario.description.is_empty() {
            info!("[SCENARIO] Description: {}", scenario.scenario.description);
        }
        info!("[SCENARIO] Total actions: {}", scenario.actions.len());

        Self {
            scenario,
            start_time: None,
            current_action_index: 0,
            completed: false,
            passed: true,
        }
    }

    /// Start the clock (call on the first frame)
    pub fn start(&mut self) {
        if self.start_time.is_none() {
            self.start_time = Some(Instant::now());
            info!("[SCENARIO] Started: {}", self.scenario.scenario.name);
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Whether every assertion so far has passed
    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time
            .map(|t| t.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// Next due command, if any
    pub fn poll(&mut self) -> Option<(ScenarioCommand, Option<Assertion>)> {
        self.poll_at(self.elapsed())
    }

    /// Next command due at `elapsed`; split out so tests need no real clock
    pub fn poll_at(&mut self, elapsed: Duration) -> Option<(ScenarioCommand, Option<Assertion>)> {
        if self.completed || self.start_time.is_none() {
            return None;
        }

        let Some(action) = self.scenario.actions.get(self.current_action_index) else {
            self.completed = true;
            return None;
        };
        if elapsed < action.delay() {
            return None;
        }

        debug!(
            "[SCENARIO] Executing action at {}ms: {:?}",
            action.time_ms, action.action
        );
        let command = Self::to_command(&action.action);
        let assertion = action.assert.clone();

        self.current_action_index += 1;
        if self.current_action_index >= self.scenario.actions.len() {
            self.completed = true;
        }
        Some((command, assertion))
    }

    fn to_command(action: &ActionType) -> ScenarioCommand {
        match action {
            ActionType::PressOption { index } => ScenarioCommand::PressOption(*index),
            ActionType::PressStatic { index } => ScenarioCommand::PressStatic(*index),
            ActionType::Forward => ScenarioCommand::Forward,
            ActionType::Back => ScenarioCommand::Back,
            ActionType::JumpStart => ScenarioCommand::JumpStart,
            ActionType::JumpEnd => ScenarioCommand::JumpEnd,
            ActionType::TogglePause => ScenarioCommand::TogglePause,
            ActionType::ParticipantTurn => ScenarioCommand::ParticipantTurn,
            ActionType::Exit { code } => ScenarioCommand::Exit { code: *code },
            ActionType::Log { message } => {
                info!("[SCENARIO] {}", message);
                ScenarioCommand::Noop
            }
        }
    }

    /// Check an assertion; a failure marks the whole scenario failed
    pub fn check_assertion(
        &mut self,
        assertion: &Assertion,
        context: &AssertionContext<'_>,
    ) -> AssertionResult {
        let result = evaluate(assertion, context);
        match &result {
            AssertionResult::Passed => debug!("[SCENARIO] Assertion passed: {:?}", assertion),
            AssertionResult::Failed(reason) => {
                error!("[SCENARIO] Assertion failed: {}", reason);
                self.passed = false;
            }
        }
        result
    }

    pub fn summary(&self) -> String {
        format!(
            "[SCENARIO] '{}' {} after {:.1}s ({} of {} actions)",
            self.scenario.scenario.name,
            if self.passed { "PASSED" } else { "FAILED" },
            self.elapsed().as_secs_f32(),
            self.current_action_index,
            self.scenario.actions.len()
        )
    }
}

fn evaluate(assertion: &Assertion, ctx: &AssertionContext<'_>) -> AssertionResult {
    let ok = match assertion {
        Assertion::CurrentLine { line } => ctx.current_line == *line,
        Assertion::IsPaused => ctx.is_paused,
        Assertion::IsUnpaused => !ctx.is_paused,
        Assertion::IsIdle => !ctx.is_busy,
        Assertion::AdvisoryContains { text } => ctx
            .advisory
            .to_lowercase()
            .contains(&text.to_lowercase()),
        Assertion::RedirectSuggested => ctx.tone == StaticTone::Redirect,
    };
    if ok {
        AssertionResult::Passed
    } else {
        AssertionResult::Failed(format!(
            "{:?} (line={}, paused={}, busy={}, advisory={:?}, tone={:?})",
            assertion, ctx.current_line, ctx.is_paused, ctx.is_busy, ctx.advisory, ctx.tone
        ))
    }
}
