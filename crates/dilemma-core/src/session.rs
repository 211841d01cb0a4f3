//! Scenario progression state machine.
//!
//! A run moves `NotStarted -> InProgress -> AwaitingAdvance -> InProgress | Complete`.
//! Recording a decision and moving to the next scenario are separate
//! transitions; the decision timer is armed whenever a scenario becomes
//! current and disarmed when its decision is recorded.

use std::time::Instant;

use contracts::{
    AdvanceOutcome, ApiError, ChoiceRecord, DecisionOutcome, ErrorCode, Scenario, ScenarioView,
    SessionPhase, SessionStatus, Side, SCHEMA_VERSION_V1,
};
use tracing::debug;

use crate::analyzer::round_tenths;
use crate::clock::{Clock, SystemClock};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("scenario index {index} is out of range for a run of {len} scenarios")]
    OutOfRange { index: usize, len: usize },
    #[error("cannot {operation} while session is {phase}: {reason}")]
    InvalidState {
        operation: &'static str,
        phase: SessionPhase,
        reason: &'static str,
    },
}

impl SessionError {
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }

    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState { .. })
    }
}

impl From<SessionError> for ApiError {
    fn from(value: SessionError) -> Self {
        let details = Some(value.to_string());
        match value {
            SessionError::OutOfRange { .. } => ApiError::new(
                ErrorCode::SessionOutOfRange,
                "operation is outside the scenario range",
                details,
            ),
            SessionError::InvalidState { .. } => ApiError::new(
                ErrorCode::SessionStateConflict,
                "operation is out of sequence for the session",
                details,
            ),
        }
    }
}

/// All mutable run state. Compared by value to check that a reset session
/// matches a fresh one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    scenarios: Vec<Scenario>,
    current_index: usize,
    started_at: Option<Instant>,
    choice_history: Vec<ChoiceRecord>,
    decision_times: Vec<f64>,
}

impl SessionState {
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_timer_armed(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn choice_history(&self) -> &[ChoiceRecord] {
        &self.choice_history
    }

    pub fn decision_times(&self) -> &[f64] {
        &self.decision_times
    }

    pub fn phase(&self) -> SessionPhase {
        if self.scenarios.is_empty() {
            SessionPhase::NotStarted
        } else if self.current_index >= self.scenarios.len() {
            SessionPhase::Complete
        } else if self.choice_history.len() > self.current_index {
            SessionPhase::AwaitingAdvance
        } else {
            SessionPhase::InProgress
        }
    }
}

#[derive(Debug)]
pub struct Session<C = SystemClock> {
    clock: C,
    state: SessionState,
}

impl Default for Session<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock> Session<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            state: SessionState::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    pub fn scenarios(&self) -> &[Scenario] {
        self.state.scenarios()
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    pub fn choice_history(&self) -> &[ChoiceRecord] {
        self.state.choice_history()
    }

    pub fn decision_times(&self) -> &[f64] {
        self.state.decision_times()
    }

    /// Begins a new run over `scenarios`, discarding any previous progress,
    /// and arms the timer for the first scenario.
    pub fn start(&mut self, scenarios: Vec<Scenario>) -> Result<ScenarioView, SessionError> {
        if scenarios.is_empty() {
            return Err(SessionError::InvalidState {
                operation: "start",
                phase: self.phase(),
                reason: "a run needs at least one scenario",
            });
        }

        self.state = SessionState {
            scenarios,
            ..SessionState::default()
        };
        self.arm_timer();
        debug!(total = self.state.scenarios.len(), "session started");
        self.current_view()
    }

    pub fn current_scenario(&self) -> Result<&Scenario, SessionError> {
        self.state
            .scenarios
            .get(self.state.current_index)
            .ok_or(SessionError::OutOfRange {
                index: self.state.current_index,
                len: self.state.scenarios.len(),
            })
    }

    pub fn current_view(&self) -> Result<ScenarioView, SessionError> {
        let scenario = self.current_scenario()?;
        Ok(ScenarioView {
            number: self.state.current_index + 1,
            total: self.state.scenarios.len(),
            scenario: scenario.clone(),
        })
    }

    /// Records a decision for the current scenario. The run stays on this
    /// scenario until [`Session::advance`] is called.
    pub fn decide(&mut self, side: Side) -> Result<DecisionOutcome, SessionError> {
        let phase = self.phase();
        let scenario = self.current_scenario()?;
        if phase == SessionPhase::AwaitingAdvance {
            return Err(SessionError::InvalidState {
                operation: "decide",
                phase,
                reason: "a decision is already recorded for this scenario",
            });
        }
        let Some(started_at) = self.state.started_at else {
            return Err(SessionError::InvalidState {
                operation: "decide",
                phase,
                reason: "the decision timer is not armed",
            });
        };

        let elapsed = self.clock.now().saturating_duration_since(started_at);
        let decision_time_seconds = round_tenths(elapsed.as_secs_f64());
        let option = scenario.option(side);
        let record = ChoiceRecord {
            scenario_id: scenario.id,
            scenario_title: scenario.title.clone(),
            side,
            choice_title: option.title.clone(),
            consequence: option.consequence.clone(),
            decision_time_seconds,
        };
        let outcome = DecisionOutcome {
            record: record.clone(),
            chosen_option: option.clone(),
            scenario_stats: scenario.population_stats(),
            left_title: scenario.left_choice.title.clone(),
            right_title: scenario.right_choice.title.clone(),
            ethics: scenario.ethics.clone(),
        };

        self.state.started_at = None;
        self.state.decision_times.push(decision_time_seconds);
        self.state.choice_history.push(record);
        debug!(
            scenario_id = outcome.record.scenario_id,
            side = %side,
            decision_time_seconds,
            "decision recorded"
        );
        Ok(outcome)
    }

    /// Moves past a decided scenario, arming the timer for the next one.
    pub fn advance(&mut self) -> Result<AdvanceOutcome, SessionError> {
        let len = self.state.scenarios.len();
        if self.state.current_index >= len {
            return Err(SessionError::OutOfRange {
                index: self.state.current_index + 1,
                len,
            });
        }
        if self.phase() != SessionPhase::AwaitingAdvance {
            return Err(SessionError::InvalidState {
                operation: "advance",
                phase: self.phase(),
                reason: "the current scenario has no recorded decision",
            });
        }

        self.state.current_index += 1;
        if self.state.current_index < len {
            self.arm_timer();
            debug!(index = self.state.current_index, "advanced to next scenario");
            Ok(AdvanceOutcome::Next {
                view: self.current_view()?,
            })
        } else {
            debug!(total = len, "run complete");
            Ok(AdvanceOutcome::Complete)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase() == SessionPhase::Complete
    }

    pub fn reset(&mut self) {
        self.state = SessionState::default();
    }

    /// Live elapsed time for the armed scenario, rounded like a recorded
    /// decision. `None` while the timer is disarmed.
    pub fn elapsed_seconds(&self) -> Option<f64> {
        self.state.started_at.map(|started_at| {
            round_tenths(
                self.clock
                    .now()
                    .saturating_duration_since(started_at)
                    .as_secs_f64(),
            )
        })
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            phase: self.phase(),
            current_index: self.state.current_index,
            total: self.state.scenarios.len(),
            decisions_recorded: self.state.choice_history.len(),
        }
    }

    fn arm_timer(&mut self) {
        self.state.started_at = Some(self.clock.now());
    }
}
