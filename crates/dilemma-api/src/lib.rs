//! In-process API facade over a dilemma session, with dataset loading and an HTTP surface.

mod dataset;
mod server;

use contracts::{
    AdvanceOutcome, AnalysisReport, ApiError, DecisionOutcome, RunConfig, Scenario, ScenarioView,
    SessionStatus, Side,
};
use dilemma_core::{analyze, Clock, Session, SystemClock};
use tracing::{info, warn};

pub use dataset::{load_scenarios, parse_scenarios, validate_scenarios, DatasetError};
pub use server::{router, serve, ServerError};

/// Owns the scenario dataset and the single session playing through it.
#[derive(Debug)]
pub struct DilemmaApi<C = SystemClock> {
    scenarios: Vec<Scenario>,
    session: Session<C>,
    report: Option<AnalysisReport>,
}

impl DilemmaApi<SystemClock> {
    pub fn from_config(config: &RunConfig) -> Result<Self, DatasetError> {
        let scenarios = load_scenarios(&config.scenarios_path)?;
        info!(
            path = %config.scenarios_path,
            scenarios = scenarios.len(),
            "scenario dataset loaded"
        );
        Ok(Self::with_clock(scenarios, SystemClock))
    }

    pub fn from_scenarios(scenarios: Vec<Scenario>) -> Self {
        Self::with_clock(scenarios, SystemClock)
    }
}

impl<C: Clock> DilemmaApi<C> {
    pub fn with_clock(scenarios: Vec<Scenario>, clock: C) -> Self {
        Self {
            scenarios,
            session: Session::new(clock),
            report: None,
        }
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn session(&self) -> &Session<C> {
        &self.session
    }

    pub fn status(&self) -> SessionStatus {
        self.session.status()
    }

    /// Starts a run over the loaded dataset.
    pub fn start(&mut self) -> Result<ScenarioView, ApiError> {
        validate_scenarios(&self.scenarios)?;
        self.report = None;
        let view = self
            .session
            .start(self.scenarios.clone())
            .map_err(|err| reject("start", err))?;
        info!(total = view.total, "run started");
        Ok(view)
    }

    /// Replaces the dataset and starts a run over it.
    pub fn start_with(&mut self, scenarios: Vec<Scenario>) -> Result<ScenarioView, ApiError> {
        validate_scenarios(&scenarios)?;
        self.scenarios = scenarios;
        self.start()
    }

    pub fn current(&self) -> Result<ScenarioView, ApiError> {
        self.session
            .current_view()
            .map_err(|err| reject("current", err))
    }

    pub fn elapsed_seconds(&self) -> Option<f64> {
        self.session.elapsed_seconds()
    }

    pub fn decide(&mut self, side: Side) -> Result<DecisionOutcome, ApiError> {
        self.session
            .decide(side)
            .map_err(|err| reject("decide", err))
    }

    pub fn advance(&mut self) -> Result<AdvanceOutcome, ApiError> {
        let outcome = self
            .session
            .advance()
            .map_err(|err| reject("advance", err))?;
        if outcome == AdvanceOutcome::Complete {
            let report = analyze(&self.session).map_err(|err| reject("analyze", err))?;
            info!(
                average_time = report.average_time,
                left_percent = report.left_percent,
                speed = ?report.speed_tendency,
                bias = ?report.bias_tendency,
                "run complete"
            );
            self.report = Some(report);
        }
        Ok(outcome)
    }

    /// Report for the completed run, computed once when the run finished.
    pub fn analysis(&self) -> Result<AnalysisReport, ApiError> {
        match &self.report {
            Some(report) => Ok(report.clone()),
            None => analyze(&self.session).map_err(|err| reject("analyze", err)),
        }
    }

    pub fn reset(&mut self) -> SessionStatus {
        self.session.reset();
        self.report = None;
        info!("session reset");
        self.session.status()
    }
}

fn reject(operation: &str, err: dilemma_core::SessionError) -> ApiError {
    warn!(operation, error = %err, "session operation rejected");
    ApiError::from(err)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use contracts::{
        BiasTendency, ErrorCode, PopulationStats, ScenarioOption, SessionPhase, SpeedTendency,
    };
    use dilemma_core::ManualClock;

    use super::*;

    fn option(title: &str) -> ScenarioOption {
        ScenarioOption {
            title: title.to_string(),
            description: String::new(),
            consequence: format!("{title} happens"),
            stats: PopulationStats { left: 70, right: 30 },
        }
    }

    fn dataset(count: u32) -> Vec<Scenario> {
        (1..=count)
            .map(|id| Scenario {
                id,
                title: format!("case {id}"),
                description: String::new(),
                left_choice: option("act"),
                right_choice: option("refrain"),
                ethics: String::new(),
            })
            .collect()
    }

    #[test]
    fn full_run_caches_analysis() {
        let clock = ManualClock::new();
        let mut api = DilemmaApi::with_clock(dataset(2), clock.clone());
        api.start().expect("start");

        clock.advance(Duration::from_secs(12));
        api.decide(Side::Right).expect("decide 1");
        assert!(matches!(
            api.advance().expect("advance 1"),
            AdvanceOutcome::Next { .. }
        ));
        clock.advance(Duration::from_secs(14));
        api.decide(Side::Right).expect("decide 2");
        assert_eq!(api.advance().expect("advance 2"), AdvanceOutcome::Complete);

        let report = api.analysis().expect("analysis");
        assert_eq!(report.average_time, 13.0);
        assert_eq!(report.speed_tendency, SpeedTendency::Contemplative);
        assert_eq!(report.bias_tendency, BiasTendency::RightLeaning);
        assert_eq!(api.analysis().expect("cached"), report);
    }

    #[test]
    fn session_errors_become_api_errors() {
        let mut api = DilemmaApi::with_clock(dataset(1), ManualClock::new());
        let err = api.decide(Side::Left).expect_err("not started");
        assert_eq!(err.error_code, ErrorCode::SessionOutOfRange);

        api.start().expect("start");
        api.decide(Side::Left).expect("decide");
        let err = api.decide(Side::Left).expect_err("twice");
        assert_eq!(err.error_code, ErrorCode::SessionStateConflict);

        let err = api.analysis().expect_err("incomplete");
        assert_eq!(err.error_code, ErrorCode::SessionStateConflict);
    }

    #[test]
    fn start_with_rejects_invalid_dataset() {
        let mut api = DilemmaApi::with_clock(dataset(1), ManualClock::new());
        let err = api.start_with(Vec::new()).expect_err("empty");
        assert_eq!(err.error_code, ErrorCode::InvalidDataset);
        assert_eq!(api.scenarios().len(), 1);
        assert_eq!(api.status().phase, SessionPhase::NotStarted);
    }

    #[test]
    fn reset_clears_run_and_report() {
        let mut api = DilemmaApi::with_clock(dataset(1), ManualClock::new());
        api.start().expect("start");
        api.decide(Side::Left).expect("decide");
        api.advance().expect("advance");
        assert!(api.analysis().is_ok());

        let status = api.reset();
        assert_eq!(status.phase, SessionPhase::NotStarted);
        assert!(api.analysis().is_err());
        assert!(api.current().is_err());
    }
}
