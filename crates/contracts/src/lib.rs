//! v1 cross-boundary contracts for the dilemma session core, API facade, and drivers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod config;

pub use config::RunConfig;

pub const SCHEMA_VERSION_V1: &str = "1.0";

/// Population split recorded for a scenario, in percent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PopulationStats {
    pub left: u8,
    pub right: u8,
}

impl PopulationStats {
    pub fn is_in_range(&self) -> bool {
        self.left <= 100 && self.right <= 100
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScenarioOption {
    pub title: String,
    pub description: String,
    pub consequence: String,
    pub stats: PopulationStats,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub left_choice: ScenarioOption,
    pub right_choice: ScenarioOption,
    pub ethics: String,
}

impl Scenario {
    pub fn option(&self, side: Side) -> &ScenarioOption {
        match side {
            Side::Left => &self.left_choice,
            Side::Right => &self.right_choice,
        }
    }

    /// Population split shown after a decision. The dataset carries the
    /// scenario-wide split on the left option.
    pub fn population_stats(&self) -> PopulationStats {
        self.left_choice.stats
    }
}

/// Dataset wrapper accepted on disk and over HTTP.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ScenarioSet {
    Wrapped { scenarios: Vec<Scenario> },
    Bare(Vec<Scenario>),
}

impl ScenarioSet {
    pub fn into_scenarios(self) -> Vec<Scenario> {
        match self {
            Self::Wrapped { scenarios } | Self::Bare(scenarios) => scenarios,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Maps a keyboard key name (as reported by browsers and terminals) to a side.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Self::Left),
            "ArrowRight" => Some(Self::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSideError(pub String);

impl fmt::Display for ParseSideError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized side: {:?} (expected left or right)", self.0)
    }
}

impl std::error::Error for ParseSideError {}

impl FromStr for Side {
    type Err = ParseSideError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if let Some(side) = Self::from_key(raw.trim()) {
            return Ok(side);
        }
        match raw.trim().to_ascii_lowercase().as_str() {
            "left" | "l" => Ok(Self::Left),
            "right" | "r" => Ok(Self::Right),
            _ => Err(ParseSideError(raw.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChoiceRecord {
    pub scenario_id: u32,
    pub scenario_title: String,
    pub side: Side,
    pub choice_title: String,
    pub consequence: String,
    pub decision_time_seconds: f64,
}

/// Everything a driver needs to render the result of one decision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecisionOutcome {
    pub record: ChoiceRecord,
    pub chosen_option: ScenarioOption,
    pub scenario_stats: PopulationStats,
    pub left_title: String,
    pub right_title: String,
    pub ethics: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScenarioView {
    /// 1-based position in the run.
    pub number: usize,
    pub total: usize,
    pub scenario: Scenario,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AdvanceOutcome {
    Next { view: ScenarioView },
    Complete,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    NotStarted,
    InProgress,
    AwaitingAdvance,
    Complete,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::AwaitingAdvance => "awaiting_advance",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionStatus {
    pub schema_version: String,
    pub phase: SessionPhase,
    pub current_index: usize,
    pub total: usize,
    pub decisions_recorded: usize,
}

impl SessionStatus {
    pub fn is_complete(&self) -> bool {
        self.phase == SessionPhase::Complete
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "phase={} index={}/{} decisions={}",
            self.phase, self.current_index, self.total, self.decisions_recorded
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SpeedTendency {
    Intuitive,
    Deliberate,
    Contemplative,
}

impl SpeedTendency {
    pub fn narrative(&self) -> &'static str {
        match self {
            Self::Intuitive => {
                "You made your decisions very quickly. You may be the kind of person who trusts intuitive judgement."
            }
            Self::Deliberate => {
                "You thought carefully before deciding. Your decision process is well balanced."
            }
            Self::Contemplative => {
                "You reflected deeply before each decision. You take ethical questions seriously."
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BiasTendency {
    LeftLeaning,
    RightLeaning,
    ContextDependent,
}

impl BiasTendency {
    pub fn narrative(&self) -> &'static str {
        match self {
            Self::LeftLeaning => {
                "Your choices leaned consistently to the left. You seem to follow a particular ethical principle."
            }
            Self::RightLeaning => {
                "Your choices leaned consistently to the right. You seem to follow a particular ethical principle."
            }
            Self::ContextDependent => {
                "Your choices changed with the situation. You seem to judge flexibly according to context."
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    /// 1-based scenario number.
    pub number: usize,
    pub scenario_title: String,
    pub choice_title: String,
    pub decision_time_seconds: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisReport {
    pub schema_version: String,
    pub average_time: f64,
    pub left_percent: u32,
    pub speed_tendency: SpeedTendency,
    pub speed_tendency_text: String,
    pub bias_tendency: BiasTendency,
    pub bias_tendency_text: String,
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    SessionOutOfRange,
    SessionStateConflict,
    InvalidDataset,
    InvalidRequest,
    InternalError,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiError {
    pub schema_version: String,
    pub error_code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(error_code: ErrorCode, message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            error_code,
            message: message.into(),
            details,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.error_code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({details})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}
