use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use contracts::{ApiError, ErrorCode, Scenario, ScenarioSet};

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read scenario dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("scenario dataset is not valid json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("scenario dataset is empty")]
    Empty,
    #[error("scenario id {0} appears more than once")]
    DuplicateId(u32),
    #[error("scenario {scenario_id} has a population stat of {value}% (expected 0-100)")]
    StatOutOfRange { scenario_id: u32, value: u8 },
}

impl From<DatasetError> for ApiError {
    fn from(value: DatasetError) -> Self {
        ApiError::new(
            ErrorCode::InvalidDataset,
            "scenario dataset rejected",
            Some(value.to_string()),
        )
    }
}

pub fn load_scenarios(path: impl AsRef<Path>) -> Result<Vec<Scenario>, DatasetError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_scenarios(&raw)
}

pub fn parse_scenarios(raw: &str) -> Result<Vec<Scenario>, DatasetError> {
    let set: ScenarioSet = serde_json::from_str(raw)?;
    let scenarios = set.into_scenarios();
    validate_scenarios(&scenarios)?;
    Ok(scenarios)
}

pub fn validate_scenarios(scenarios: &[Scenario]) -> Result<(), DatasetError> {
    if scenarios.is_empty() {
        return Err(DatasetError::Empty);
    }

    let mut seen = BTreeSet::new();
    for scenario in scenarios {
        if !seen.insert(scenario.id) {
            return Err(DatasetError::DuplicateId(scenario.id));
        }
        for option in [&scenario.left_choice, &scenario.right_choice] {
            if option.stats.is_in_range() {
                continue;
            }
            let value = option.stats.left.max(option.stats.right);
            return Err(DatasetError::StatOutOfRange {
                scenario_id: scenario.id,
                value,
            });
        }
    }
    Ok(())
}
