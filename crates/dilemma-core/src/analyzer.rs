//! End-of-run summary: average decision time, speed and side-bias tendencies,
//! and the literal decision history.

use contracts::{
    AnalysisReport, BiasTendency, ChoiceRecord, HistoryEntry, SessionPhase, Side, SpeedTendency,
    SCHEMA_VERSION_V1,
};

use crate::clock::Clock;
use crate::session::{Session, SessionError};

pub const FAST_THRESHOLD_SECONDS: f64 = 5.0;
pub const DELIBERATE_THRESHOLD_SECONDS: f64 = 10.0;
pub const LEFT_LEANING_PERCENT: u32 = 70;
pub const RIGHT_LEANING_PERCENT: u32 = 30;

/// Rounds half away from zero to one decimal place.
pub fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Mean of `times` rounded to one decimal place; `0.0` for an empty slice.
pub fn average_time(times: &[f64]) -> f64 {
    if times.is_empty() {
        return 0.0;
    }
    round_tenths(times.iter().sum::<f64>() / times.len() as f64)
}

pub fn classify_speed(average_time: f64) -> SpeedTendency {
    if average_time < FAST_THRESHOLD_SECONDS {
        SpeedTendency::Intuitive
    } else if average_time < DELIBERATE_THRESHOLD_SECONDS {
        SpeedTendency::Deliberate
    } else {
        SpeedTendency::Contemplative
    }
}

/// Share of left decisions over `scenario_count`, rounded to a whole percent.
pub fn left_percent(records: &[ChoiceRecord], scenario_count: usize) -> u32 {
    if scenario_count == 0 {
        return 0;
    }
    let lefts = records
        .iter()
        .filter(|record| record.side == Side::Left)
        .count();
    (100.0 * lefts as f64 / scenario_count as f64).round() as u32
}

/// Exact 70 and 30 fall through to [`BiasTendency::ContextDependent`].
pub fn classify_bias(left_percent: u32) -> BiasTendency {
    if left_percent > LEFT_LEANING_PERCENT {
        BiasTendency::LeftLeaning
    } else if left_percent < RIGHT_LEANING_PERCENT {
        BiasTendency::RightLeaning
    } else {
        BiasTendency::ContextDependent
    }
}

pub fn history(records: &[ChoiceRecord]) -> Vec<HistoryEntry> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| HistoryEntry {
            number: index + 1,
            scenario_title: record.scenario_title.clone(),
            choice_title: record.choice_title.clone(),
            decision_time_seconds: record.decision_time_seconds,
        })
        .collect()
}

/// Builds the report from raw run data without checking completion.
pub fn analyze_records(
    records: &[ChoiceRecord],
    decision_times: &[f64],
    scenario_count: usize,
) -> AnalysisReport {
    let average_time = average_time(decision_times);
    let speed_tendency = classify_speed(average_time);
    let left_percent = left_percent(records, scenario_count);
    let bias_tendency = classify_bias(left_percent);

    AnalysisReport {
        schema_version: SCHEMA_VERSION_V1.to_string(),
        average_time,
        left_percent,
        speed_tendency,
        speed_tendency_text: speed_tendency.narrative().to_string(),
        bias_tendency,
        bias_tendency_text: bias_tendency.narrative().to_string(),
        history: history(records),
    }
}

pub fn analyze<C: Clock>(session: &Session<C>) -> Result<AnalysisReport, SessionError> {
    let phase = session.phase();
    if phase != SessionPhase::Complete {
        return Err(SessionError::InvalidState {
            operation: "analyze",
            phase,
            reason: "the run is not complete",
        });
    }

    Ok(analyze_records(
        session.choice_history(),
        session.decision_times(),
        session.scenarios().len(),
    ))
}
