use std::time::Duration;

use contracts::{
    AdvanceOutcome, BiasTendency, PopulationStats, Scenario, ScenarioOption, SessionPhase, Side,
    SpeedTendency,
};
use dilemma_core::{analyze, ManualClock, Session, SessionState};
use proptest::prelude::*;

fn option(title: &str, left: u8) -> ScenarioOption {
    ScenarioOption {
        title: title.to_string(),
        description: format!("{title} description"),
        consequence: format!("{title} consequence"),
        stats: PopulationStats {
            left,
            right: 100 - left,
        },
    }
}

fn dataset(count: usize) -> Vec<Scenario> {
    (0..count)
        .map(|index| Scenario {
            id: index as u32 + 1,
            title: format!("dilemma {}", index + 1),
            description: "two paths".to_string(),
            left_choice: option(&format!("left {}", index + 1), 55),
            right_choice: option(&format!("right {}", index + 1), 55),
            ethics: "commentary".to_string(),
        })
        .collect()
}

/// Plays a full run, spending `millis[i]` on scenario `i`.
fn play(sides: &[Side], millis: &[u64]) -> Session<ManualClock> {
    let clock = ManualClock::new();
    let mut session = Session::new(clock.clone());
    session.start(dataset(sides.len())).expect("start");

    for (side, spent) in sides.iter().zip(millis) {
        clock.advance(Duration::from_millis(*spent));
        session.decide(*side).expect("decide");
        session.advance().expect("advance");
    }
    session
}

#[test]
fn full_run_history_matches_scenario_count() {
    let sides = [Side::Left, Side::Right, Side::Left, Side::Left];
    let session = play(&sides, &[1_000, 2_000, 3_000, 4_000]);

    assert!(session.is_complete());
    assert_eq!(session.choice_history().len(), sides.len());
    assert_eq!(session.decision_times().len(), sides.len());
    assert_eq!(session.current_index(), sides.len());
}

#[test]
fn analyze_before_completion_is_invalid_state() {
    let clock = ManualClock::new();
    let mut session = Session::new(clock);
    assert!(analyze(&session).expect_err("not started").is_invalid_state());

    session.start(dataset(2)).expect("start");
    session.decide(Side::Left).expect("decide");
    session.advance().expect("advance");
    assert!(analyze(&session).expect_err("mid run").is_invalid_state());
}

#[test]
fn three_left_decisions_are_left_leaning() {
    let session = play(&[Side::Left; 3], &[2_000, 3_000, 4_000]);
    let report = analyze(&session).expect("analyze");

    assert_eq!(report.left_percent, 100);
    assert_eq!(report.bias_tendency, BiasTendency::LeftLeaning);
    assert_eq!(report.average_time, 3.0);
    assert_eq!(report.speed_tendency, SpeedTendency::Intuitive);
}

#[test]
fn average_of_exactly_five_seconds_is_deliberate() {
    let session = play(&[Side::Left, Side::Right], &[4_000, 6_000]);
    let report = analyze(&session).expect("analyze");
    assert_eq!(report.average_time, 5.0);
    assert_eq!(report.speed_tendency, SpeedTendency::Deliberate);
    assert_eq!(report.bias_tendency, BiasTendency::ContextDependent);
}

#[test]
fn advance_on_complete_session_is_out_of_range() {
    let mut session = play(&[Side::Right], &[500]);
    assert!(session.advance().expect_err("advance").is_out_of_range());
    assert!(session.decide(Side::Left).expect_err("decide").is_out_of_range());
}

#[test]
fn final_advance_reports_completion() {
    let clock = ManualClock::new();
    let mut session = Session::new(clock);
    session.start(dataset(1)).expect("start");
    session.decide(Side::Left).expect("decide");
    assert_eq!(session.advance().expect("advance"), AdvanceOutcome::Complete);
    assert_eq!(session.phase(), SessionPhase::Complete);
}

fn side_strategy() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Left), Just(Side::Right)]
}

proptest! {
    #[test]
    fn history_lengths_track_index_through_a_run(
        steps in prop::collection::vec((side_strategy(), 0_u64..20_000), 1..12),
    ) {
        let clock = ManualClock::new();
        let mut session = Session::new(clock.clone());
        session.start(dataset(steps.len())).expect("start");

        for (index, (side, spent)) in steps.iter().enumerate() {
            prop_assert_eq!(session.choice_history().len(), index);
            prop_assert_eq!(session.decision_times().len(), index);
            prop_assert_eq!(session.current_index(), index);

            clock.advance(Duration::from_millis(*spent));
            let outcome = session.decide(*side).expect("decide");
            prop_assert!(outcome.record.decision_time_seconds >= 0.0);
            prop_assert_eq!(session.choice_history().len(), index + 1);
            prop_assert!(session.decide(*side).expect_err("twice").is_invalid_state());

            session.advance().expect("advance");
        }

        prop_assert!(session.is_complete());
        prop_assert_eq!(session.choice_history().len(), steps.len());
        prop_assert_eq!(session.decision_times().len(), steps.len());
    }

    #[test]
    fn analysis_history_preserves_decision_order(
        sides in prop::collection::vec(side_strategy(), 1..16),
    ) {
        let millis = vec![1_000; sides.len()];
        let session = play(&sides, &millis);
        let report = analyze(&session).expect("analyze");

        prop_assert_eq!(report.history.len(), sides.len());
        for (index, (entry, side)) in report.history.iter().zip(&sides).enumerate() {
            prop_assert_eq!(entry.number, index + 1);
            prop_assert_eq!(&entry.scenario_title, &format!("dilemma {}", index + 1));
            prop_assert_eq!(&entry.choice_title, &format!("{} {}", side, index + 1));
        }
    }

    #[test]
    fn reset_after_any_progress_equals_fresh_state(
        sides in prop::collection::vec(side_strategy(), 1..8),
        decided in 0_usize..8,
        decide_last in any::<bool>(),
    ) {
        let clock = ManualClock::new();
        let mut session = Session::new(clock.clone());
        session.start(dataset(sides.len())).expect("start");

        let advanced = decided.min(sides.len() - 1);
        for side in &sides[..advanced] {
            clock.advance(Duration::from_millis(700));
            session.decide(*side).expect("decide");
            session.advance().expect("advance");
        }
        if decide_last {
            session.decide(sides[advanced]).expect("decide");
        }

        session.reset();
        prop_assert_eq!(session.state(), &SessionState::default());
        prop_assert_eq!(session.phase(), SessionPhase::NotStarted);
    }
}
