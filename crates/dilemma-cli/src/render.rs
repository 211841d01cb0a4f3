//! Plain-text screens for the terminal driver.

use std::fmt::Write;

use contracts::{AnalysisReport, DecisionOutcome, PopulationStats, ScenarioView};

const BAR_WIDTH: usize = 20;

pub fn scenario_screen(view: &ScenarioView) -> String {
    let scenario = &view.scenario;
    let mut out = String::new();
    let _ = writeln!(out, "Scenario {} / {}: {}", view.number, view.total, scenario.title);
    let _ = writeln!(out, "{}", scenario.description);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  [left]  {}: {}",
        scenario.left_choice.title, scenario.left_choice.description
    );
    let _ = writeln!(
        out,
        "  [right] {}: {}",
        scenario.right_choice.title, scenario.right_choice.description
    );
    let _ = write!(out, "Choose left or right (l/r): ");
    out
}

pub fn timer_line(elapsed_seconds: f64) -> String {
    format!("\r  {elapsed_seconds:.1}s ")
}

pub fn result_screen(outcome: &DecisionOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "You chose: {}", outcome.record.choice_title);
    let _ = writeln!(out, "{}", outcome.record.consequence);
    let _ = writeln!(
        out,
        "Decision time: {:.1}s",
        outcome.record.decision_time_seconds
    );
    if !outcome.ethics.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Ethical perspective: {}", outcome.ethics);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "How others chose:");
    let _ = write!(
        out,
        "{}",
        stats_lines(&outcome.scenario_stats, &outcome.left_title, &outcome.right_title)
    );
    out
}

fn stats_lines(stats: &PopulationStats, left_title: &str, right_title: &str) -> String {
    let width = left_title.chars().count().max(right_title.chars().count());
    format!(
        "  {left_title:<width$} {} {}%\n  {right_title:<width$} {} {}%\n",
        bar(stats.left),
        stats.left,
        bar(stats.right),
        stats.right,
    )
}

fn bar(percent: u8) -> String {
    let filled = (usize::from(percent.min(100)) * BAR_WIDTH + 50) / 100;
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

pub fn report_screen(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Average decision time: {:.1}s", report.average_time);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", report.speed_tendency_text);
    let _ = writeln!(out, "{}", report.bias_tendency_text);
    let _ = writeln!(out);
    let _ = writeln!(out, "Your choices:");
    for entry in &report.history {
        let _ = writeln!(out, "  Scenario {}: {}", entry.number, entry.scenario_title);
        let _ = writeln!(out, "    Choice: {}", entry.choice_title);
        let _ = writeln!(
            out,
            "    Decision time: {:.1}s",
            entry.decision_time_seconds
        );
    }
    out
}
