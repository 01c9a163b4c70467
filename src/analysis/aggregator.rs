//! Result aggregation and highlights.
//!
//! This module provides helpers that pick the headline numbers out of a
//! finished run for the console and the report.

use crate::models::{AgeComposition, ObjectiveResult, RunSummary, StateRates, TestResult};

/// All tests whose null hypothesis was rejected.
pub fn significant_tests(results: &[ObjectiveResult]) -> Vec<&TestResult> {
    results
        .iter()
        .flat_map(|r| r.tests.iter())
        .filter(|t| t.significant)
        .collect()
}

/// Objectives that were recorded as failed.
pub fn failed_objectives(results: &[ObjectiveResult]) -> Vec<&ObjectiveResult> {
    results.iter().filter(|r| !r.successful).collect()
}

/// The `n` states with the largest male minus female participation gap.
pub fn widest_gender_gaps(rates: &[StateRates], n: usize) -> Vec<&StateRates> {
    let mut sorted: Vec<&StateRates> = rates.iter().collect();
    sorted.sort_by(|a, b| {
        let gap_a = a.male_rate - a.female_rate;
        let gap_b = b.male_rate - b.female_rate;
        gap_b.total_cmp(&gap_a)
    });
    sorted.truncate(n);
    sorted
}

/// States ranked by overall participation, highest first.
pub fn rank_by_participation(rates: &[StateRates]) -> Vec<&StateRates> {
    let mut sorted: Vec<&StateRates> = rates.iter().collect();
    sorted.sort_by(|a, b| b.participation_rate.total_cmp(&a.participation_rate));
    sorted
}

/// Age group with the most workers.
pub fn largest_age_group(composition: &[AgeComposition]) -> Option<&AgeComposition> {
    composition.iter().max_by(|a, b| a.total().total_cmp(&b.total()))
}

/// Share of main workers among all workers, as a percentage.
pub fn main_worker_share(composition: &[AgeComposition]) -> Option<f64> {
    let total: f64 = composition.iter().map(AgeComposition::total).sum();
    if total > 0.0 {
        let main: f64 = composition.iter().map(|c| c.main_workers).sum();
        Some(100.0 * main / total)
    } else {
        None
    }
}

/// Generate a text summary of the run.
pub fn generate_summary_text(summary: &RunSummary) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "Objectives: {} ({} failed)",
        summary.objectives, summary.failed
    ));
    lines.push(format!(
        "Tests: {} ({} significant)",
        summary.tests, summary.significant
    ));
    lines.push(format!("Charts: {}", summary.charts));

    lines.join("\n")
}
