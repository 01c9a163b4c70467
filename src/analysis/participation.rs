//! Workforce participation rates per state.

use super::subsets::{duplicate_states, state_totals};
use crate::config::{ColumnsConfig, Config};
use crate::error::AnalysisError;
use crate::models::{ObjectiveKind, ObjectiveResult, StateRates};
use crate::stats::SeriesSummary;
use crate::table::Table;
use tracing::{info, warn};

/// Percentage of `persons` who are `workers`, element-wise.
pub fn participation_rates(workers: &[f64], persons: &[f64]) -> Result<Vec<f64>, AnalysisError> {
    if workers.len() != persons.len() {
        return Err(AnalysisError::LengthMismatch {
            test: "participation rate",
            left: workers.len(),
            right: persons.len(),
        });
    }
    workers
        .iter()
        .zip(persons)
        .enumerate()
        .map(|(i, (&w, &p))| {
            if p == 0.0 {
                Err(AnalysisError::degenerate(
                    "participation rate",
                    format!("row {} has zero persons", i + 1),
                ))
            } else {
                Ok(100.0 * w / p)
            }
        })
        .collect()
}

/// Rates of each state-level row, plus any caveats raised on the way.
pub fn state_rates(states: &Table, config: &Config) -> Result<(Vec<StateRates>, Vec<String>), AnalysisError> {
    let cols = &config.columns;
    let mut notes = Vec::new();

    let codes = states.text(&cols.state_code)?;
    let duplicates = duplicate_states(&codes);
    if !duplicates.is_empty() {
        let note = format!(
            "expected one state-level row per state, found repeats for: {}",
            duplicates.join(", ")
        );
        warn!("{}", note);
        notes.push(note);
    }

    let persons = states.numeric(&cols.total_persons)?;
    let workers = states.numeric(&cols.total_workers)?;
    let overall = participation_rates(&workers, &persons)?;

    let (male, female) = if has_workers_by_sex(states, cols) {
        let males = states.numeric(&cols.total_males)?;
        let females = states.numeric(&cols.total_females)?;
        (
            participation_rates(&states.numeric(&cols.male_workers)?, &males)?,
            participation_rates(&states.numeric(&cols.female_workers)?, &females)?,
        )
    } else {
        let note = format!(
            "'{}'/'{}' not found; workers apportioned by population share, so male and female rates equal the overall rate",
            cols.male_workers, cols.female_workers
        );
        warn!("{}", note);
        notes.push(note);
        // (workers * males / persons) / males reduces to workers / persons
        (overall.clone(), overall.clone())
    };

    let rates = codes
        .into_iter()
        .zip(overall)
        .zip(male.into_iter().zip(female))
        .map(|((state, participation_rate), (male_rate, female_rate))| StateRates {
            state,
            participation_rate,
            male_rate,
            female_rate,
        })
        .collect();

    Ok((rates, notes))
}

fn has_workers_by_sex(table: &Table, cols: &ColumnsConfig) -> bool {
    table.has_column(&cols.male_workers) && table.has_column(&cols.female_workers)
}

/// Distribution of the overall participation rate across states.
pub fn analyze(table: &Table, config: &Config) -> Result<ObjectiveResult, AnalysisError> {
    let states = state_totals(table, config)?;
    let (rates, notes) = state_rates(&states, config)?;

    let values: Vec<f64> = rates.iter().map(|r| r.participation_rate).collect();
    let summary = SeriesSummary::from_values(&values).ok_or(AnalysisError::InsufficientData {
        test: "participation rate summary",
        needed: 1,
        got: 0,
    })?;
    info!(
        "Participation rate over {} states: mean {:.2}%",
        summary.count, summary.mean
    );

    let mut result = ObjectiveResult::new(ObjectiveKind::ParticipationRate);
    result.summary = Some(summary);
    result.state_rates = rates;
    result.notes = notes;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::subsets::fixtures::census_table;

    #[test]
    fn test_rate_example() {
        let rates = participation_rates(&[40.0], &[100.0]).unwrap();
        assert_eq!(rates, vec![40.0]);
    }

    #[test]
    fn test_zero_persons_is_degenerate() {
        assert!(matches!(
            participation_rates(&[0.0], &[0.0]),
            Err(AnalysisError::Degenerate { .. })
        ));
    }

    #[test]
    fn test_rates_match_formula_and_bounds() {
        let table = census_table();
        let config = Config::default();
        let states = state_totals(&table, &config).unwrap();
        let (rates, notes) = state_rates(&states, &config).unwrap();

        assert!(notes.is_empty());
        let workers = states.numeric("Total_Workers").unwrap();
        let persons = states.numeric("Total_Persons").unwrap();
        for (i, rate) in rates.iter().enumerate() {
            let expected = 100.0 * workers[i] / persons[i];
            assert!((rate.participation_rate - expected).abs() < 1e-12);
            assert!((0.0..=100.0).contains(&rate.participation_rate));
            assert!((0.0..=100.0).contains(&rate.male_rate));
            assert!((0.0..=100.0).contains(&rate.female_rate));
        }
    }

    #[test]
    fn test_fallback_without_workers_by_sex() {
        let table = census_table();
        let mut config = Config::default();
        config.columns.male_workers = "Workers_M".to_string();

        let states = state_totals(&table, &config).unwrap();
        let (rates, notes) = state_rates(&states, &config).unwrap();
        assert_eq!(notes.len(), 1);
        for rate in rates {
            assert_eq!(rate.male_rate, rate.participation_rate);
            assert_eq!(rate.female_rate, rate.participation_rate);
        }
    }

    #[test]
    fn test_analyze() {
        let result = analyze(&census_table(), &Config::default()).unwrap();
        assert_eq!(result.kind, ObjectiveKind::ParticipationRate);
        assert!(result.successful);
        assert_eq!(result.state_rates.len(), 5);
        assert_eq!(result.summary.unwrap().count, 5);
    }
}
