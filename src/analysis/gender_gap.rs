//! Male vs female participation: normality and paired difference tests.

use super::participation::state_rates;
use super::subsets::state_totals;
use crate::config::Config;
use crate::error::AnalysisError;
use crate::models::{ObjectiveKind, ObjectiveResult, TestResult};
use crate::stats::{paired_t_test, shapiro_wilk, SeriesSummary};
use crate::table::Table;
use tracing::info;

pub fn analyze(table: &Table, config: &Config) -> Result<ObjectiveResult, AnalysisError> {
    let alpha = config.analysis.alpha;
    let states = state_totals(table, config)?;
    let (rates, notes) = state_rates(&states, config)?;

    let male: Vec<f64> = rates.iter().map(|r| r.male_rate).collect();
    let female: Vec<f64> = rates.iter().map(|r| r.female_rate).collect();
    let gaps: Vec<f64> = male.iter().zip(&female).map(|(m, f)| m - f).collect();

    let normality = shapiro_wilk(&male)?;
    info!(
        "Shapiro-Wilk on male participation: W={:.4}, p={:.4}",
        normality.w, normality.p_value
    );

    let paired = paired_t_test(&male, &female)?;
    info!(
        "Paired t-test male vs female: mean gap {:.2}pp, t={:.4}, p={:.4}",
        paired.mean_difference, paired.t_statistic, paired.p_value
    );

    let mut result = ObjectiveResult::new(ObjectiveKind::GenderGap);
    result.summary = SeriesSummary::from_values(&gaps);
    result.tests = vec![
        TestResult::from_shapiro(&normality, "Male_Participation_Rate", alpha),
        TestResult::from_paired(
            &paired,
            "Male_Participation_Rate vs Female_Participation_Rate",
            alpha,
        ),
    ];
    result.state_rates = rates;
    result.notes = notes;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::subsets::fixtures::census_table;
    use crate::models::TestKind;

    #[test]
    fn test_analyze_runs_both_tests() {
        let result = analyze(&census_table(), &Config::default()).unwrap();

        assert_eq!(result.kind, ObjectiveKind::GenderGap);
        assert_eq!(result.tests.len(), 2);
        assert_eq!(result.tests[0].kind, TestKind::ShapiroWilk);
        assert_eq!(result.tests[1].kind, TestKind::PairedTTest);
        assert_eq!(result.tests[1].dof, Some(4.0));
        for test in &result.tests {
            assert!((0.0..=1.0).contains(&test.p_value));
        }

        // The fixture has male rates well above female rates in every state
        let gap = result.summary.unwrap();
        assert!(gap.min > 0.0);
        assert!(result.tests[1].statistic > 0.0);
    }

    #[test]
    fn test_apportioned_rates_are_degenerate() {
        let mut config = Config::default();
        config.columns.female_workers = "Workers_F".to_string();

        let err = analyze(&census_table(), &config).unwrap_err();
        assert!(matches!(err, AnalysisError::Degenerate { .. }));
    }
}
