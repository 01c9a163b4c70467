//! Pairwise correlation of worker-type counts across states.

use super::subsets::state_totals;
use crate::config::Config;
use crate::error::AnalysisError;
use crate::models::{ObjectiveKind, ObjectiveResult};
use crate::stats::correlation_matrix;
use crate::table::Table;
use tracing::{debug, warn};

pub fn analyze(table: &Table, config: &Config) -> Result<ObjectiveResult, AnalysisError> {
    let states = state_totals(table, config)?;

    let columns = config
        .columns
        .worker_types
        .iter()
        .map(|name| -> Result<(String, Vec<f64>), AnalysisError> {
            Ok((name.clone(), states.numeric(name)?))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let matrix = correlation_matrix(&columns)?;
    debug!("Correlation matrix over {} states", states.len());

    let mut result = ObjectiveResult::new(ObjectiveKind::WorkerTypeCorrelation);
    for i in 0..matrix.size() {
        for j in (i + 1)..matrix.size() {
            if matrix.get(i, j).is_nan() {
                let note = format!(
                    "correlation of {} and {} is undefined (constant column)",
                    matrix.labels[i], matrix.labels[j]
                );
                warn!("{}", note);
                result.notes.push(note);
            }
        }
    }

    result.correlation = Some(matrix);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::subsets::fixtures::census_table;

    #[test]
    fn test_matrix_symmetric_unit_diagonal() {
        let result = analyze(&census_table(), &Config::default()).unwrap();
        let matrix = result.correlation.unwrap();

        assert_eq!(matrix.size(), 4);
        assert_eq!(matrix.labels[0], "Cultivators");
        for i in 0..4 {
            assert_eq!(matrix.get(i, i), 1.0);
            for j in 0..4 {
                assert_eq!(matrix.get(i, j), matrix.get(j, i));
                assert!(matrix.get(i, j).abs() <= 1.0);
            }
        }
        assert!(result.notes.is_empty());
    }

    #[test]
    fn test_constant_column_noted() {
        let mut config = Config::default();
        // Distt_Code is 0 on every state-level row
        config.columns.worker_types = vec!["Cultivators".to_string(), "Distt_Code".to_string()];

        let result = analyze(&census_table(), &config).unwrap();
        assert!(result.correlation.unwrap().get(0, 1).is_nan());
        assert_eq!(result.notes.len(), 1);
    }

    #[test]
    fn test_unknown_worker_type() {
        let mut config = Config::default();
        config.columns.worker_types.push("Fishers".to_string());
        assert!(matches!(
            analyze(&census_table(), &config),
            Err(AnalysisError::Table(_))
        ));
    }
}
