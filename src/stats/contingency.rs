//! Chi-square test of independence on a contingency table.

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF};

const TEST: &str = "chi-square contingency";

/// Result of a chi-square independence test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChiSquareTest {
    pub statistic: f64,
    pub p_value: f64,
    pub dof: usize,
    /// Expected counts under independence.
    pub expected: Vec<Vec<f64>>,
    /// Whether Yates' continuity correction was applied.
    pub yates_corrected: bool,
}

/// Test independence of rows and columns of `observed`.
///
/// Yates' correction is applied when the table has one degree of freedom.
pub fn chi2_contingency(observed: &[Vec<f64>]) -> Result<ChiSquareTest, AnalysisError> {
    let rows = observed.len();
    let cols = observed.first().map(Vec::len).unwrap_or(0);
    if rows < 2 || cols < 2 {
        return Err(AnalysisError::InsufficientData {
            test: TEST,
            needed: 2,
            got: rows.min(cols),
        });
    }
    if observed.iter().any(|r| r.len() != cols) {
        return Err(AnalysisError::degenerate(TEST, "rows have different lengths"));
    }
    if observed.iter().flatten().any(|&v| v < 0.0 || !v.is_finite()) {
        return Err(AnalysisError::degenerate(
            TEST,
            "counts must be finite and non-negative",
        ));
    }

    let row_sums: Vec<f64> = observed.iter().map(|r| r.iter().sum()).collect();
    let col_sums: Vec<f64> = (0..cols)
        .map(|j| observed.iter().map(|r| r[j]).sum())
        .collect();
    let total: f64 = row_sums.iter().sum();

    let expected: Vec<Vec<f64>> = row_sums
        .iter()
        .map(|rs| col_sums.iter().map(|cs| rs * cs / total).collect())
        .collect();
    if expected.iter().flatten().any(|&e| !(e > 0.0)) {
        return Err(AnalysisError::degenerate(
            TEST,
            "an expected frequency is zero",
        ));
    }

    let dof = (rows - 1) * (cols - 1);
    let yates_corrected = dof == 1;

    let mut statistic = 0.0;
    for (obs_row, exp_row) in observed.iter().zip(&expected) {
        for (&o, &e) in obs_row.iter().zip(exp_row) {
            let mut diff = (o - e).abs();
            if yates_corrected {
                diff -= diff.min(0.5);
            }
            statistic += diff * diff / e;
        }
    }

    let dist = ChiSquared::new(dof as f64).map_err(|e| AnalysisError::Distribution(e.to_string()))?;
    let p_value = dist.sf(statistic).clamp(0.0, 1.0);

    Ok(ChiSquareTest {
        statistic,
        p_value,
        dof,
        expected,
        yates_corrected,
    })
}
