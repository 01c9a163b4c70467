//! Paired (related-samples) t-test.

use super::descriptive::{mean, sample_std};
use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

const TEST: &str = "paired t-test";

/// Result of a two-sided paired t-test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairedTTest {
    pub n: usize,
    pub mean_difference: f64,
    pub t_statistic: f64,
    pub df: f64,
    pub p_value: f64,
}

/// Test whether the mean of `a - b` differs from zero.
pub fn paired_t_test(a: &[f64], b: &[f64]) -> Result<PairedTTest, AnalysisError> {
    if a.len() != b.len() {
        return Err(AnalysisError::LengthMismatch {
            test: TEST,
            left: a.len(),
            right: b.len(),
        });
    }
    let n = a.len();
    if n < 2 {
        return Err(AnalysisError::InsufficientData {
            test: TEST,
            needed: 2,
            got: n,
        });
    }

    let diffs: Vec<f64> = a.iter().zip(b).map(|(x, y)| x - y).collect();
    let d_mean = mean(&diffs);
    let d_std = sample_std(&diffs);
    if !(d_std > 0.0) {
        return Err(AnalysisError::degenerate(
            TEST,
            "differences have zero variance",
        ));
    }

    let t = d_mean / (d_std / (n as f64).sqrt());
    let df = (n - 1) as f64;
    let dist =
        StudentsT::new(0.0, 1.0, df).map_err(|e| AnalysisError::Distribution(e.to_string()))?;
    let p_value = (2.0 * dist.sf(t.abs())).clamp(0.0, 1.0);

    Ok(PairedTTest {
        n,
        mean_difference: d_mean,
        t_statistic: t,
        df,
        p_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_known_values() {
        let result = paired_t_test(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0; 5]).unwrap();
        assert_eq!(result.n, 5);
        assert!(close(result.mean_difference, 1.0, 1e-12));
        assert!(close(result.t_statistic, 2f64.sqrt(), 1e-12));
        assert!(close(result.df, 4.0, 1e-12));
        assert!(close(result.p_value, 0.230200, 1e-4), "p = {}", result.p_value);
    }

    #[test]
    fn test_sign_of_statistic() {
        let forward = paired_t_test(&[10.0, 12.0, 15.0], &[8.0, 11.0, 11.0]).unwrap();
        let backward = paired_t_test(&[8.0, 11.0, 11.0], &[10.0, 12.0, 15.0]).unwrap();
        assert!(forward.t_statistic > 0.0);
        assert!(close(forward.t_statistic, -backward.t_statistic, 1e-12));
        assert!(close(forward.p_value, backward.p_value, 1e-12));
    }

    #[test]
    fn test_length_mismatch() {
        assert!(matches!(
            paired_t_test(&[1.0, 2.0], &[1.0]),
            Err(AnalysisError::LengthMismatch { left: 2, right: 1, .. })
        ));
    }

    #[test]
    fn test_identical_series_is_degenerate() {
        let a = [40.0, 35.5, 42.0];
        assert!(matches!(
            paired_t_test(&a, &a),
            Err(AnalysisError::Degenerate { .. })
        ));
    }
}
