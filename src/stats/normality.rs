//! Shapiro–Wilk test for normality.
//!
//! Coefficients and the p-value transformation follow Royston's AS R94
//! approximation, valid for 3 <= n <= 5000.

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::warn;

const TEST: &str = "Shapiro-Wilk";

const C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.07119, 4.434685, -2.706056];
const C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const C3: [f64; 4] = [0.544, -0.39978, 0.025054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const G: [f64; 2] = [-2.273, 0.459];

/// Result of a Shapiro–Wilk test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapiroWilk {
    pub n: usize,
    pub w: f64,
    pub p_value: f64,
}

/// Run the Shapiro–Wilk test on `values`.
pub fn shapiro_wilk(values: &[f64]) -> Result<ShapiroWilk, AnalysisError> {
    let n = values.len();
    if n < 3 {
        return Err(AnalysisError::InsufficientData {
            test: TEST,
            needed: 3,
            got: n,
        });
    }
    if n > 5000 {
        warn!("{}: p-value may be inaccurate for n = {} > 5000", TEST, n);
    }

    let mut x = values.to_vec();
    x.sort_by(f64::total_cmp);

    let range = x[n - 1] - x[0];
    if !(range > 1e-19) {
        return Err(AnalysisError::degenerate(TEST, "all values are identical"));
    }

    let normal = standard_normal()?;
    let a = coefficients(n, &normal);

    let mean = x.iter().sum::<f64>() / n as f64;
    let ss: f64 = x.iter().map(|v| (v - mean).powi(2)).sum();
    let numerator: f64 = (0..n / 2).map(|i| a[i] * (x[n - 1 - i] - x[i])).sum();
    let w = (numerator * numerator / ss).min(1.0);

    Ok(ShapiroWilk {
        n,
        w,
        p_value: p_value(w, n, &normal),
    })
}

fn standard_normal() -> Result<Normal, AnalysisError> {
    Normal::new(0.0, 1.0).map_err(|e| AnalysisError::Distribution(e.to_string()))
}

/// Horner evaluation of `c[0] + c[1] x + c[2] x^2 + ...`.
fn poly(c: &[f64], x: f64) -> f64 {
    c.iter().rev().fold(0.0, |acc, &ci| acc * x + ci)
}

/// The `n / 2` antisymmetric weights, largest first.
fn coefficients(n: usize, normal: &Normal) -> Vec<f64> {
    let half = n / 2;
    if n == 3 {
        return vec![std::f64::consts::FRAC_1_SQRT_2];
    }

    let an = n as f64;
    let m: Vec<f64> = (1..=half)
        .map(|i| normal.inverse_cdf((i as f64 - 0.375) / (an + 0.25)))
        .collect();

    let summ2 = 2.0 * m.iter().map(|v| v * v).sum::<f64>();
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / an.sqrt();

    let mut a = vec![0.0; half];
    let a1 = poly(&C1, rsn) - m[0] / ssumm2;
    a[0] = a1;

    let (first_free, fac) = if n > 5 {
        let a2 = -m[1] / ssumm2 + poly(&C2, rsn);
        a[1] = a2;
        let fac = ((summ2 - 2.0 * m[0].powi(2) - 2.0 * m[1].powi(2))
            / (1.0 - 2.0 * a1.powi(2) - 2.0 * a2.powi(2)))
        .sqrt();
        (2, fac)
    } else {
        let fac = ((summ2 - 2.0 * m[0].powi(2)) / (1.0 - 2.0 * a1.powi(2))).sqrt();
        (1, fac)
    };

    for i in first_free..half {
        a[i] = -m[i] / fac;
    }
    a
}

fn p_value(w: f64, n: usize, normal: &Normal) -> f64 {
    if n == 3 {
        let p = 6.0 / std::f64::consts::PI * (w.sqrt().asin() - std::f64::consts::FRAC_PI_3);
        return p.clamp(0.0, 1.0);
    }

    let an = n as f64;
    let mut y = (1.0 - w).ln();
    let (m, s) = if n <= 11 {
        let gamma = poly(&G, an);
        if y >= gamma {
            return 1e-99;
        }
        y = -(gamma - y).ln();
        (poly(&C3, an), poly(&C4, an).exp())
    } else {
        let ln_n = an.ln();
        (poly(&C5, ln_n), poly(&C6, ln_n).exp())
    };

    normal.sf((y - m) / s).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_reference_sample() {
        let data = [
            148.0, 154.0, 158.0, 160.0, 161.0, 162.0, 166.0, 170.0, 182.0, 195.0, 236.0,
        ];
        let result = shapiro_wilk(&data).unwrap();
        assert_eq!(result.n, 11);
        assert!(close(result.w, 0.78881, 1e-4), "w = {}", result.w);
        assert!(close(result.p_value, 0.006704, 1e-4), "p = {}", result.p_value);
    }

    #[test]
    fn test_three_points() {
        let result = shapiro_wilk(&[1.0, 2.0, 3.0]).unwrap();
        assert!(close(result.w, 1.0, 1e-12));
        assert!(close(result.p_value, 1.0, 1e-9));

        let result = shapiro_wilk(&[1.0, 2.0, 4.0]).unwrap();
        assert!(close(result.w, 0.964286, 1e-5));
        assert!(close(result.p_value, 0.636887, 1e-4));
    }

    #[test]
    fn test_order_does_not_matter() {
        let a = shapiro_wilk(&[2.1, 3.4, 1.9, 5.6, 4.4, 3.3, 2.8, 4.0]).unwrap();
        let b = shapiro_wilk(&[5.6, 4.4, 4.0, 3.4, 3.3, 2.8, 2.1, 1.9]).unwrap();
        assert!(close(a.w, b.w, 1e-12));
        assert!(close(a.w, 0.964413, 1e-5));
        assert!(close(a.p_value, 0.850933, 1e-4));
    }

    #[test]
    fn test_skewed_data_is_not_normal() {
        let data = [
            1.0, 1.0, 1.0, 1.0, 2.0, 2.0, 3.0, 10.0, 50.0, 100.0, 200.0, 400.0,
        ];
        let result = shapiro_wilk(&data).unwrap();
        assert!(result.w < 0.7);
        assert!(result.p_value < 0.05);
    }

    #[test]
    fn test_normal_quantiles_look_normal() {
        let normal = Normal::new(0.0, 1.0).unwrap();
        let data: Vec<f64> = (1..=20)
            .map(|i| normal.inverse_cdf((i as f64 - 0.5) / 20.0))
            .collect();
        let result = shapiro_wilk(&data).unwrap();
        assert!(result.w > 0.99);
        assert!(result.p_value > 0.05);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(matches!(
            shapiro_wilk(&[1.0, 2.0]),
            Err(AnalysisError::InsufficientData { got: 2, .. })
        ));
        assert!(matches!(
            shapiro_wilk(&[5.0, 5.0, 5.0, 5.0]),
            Err(AnalysisError::Degenerate { .. })
        ));
    }

    #[test]
    fn test_poly() {
        assert!(close(poly(&[1.0, 2.0, 3.0], 2.0), 17.0, 1e-12));
        assert!(close(poly(&G, 10.0), 2.317, 1e-12));
    }
}
