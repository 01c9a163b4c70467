//! Histogram binning and Gaussian kernel density estimation.

use super::descriptive::sample_std;
use serde::{Deserialize, Serialize};

/// Equal-width histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// `counts.len() + 1` ascending bin edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width bins spanning their range.
    ///
    /// The last bin is closed on the right. A constant series is centred in
    /// a unit-wide range.
    pub fn from_values(values: &[f64], bins: usize) -> Self {
        let bins = bins.max(1);
        let (mut lo, mut hi) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if values.is_empty() {
            lo = 0.0;
            hi = 1.0;
        } else if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();

        let mut counts = vec![0; bins];
        for &v in values {
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Self { edges, counts }
    }

    pub fn bin_width(&self) -> f64 {
        self.edges[1] - self.edges[0]
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Gaussian KDE with Scott's bandwidth, evaluated on `points` evenly spaced
/// samples over `[lo, hi]`. Returns `(x, density)` pairs.
///
/// Empty when the series has fewer than two values or zero variance.
pub fn gaussian_kde(values: &[f64], lo: f64, hi: f64, points: usize) -> Vec<(f64, f64)> {
    let n = values.len();
    let std = sample_std(values);
    if n < 2 || !(std > 0.0) || points < 2 {
        return Vec::new();
    }

    let bandwidth = std * (n as f64).powf(-0.2);
    let norm = 1.0 / (n as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    let step = (hi - lo) / (points - 1) as f64;

    (0..points)
        .map(|i| {
            let x = lo + step * i as f64;
            let density: f64 = values
                .iter()
                .map(|v| {
                    let z = (x - v) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum::<f64>()
                * norm;
            (x, density)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_counts_everything() {
        let values = [30.0, 31.0, 35.0, 40.0, 45.0, 50.0, 50.0];
        let hist = Histogram::from_values(&values, 4);
        assert_eq!(hist.edges.len(), 5);
        assert_eq!(hist.counts.iter().sum::<usize>(), values.len());
        assert_eq!(hist.counts, vec![2, 1, 1, 3]);
        assert!((hist.bin_width() - 5.0).abs() < 1e-12);
        assert_eq!(hist.max_count(), 3);
    }

    #[test]
    fn test_histogram_constant_series() {
        let hist = Histogram::from_values(&[42.0, 42.0], 10);
        assert_eq!(hist.counts.iter().sum::<usize>(), 2);
        assert!((hist.edges[0] - 41.5).abs() < 1e-12);
    }

    #[test]
    fn test_kde_integrates_to_about_one() {
        let values = [38.0, 40.0, 41.0, 42.5, 44.0, 47.0, 39.5];
        let curve = gaussian_kde(&values, 0.0, 100.0, 2001);
        let step = curve[1].0 - curve[0].0;
        let area: f64 = curve.iter().map(|(_, d)| d * step).sum();
        assert!((area - 1.0).abs() < 1e-3, "area = {}", area);
    }

    #[test]
    fn test_kde_degenerate() {
        assert!(gaussian_kde(&[1.0], 0.0, 2.0, 10).is_empty());
        assert!(gaussian_kde(&[3.0, 3.0, 3.0], 0.0, 5.0, 10).is_empty());
    }
}
