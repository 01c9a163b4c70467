//! Pearson correlation and correlation matrices.

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// Square matrix of pairwise Pearson coefficients.
///
/// Always symmetric with a unit diagonal. Off-diagonal entries are NaN when
/// either column has zero variance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i][j]
    }

    pub fn size(&self) -> usize {
        self.labels.len()
    }

    /// Off-diagonal pairs ordered by absolute coefficient, strongest first.
    pub fn strongest_pairs(&self) -> Vec<(&str, &str, f64)> {
        let mut pairs = Vec::new();
        for i in 0..self.size() {
            for j in (i + 1)..self.size() {
                let r = self.values[i][j];
                if r.is_finite() {
                    pairs.push((self.labels[i].as_str(), self.labels[j].as_str(), r));
                }
            }
        }
        pairs.sort_by(|a, b| b.2.abs().total_cmp(&a.2.abs()));
        pairs
    }
}

/// Pearson's r between two aligned series. NaN when either is constant.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64, AnalysisError> {
    if x.len() != y.len() {
        return Err(AnalysisError::LengthMismatch {
            test: "Pearson correlation",
            left: x.len(),
            right: y.len(),
        });
    }
    if x.len() < 2 {
        return Err(AnalysisError::InsufficientData {
            test: "Pearson correlation",
            needed: 2,
            got: x.len(),
        });
    }

    let n = x.len() as f64;
    let mx = x.iter().sum::<f64>() / n;
    let my = y.iter().sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        let dx = a - mx;
        let dy = b - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return Ok(f64::NAN);
    }
    Ok((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// Pairwise correlation of named, equally long columns.
pub fn correlation_matrix(columns: &[(String, Vec<f64>)]) -> Result<CorrelationMatrix, AnalysisError> {
    let k = columns.len();
    let mut values = vec![vec![1.0; k]; k];

    for i in 0..k {
        for j in (i + 1)..k {
            let r = pearson(&columns[i].1, &columns[j].1)?;
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        labels: columns.iter().map(|(name, _)| name.clone()).collect(),
        values,
    })
}
