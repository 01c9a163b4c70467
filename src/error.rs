//! Error types for loading, table access, statistics and charts.
//!
//! The binary boundary wraps these in `anyhow`; inside the crate each stage
//! returns its own typed error so callers can tell a bad file apart from a
//! degenerate statistic.

use plotters::drawing::DrawingAreaErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Failure while reading the input dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot open workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("cannot parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("sheet '{0}' not found in workbook")]
    SheetNotFound(String),

    #[error("sheet '{0}' has no header row")]
    EmptySheet(String),

    #[error("schema error: {0}")]
    Schema(String),
}

/// Failure while addressing a table by column.
#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    #[error("column '{column}' row {row}: expected a number, found '{found}'")]
    NotNumeric {
        column: String,
        row: usize,
        found: String,
    },
}

/// Failure while computing a statistic or a derived quantity.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{test} needs at least {needed} observations, got {got}")]
    InsufficientData {
        test: &'static str,
        needed: usize,
        got: usize,
    },

    #[error("{test}: series lengths differ ({left} vs {right})")]
    LengthMismatch {
        test: &'static str,
        left: usize,
        right: usize,
    },

    #[error("{test}: degenerate input ({reason})")]
    Degenerate { test: &'static str, reason: String },

    #[error("distribution error: {0}")]
    Distribution(String),

    #[error(transparent)]
    Table(#[from] TableError),
}

impl AnalysisError {
    pub fn degenerate(test: &'static str, reason: impl Into<String>) -> Self {
        AnalysisError::Degenerate {
            test,
            reason: reason.into(),
        }
    }
}

/// Failure while drawing a chart.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("{chart}: nothing to plot")]
    Empty { chart: &'static str },

    #[error("cannot draw chart: {0}")]
    Draw(String),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for ChartError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        ChartError::Draw(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = TableError::ColumnNotFound("Age_group".to_string());
        assert_eq!(err.to_string(), "column 'Age_group' not found");

        let err = AnalysisError::degenerate("paired t-test", "differences have zero variance");
        assert!(err.to_string().contains("zero variance"));

        let err: AnalysisError = TableError::ColumnNotFound("x".to_string()).into();
        assert!(matches!(err, AnalysisError::Table(_)));
    }
}
