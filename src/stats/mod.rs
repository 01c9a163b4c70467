//! Statistical routines over plain `f64` series.

pub mod contingency;
pub mod correlation;
pub mod descriptive;
pub mod density;
pub mod normality;
pub mod ttest;

pub use contingency::{chi2_contingency, ChiSquareTest};
pub use correlation::{correlation_matrix, CorrelationMatrix};
pub use descriptive::SeriesSummary;
pub use normality::{shapiro_wilk, ShapiroWilk};
pub use ttest::{paired_t_test, PairedTTest};
