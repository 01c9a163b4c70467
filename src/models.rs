//! Data models for the analysis report.
//!
//! This module contains the structures that carry each objective's outcome
//! from the analysis stage to the console, the charts and the report.

use crate::stats::{ChiSquareTest, CorrelationMatrix, PairedTTest, SeriesSummary, ShapiroWilk};
use crate::table::DatasetOverview;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// The five fixed analyses, in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveKind {
    ParticipationRate,
    GenderGap,
    WorkerTypeCorrelation,
    AgeComposition,
    AreaContrast,
}

impl ObjectiveKind {
    pub const ALL: [ObjectiveKind; 5] = [
        ObjectiveKind::ParticipationRate,
        ObjectiveKind::GenderGap,
        ObjectiveKind::WorkerTypeCorrelation,
        ObjectiveKind::AgeComposition,
        ObjectiveKind::AreaContrast,
    ];

    /// 1-based objective number.
    pub fn number(&self) -> usize {
        match self {
            ObjectiveKind::ParticipationRate => 1,
            ObjectiveKind::GenderGap => 2,
            ObjectiveKind::WorkerTypeCorrelation => 3,
            ObjectiveKind::AgeComposition => 4,
            ObjectiveKind::AreaContrast => 5,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ObjectiveKind::ParticipationRate => "Workforce Participation Rate Analysis",
            ObjectiveKind::GenderGap => "Male vs Female Participation Rate",
            ObjectiveKind::WorkerTypeCorrelation => "Correlation Among Worker Types",
            ObjectiveKind::AgeComposition => "Age-wise Workforce Composition",
            ObjectiveKind::AreaContrast => "Urban vs Rural Main Workforce (Chi-Square Test)",
        }
    }
}

impl fmt::Display for ObjectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Objective {}: {}", self.number(), self.title())
    }
}

/// Statistical test that produced a [`TestResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    ShapiroWilk,
    PairedTTest,
    ChiSquare,
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestKind::ShapiroWilk => write!(f, "Shapiro-Wilk"),
            TestKind::PairedTTest => write!(f, "Paired T-Test"),
            TestKind::ChiSquare => write!(f, "Chi-Square"),
        }
    }
}

/// A test statistic with its p-value and verdict at the configured alpha.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub kind: TestKind,
    /// What was tested, e.g. the series name.
    pub subject: String,
    pub statistic: f64,
    pub p_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dof: Option<f64>,
    pub alpha: f64,
    /// True when the null hypothesis is rejected.
    pub significant: bool,
    pub verdict: String,
}

impl TestResult {
    /// Normality is kept when p > alpha.
    pub fn from_shapiro(result: &ShapiroWilk, subject: &str, alpha: f64) -> Self {
        let significant = !(result.p_value > alpha);
        Self {
            kind: TestKind::ShapiroWilk,
            subject: subject.to_string(),
            statistic: result.w,
            p_value: result.p_value,
            dof: None,
            alpha,
            significant,
            verdict: if significant { "Not Normal" } else { "Normal" }.to_string(),
        }
    }

    pub fn from_paired(result: &PairedTTest, subject: &str, alpha: f64) -> Self {
        let significant = result.p_value < alpha;
        Self {
            kind: TestKind::PairedTTest,
            subject: subject.to_string(),
            statistic: result.t_statistic,
            p_value: result.p_value,
            dof: Some(result.df),
            alpha,
            significant,
            verdict: if significant {
                "Significant Difference"
            } else {
                "No Significant Difference"
            }
            .to_string(),
        }
    }

    pub fn from_chi_square(result: &ChiSquareTest, subject: &str, alpha: f64) -> Self {
        let significant = result.p_value < alpha;
        Self {
            kind: TestKind::ChiSquare,
            subject: subject.to_string(),
            statistic: result.statistic,
            p_value: result.p_value,
            dof: Some(result.dof as f64),
            alpha,
            significant,
            verdict: if significant {
                "Significant difference"
            } else {
                "No significant difference"
            }
            .to_string(),
        }
    }
}

/// Participation rates of one state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRates {
    pub state: String,
    pub participation_rate: f64,
    pub male_rate: f64,
    pub female_rate: f64,
}

/// Main and marginal workers summed for one age group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeComposition {
    pub age_group: String,
    pub main_workers: f64,
    pub marginal_workers: f64,
}

impl AgeComposition {
    pub fn total(&self) -> f64 {
        self.main_workers + self.marginal_workers
    }
}

/// Rural/urban split of workers into main and other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaContingency {
    pub rural_main: f64,
    pub rural_total: f64,
    pub urban_main: f64,
    pub urban_total: f64,
}

impl AreaContingency {
    /// `[[rural_main, rural_other], [urban_main, urban_other]]`.
    pub fn table(&self) -> Vec<Vec<f64>> {
        vec![
            vec![self.rural_main, self.rural_total - self.rural_main],
            vec![self.urban_main, self.urban_total - self.urban_main],
        ]
    }

    pub fn grand_total(&self) -> f64 {
        self.rural_total + self.urban_total
    }
}

/// Outcome of one objective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectiveResult {
    pub kind: ObjectiveKind,
    /// Summary of the objective's main series.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SeriesSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub state_rates: Vec<StateRates>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tests: Vec<TestResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation: Option<CorrelationMatrix>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub composition: Vec<AgeComposition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contingency: Option<AreaContingency>,
    /// Expected counts under independence, laid out like `contingency`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_frequencies: Option<Vec<Vec<f64>>>,
    /// Path of the rendered chart, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<PathBuf>,
    /// Caveats raised while computing the objective.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    pub successful: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ObjectiveResult {
    /// Creates an empty, successful result.
    pub fn new(kind: ObjectiveKind) -> Self {
        Self {
            kind,
            summary: None,
            state_rates: Vec::new(),
            tests: Vec::new(),
            correlation: None,
            composition: Vec::new(),
            contingency: None,
            expected_frequencies: None,
            chart: None,
            notes: Vec::new(),
            successful: true,
            error: None,
        }
    }

    /// Creates a failed result.
    pub fn failed(kind: ObjectiveKind, error: String) -> Self {
        Self {
            successful: false,
            error: Some(error),
            ..Self::new(kind)
        }
    }
}

/// Counts across all objectives of a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub objectives: usize,
    pub failed: usize,
    pub tests: usize,
    pub significant: usize,
    pub charts: usize,
}

impl RunSummary {
    /// Creates a summary from a list of objective results.
    pub fn from_results(results: &[ObjectiveResult]) -> Self {
        let mut summary = Self {
            objectives: results.len(),
            ..Self::default()
        };

        for result in results {
            if !result.successful {
                summary.failed += 1;
            }
            if result.chart.is_some() {
                summary.charts += 1;
            }
            summary.tests += result.tests.len();
            summary.significant += result.tests.iter().filter(|t| t.significant).count();
        }

        summary
    }
}

/// Metadata about the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Input file.
    pub data_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    pub analysis_date: DateTime<Utc>,
    pub rows_loaded: usize,
    pub alpha: f64,
    pub duration_seconds: f64,
}

/// The complete analysis report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub overview: DatasetOverview,
    pub objectives: Vec<ObjectiveResult>,
    pub summary: RunSummary,
}
