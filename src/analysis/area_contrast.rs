//! Rural vs urban share of main workers, tested for independence.

use super::subsets::area_all_ages;
use crate::config::Config;
use crate::error::AnalysisError;
use crate::models::{AreaContingency, ObjectiveKind, ObjectiveResult, TestResult};
use crate::stats::chi2_contingency;
use crate::table::Table;
use tracing::info;

pub fn analyze(table: &Table, config: &Config) -> Result<ObjectiveResult, AnalysisError> {
    let cols = &config.columns;
    let rural = area_all_ages(table, config, &config.filters.rural_label)?;
    let urban = area_all_ages(table, config, &config.filters.urban_label)?;

    let area = AreaContingency {
        rural_main: rural.sum(&cols.main_workers)?,
        rural_total: rural.sum(&cols.total_workers)?,
        urban_main: urban.sum(&cols.main_workers)?,
        urban_total: urban.sum(&cols.total_workers)?,
    };

    let chi = chi2_contingency(&area.table())?;
    info!(
        "Chi-square rural vs urban over {:.0} workers: chi2={:.4}, p={:.4}, dof={}",
        area.grand_total(),
        chi.statistic,
        chi.p_value,
        chi.dof
    );

    let mut result = ObjectiveResult::new(ObjectiveKind::AreaContrast);
    result.tests.push(TestResult::from_chi_square(
        &chi,
        "Main workers: Rural vs Urban",
        config.analysis.alpha,
    ));
    result.expected_frequencies = Some(chi.expected);
    result.contingency = Some(area);
    Ok(result)
}
