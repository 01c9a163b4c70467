//! Main and marginal workers summed per age group.

use super::subsets::age_breakdown;
use crate::config::Config;
use crate::error::AnalysisError;
use crate::models::{AgeComposition, ObjectiveKind, ObjectiveResult};
use crate::table::Table;
use tracing::info;

pub fn analyze(table: &Table, config: &Config) -> Result<ObjectiveResult, AnalysisError> {
    let cols = &config.columns;
    let ages = age_breakdown(table, config)?;

    let groups = ages.group_sum(
        &cols.age_group,
        &[cols.main_workers.as_str(), cols.marginal_workers.as_str()],
    )?;
    if groups.is_empty() {
        return Err(AnalysisError::InsufficientData {
            test: "age composition",
            needed: 1,
            got: 0,
        });
    }

    let composition: Vec<AgeComposition> = groups
        .into_iter()
        .map(|g| AgeComposition {
            age_group: g.key,
            main_workers: g.sums[0],
            marginal_workers: g.sums[1],
        })
        .collect();
    info!("Age composition over {} age groups", composition.len());

    let mut result = ObjectiveResult::new(ObjectiveKind::AgeComposition);
    result.composition = composition;
    Ok(result)
}
