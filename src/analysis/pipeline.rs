//! Runs the five objectives in order over a loaded table.

use super::{age_composition, area_contrast, gender_gap, participation, worker_types};
use crate::config::Config;
use crate::error::AnalysisError;
use crate::models::{ObjectiveKind, ObjectiveResult};
use crate::table::Table;
use anyhow::{Context, Result};
use tracing::{info, warn};

/// Compute one objective.
pub fn analyze_objective(
    kind: ObjectiveKind,
    table: &Table,
    config: &Config,
) -> Result<ObjectiveResult, AnalysisError> {
    match kind {
        ObjectiveKind::ParticipationRate => participation::analyze(table, config),
        ObjectiveKind::GenderGap => gender_gap::analyze(table, config),
        ObjectiveKind::WorkerTypeCorrelation => worker_types::analyze(table, config),
        ObjectiveKind::AgeComposition => age_composition::analyze(table, config),
        ObjectiveKind::AreaContrast => area_contrast::analyze(table, config),
    }
}

/// Sequential objective runner.
pub struct Pipeline<'a> {
    config: &'a Config,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Run every objective, handing each result to `on_result` as soon as it
    /// is ready.
    ///
    /// A failing objective aborts the run unless `analysis.keep_going` is
    /// set, in which case it is recorded as failed and the run continues.
    pub fn run<F>(&self, table: &Table, mut on_result: F) -> Result<Vec<ObjectiveResult>>
    where
        F: FnMut(&mut ObjectiveResult) -> Result<()>,
    {
        let mut results = Vec::with_capacity(ObjectiveKind::ALL.len());

        for kind in ObjectiveKind::ALL {
            info!("Running {}", kind);
            let mut result = match analyze_objective(kind, table, self.config) {
                Ok(result) => result,
                Err(e) if self.config.analysis.keep_going => {
                    warn!("{} failed: {}", kind, e);
                    ObjectiveResult::failed(kind, e.to_string())
                }
                Err(e) => return Err(e).with_context(|| format!("{} failed", kind)),
            };

            on_result(&mut result)?;
            results.push(result);
        }

        Ok(results)
    }
}
