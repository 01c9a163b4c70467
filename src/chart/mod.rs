//! SVG chart rendering with plotters.
//!
//! Each objective with a figure gets one standalone SVG file in the chart
//! directory. Rendering happens in memory; only [`render_objective`] touches
//! the disk.

pub mod bar;
pub mod heatmap;
pub mod histogram;

use crate::config::Config;
use crate::error::ChartError;
use crate::models::{ObjectiveKind, ObjectiveResult};
use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const PARTICIPATION_HISTOGRAM: &str = "participation_rate_histogram.svg";
pub const GENDER_BARS: &str = "male_female_participation.svg";
pub const CORRELATION_HEATMAP: &str = "worker_type_correlation.svg";
pub const AGE_COMPOSITION: &str = "age_composition.svg";

pub(crate) const FONT: &str = "sans-serif";

/// Draw onto a white SVG canvas of `size` pixels and return the document.
pub(crate) fn svg_document<F>(size: (u32, u32), draw: F) -> Result<String, ChartError>
where
    F: FnOnce(&DrawingArea<SVGBackend<'_>, Shift>) -> Result<(), ChartError>,
{
    let mut buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut buffer, size).into_drawing_area();
        root.fill(&WHITE)?;
        draw(&root)?;
        root.present()?;
    }
    Ok(buffer)
}

/// Axis label for categories placed at integer positions.
pub(crate) fn category_label(labels: &[String], x: f64) -> String {
    let index = x.round();
    if (x - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    labels.get(index as usize).cloned().unwrap_or_default()
}

/// Compact tick label for counts: 1200 -> "1.2k", 3500000 -> "3.5M".
pub(crate) fn format_count(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if abs >= 1e3 {
        format!("{:.1}k", value / 1e3)
    } else {
        format!("{:.0}", value)
    }
}

/// Upper y bound with headroom above `max`; 1.0 for an all-zero series.
pub(crate) fn headroom(max: f64) -> f64 {
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

/// SVG document for an objective, or `None` when it has no chart.
pub fn chart_for(
    result: &ObjectiveResult,
    bins: usize,
) -> Result<Option<(&'static str, String)>, ChartError> {
    if !result.successful {
        return Ok(None);
    }
    let chart = match result.kind {
        ObjectiveKind::ParticipationRate => {
            let rates: Vec<f64> = result.state_rates.iter().map(|r| r.participation_rate).collect();
            Some((PARTICIPATION_HISTOGRAM, histogram::render(&rates, bins)?))
        }
        ObjectiveKind::GenderGap => Some((GENDER_BARS, bar::grouped(&result.state_rates)?)),
        ObjectiveKind::WorkerTypeCorrelation => match result.correlation {
            Some(ref matrix) => Some((CORRELATION_HEATMAP, heatmap::render(matrix)?)),
            None => None,
        },
        ObjectiveKind::AgeComposition => Some((AGE_COMPOSITION, bar::stacked(&result.composition)?)),
        ObjectiveKind::AreaContrast => None,
    };
    Ok(chart)
}

/// Render and save the chart for `result`, returning its path.
pub fn render_objective(result: &ObjectiveResult, config: &Config) -> Result<Option<PathBuf>> {
    if !config.charts.enabled {
        return Ok(None);
    }
    let chart = chart_for(result, config.analysis.histogram_bins)
        .with_context(|| format!("Failed to render chart for {}", result.kind))?;
    match chart {
        Some((name, svg)) => write_chart(&config.charts.directory, name, &svg).map(Some),
        None => Ok(None),
    }
}

fn write_chart(dir: &Path, name: &str, svg: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create chart directory {}", dir.display()))?;
    let path = dir.join(name);
    std::fs::write(&path, svg).with_context(|| format!("Failed to write chart {}", path.display()))?;
    debug!("Wrote chart {}", path.display());
    Ok(path)
}
