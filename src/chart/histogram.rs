//! Participation-rate histogram with a density curve.

use super::{headroom, svg_document, FONT};
use crate::error::ChartError;
use crate::stats::density::{gaussian_kde, Histogram};
use plotters::prelude::*;

const SIZE: (u32, u32) = (900, 600);
const FILL: RGBColor = RGBColor(135, 206, 235);
const CURVE: RGBColor = RGBColor(31, 111, 159);
const KDE_POINTS: usize = 200;

/// Gaussian KDE over the histogram range, scaled from density to counts.
///
/// density * n * bin width puts the curve on the count axis.
pub fn count_curve(values: &[f64], hist: &Histogram) -> Vec<(f64, f64)> {
    let lo = hist.edges[0];
    let hi = hist.edges[hist.edges.len() - 1];
    let scale = values.len() as f64 * hist.bin_width();
    gaussian_kde(values, lo, hi, KDE_POINTS)
        .into_iter()
        .map(|(x, d)| (x, d * scale))
        .collect()
}

/// Histogram of `values` in `bins` bins, overlaid with a Gaussian KDE.
pub fn render(values: &[f64], bins: usize) -> Result<String, ChartError> {
    if values.is_empty() {
        return Err(ChartError::Empty { chart: "participation histogram" });
    }

    let hist = Histogram::from_values(values, bins);
    let lo = hist.edges[0];
    let hi = hist.edges[hist.edges.len() - 1];
    let curve = count_curve(values, &hist);
    let curve_max = curve.iter().map(|(_, y)| *y).fold(0.0, f64::max);
    let y_max = headroom((hist.max_count() as f64).max(curve_max));

    svg_document(SIZE, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption("Distribution of Workforce Participation Rate", (FONT, 24))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(lo..hi, 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Participation Rate (%)")
            .y_desc("Frequency")
            .x_label_formatter(&|x| format!("{:.1}", x))
            .draw()?;

        chart.draw_series(hist.counts.iter().enumerate().map(|(i, &count)| {
            Rectangle::new(
                [(hist.edges[i], 0.0), (hist.edges[i + 1], count as f64)],
                FILL.filled(),
            )
        }))?;

        if !curve.is_empty() {
            chart.draw_series(LineSeries::new(curve.iter().copied(), CURVE.stroke_width(2)))?;
        }
        Ok(())
    })
}
