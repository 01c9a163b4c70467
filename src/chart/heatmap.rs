//! Annotated correlation heatmap on a diverging blue-red scale.

use super::{category_label, svg_document, FONT};
use crate::error::ChartError;
use crate::stats::CorrelationMatrix;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

const SIZE: (u32, u32) = (800, 600);
const SCALE_WIDTH: i32 = 110;
const SCALE_STEPS: usize = 40;

const COLD: (f64, f64, f64) = (59.0, 76.0, 192.0);
const NEUTRAL: (f64, f64, f64) = (221.0, 221.0, 221.0);
const HOT: (f64, f64, f64) = (180.0, 4.0, 38.0);
const MISSING: (u8, u8, u8) = (189, 189, 189);

/// RGB shade for a coefficient in [-1, 1]; grey for NaN.
pub fn shade(r: f64) -> (u8, u8, u8) {
    if !r.is_finite() {
        return MISSING;
    }
    let r = r.clamp(-1.0, 1.0);
    let (to, t) = if r < 0.0 { (COLD, -r) } else { (HOT, r) };
    let mix = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    (mix(NEUTRAL.0, to.0), mix(NEUTRAL.1, to.1), mix(NEUTRAL.2, to.2))
}

fn color_for(r: f64) -> RGBColor {
    let (red, green, blue) = shade(r);
    RGBColor(red, green, blue)
}

/// Cell annotation: two decimals, or "NaN".
pub fn annotation(r: f64) -> String {
    if r.is_finite() {
        format!("{:.2}", r)
    } else {
        "NaN".to_string()
    }
}

pub fn render(matrix: &CorrelationMatrix) -> Result<String, ChartError> {
    let k = matrix.size();
    if k == 0 {
        return Err(ChartError::Empty { chart: "correlation heatmap" });
    }

    let labels = &matrix.labels;
    // Row 0 is drawn at the top.
    let row_y = |i: usize| (k - 1 - i) as f64;
    let row_label = |y: f64| {
        let index = y.round();
        if (y - index).abs() > 1e-6 || index < 0.0 || index as usize >= k {
            return String::new();
        }
        labels[k - 1 - index as usize].clone()
    };
    let extent = -0.5f64..k as f64 - 0.5;

    svg_document(SIZE, |root| {
        let (grid_area, scale_area) = root.split_horizontally(SIZE.0 as i32 - SCALE_WIDTH);

        let mut chart = ChartBuilder::on(&grid_area)
            .caption("Correlation Among Types of Workers", (FONT, 22))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(150)
            .build_cartesian_2d(extent.clone(), extent.clone())?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(k)
            .y_labels(k)
            .x_label_formatter(&|x| category_label(labels, *x))
            .y_label_formatter(&|y| row_label(*y))
            .draw()?;

        let cells: Vec<(usize, usize, f64)> = (0..k)
            .flat_map(|i| (0..k).map(move |j| (i, j, matrix.get(i, j))))
            .collect();

        chart.draw_series(cells.iter().map(|&(i, j, r)| {
            let (x, y) = (j as f64, row_y(i));
            Rectangle::new([(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)], color_for(r).filled())
        }))?;

        chart.draw_series(cells.iter().map(|&(i, j, r)| {
            let ink = if r.abs() > 0.6 { WHITE } else { BLACK };
            let style = (FONT, 14)
                .into_font()
                .color(&ink)
                .pos(Pos::new(HPos::Center, VPos::Center));
            Text::new(annotation(r), (j as f64, row_y(i)), style)
        }))?;

        let mut scale = ChartBuilder::on(&scale_area)
            .margin_top(60)
            .margin_bottom(80)
            .margin_right(20)
            .y_label_area_size(40)
            .build_cartesian_2d(0f64..1f64, -1f64..1f64)?;

        scale
            .configure_mesh()
            .disable_mesh()
            .disable_x_axis()
            .y_labels(5)
            .y_label_formatter(&|v| format!("{:.1}", v))
            .draw()?;

        let step = 2.0 / SCALE_STEPS as f64;
        scale.draw_series((0..SCALE_STEPS).map(|s| {
            let bottom = -1.0 + step * s as f64;
            Rectangle::new(
                [(0.0, bottom), (1.0, bottom + step)],
                color_for(bottom + step / 2.0).filled(),
            )
        }))?;
        Ok(())
    })
}
