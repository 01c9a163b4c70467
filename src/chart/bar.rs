//! Grouped and stacked bar charts.
//!
//! Categories sit at integer x positions so tick labels can be mapped back
//! to state codes and age groups.

use super::{category_label, format_count, headroom, svg_document, FONT};
use crate::error::ChartError;
use crate::models::{AgeComposition, StateRates};
use plotters::prelude::*;

const PRIMARY: RGBColor = RGBColor(31, 119, 180);
const SECONDARY: RGBColor = RGBColor(255, 127, 14);

/// `[left, right]` x extents of the two bars drawn for category `i`.
pub fn paired_spans(i: usize) -> ([f64; 2], [f64; 2]) {
    let center = i as f64;
    ([center - 0.4, center], [center, center + 0.4])
}

/// Main and marginal segments of one age group as `(bottom, top)` pairs.
pub fn stack_segments(group: &AgeComposition) -> [(f64, f64); 2] {
    [
        (0.0, group.main_workers),
        (group.main_workers, group.total()),
    ]
}

/// Male and female participation side by side for each state.
pub fn grouped(rates: &[StateRates]) -> Result<String, ChartError> {
    if rates.is_empty() {
        return Err(ChartError::Empty { chart: "gender bar chart" });
    }

    let labels: Vec<String> = rates.iter().map(|r| r.state.clone()).collect();
    let max = rates
        .iter()
        .map(|r| r.male_rate.max(r.female_rate))
        .fold(0.0, f64::max);
    let y_max = headroom(max);
    let n = rates.len() as f64;

    svg_document((1400, 600), |root| {
        let mut chart = ChartBuilder::on(root)
            .caption("Male vs Female Workforce Participation by State", (FONT, 24))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(-0.5f64..n - 0.5, 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len())
            .x_label_formatter(&|x| category_label(&labels, *x))
            .x_desc("State_Code")
            .y_desc("Participation Rate (%)")
            .draw()?;

        chart
            .draw_series(rates.iter().enumerate().map(|(i, rate)| {
                let (male, _) = paired_spans(i);
                Rectangle::new([(male[0], 0.0), (male[1], rate.male_rate)], PRIMARY.filled())
            }))?
            .label("Male_Participation_Rate")
            .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], PRIMARY.filled()));

        chart
            .draw_series(rates.iter().enumerate().map(|(i, rate)| {
                let (_, female) = paired_spans(i);
                Rectangle::new(
                    [(female[0], 0.0), (female[1], rate.female_rate)],
                    SECONDARY.filled(),
                )
            }))?
            .label("Female_Participation_Rate")
            .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], SECONDARY.filled()));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
        Ok(())
    })
}

/// Main workers with marginal workers stacked on top, per age group.
pub fn stacked(composition: &[AgeComposition]) -> Result<String, ChartError> {
    if composition.is_empty() {
        return Err(ChartError::Empty { chart: "age composition chart" });
    }

    let labels: Vec<String> = composition.iter().map(|c| c.age_group.clone()).collect();
    let max = composition.iter().map(AgeComposition::total).fold(0.0, f64::max);
    let y_max = headroom(max);
    let n = composition.len() as f64;

    svg_document((800, 500), |root| {
        let mut chart = ChartBuilder::on(root)
            .caption("Workforce Composition by Age Group", (FONT, 22))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(-0.5f64..n - 0.5, 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len())
            .x_label_formatter(&|x| category_label(&labels, *x))
            .y_label_formatter(&|y| format_count(*y))
            .x_desc("Age Group")
            .y_desc("Number of Workers")
            .draw()?;

        for (index, (name, color)) in [("Main_Workers", PRIMARY), ("Marginal_Workers", SECONDARY)]
            .into_iter()
            .enumerate()
        {
            chart
                .draw_series(composition.iter().enumerate().map(|(i, group)| {
                    let (bottom, top) = stack_segments(group)[index];
                    let x = i as f64;
                    Rectangle::new([(x - 0.3, bottom), (x + 0.3, top)], color.filled())
                }))?
                .label(name)
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
        Ok(())
    })
}
