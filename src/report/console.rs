//! Plain-text rendering of the overview and objective results for stdout.

use crate::models::{ObjectiveKind, ObjectiveResult, TestKind, TestResult};
use crate::stats::{CorrelationMatrix, SeriesSummary};
use crate::table::DatasetOverview;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, Table as Grid};

/// Right-aligned grid with a header row.
pub fn format_grid(headers: &[String], rows: &[Vec<String>]) -> String {
    let right = |content: &String| Cell::new(content).set_alignment(CellAlignment::Right);

    let mut grid = Grid::new();
    grid.load_preset(UTF8_FULL_CONDENSED);
    grid.set_header(headers.iter().map(right));
    for row in rows {
        grid.add_row(row.iter().map(right));
    }
    format!("{}\n", grid)
}

/// `describe()`-style block for one series.
pub fn format_summary(name: &str, summary: &SeriesSummary) -> String {
    let mut out = String::new();
    for (label, value) in summary.rows() {
        out.push_str(&format!("{:<8}{:>14.6}\n", label, value));
    }
    out.push_str(&format!("Name: {}\n", name));
    out
}

pub fn format_overview(overview: &DatasetOverview) -> String {
    let mut out = String::new();

    let mut headers = vec![String::new()];
    headers.extend(overview.columns.iter().cloned());
    let head: Vec<Vec<String>> = overview
        .head
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut cells = vec![i.to_string()];
            cells.extend(row.iter().cloned());
            cells
        })
        .collect();
    out.push_str(&format_grid(&headers, &head));
    out.push('\n');

    if !overview.describe.is_empty() {
        let mut headers = vec![String::new()];
        headers.extend(overview.describe.iter().map(|(name, _)| name.clone()));
        let stats: Vec<Vec<String>> = (0..8)
            .map(|i| {
                let label = overview.describe[0].1.rows()[i].0;
                let mut cells = vec![label.to_string()];
                cells.extend(
                    overview
                        .describe
                        .iter()
                        .map(|(_, s)| format!("{:.6}", s.rows()[i].1)),
                );
                cells
            })
            .collect();
        out.push_str(&format_grid(&headers, &stats));
        out.push('\n');
    }

    out.push_str("Null values:\n");
    let width = overview.columns.iter().map(|c| c.len()).max().unwrap_or(0);
    for (name, count) in &overview.null_counts {
        out.push_str(&format!("{:<width$}  {}\n", name, count, width = width));
    }
    out.push_str(&format!("Duplicate rows: {}\n", overview.duplicate_rows));
    out
}

fn format_verdict(test: &TestResult) -> String {
    match test.kind {
        TestKind::ShapiroWilk => format!(
            "Shapiro Test on {}:\nStatistic={:.4}, P-Value={:.4}\n{}\n",
            test.subject, test.statistic, test.p_value, test.verdict
        ),
        TestKind::PairedTTest => format!(
            "Paired T-Test ({}): t={:.4}, P-value: {:.4}\n{}\n",
            test.subject, test.statistic, test.p_value, test.verdict
        ),
        TestKind::ChiSquare => format!(
            "Chi-Square Test ({}):\nChi2 = {:.4}, P-Value = {:.4}\n{}\n",
            test.subject, test.statistic, test.p_value, test.verdict
        ),
    }
}

pub fn format_correlation(matrix: &CorrelationMatrix) -> String {
    let mut headers = vec![String::new()];
    headers.extend(matrix.labels.iter().cloned());
    let rows: Vec<Vec<String>> = (0..matrix.size())
        .map(|i| {
            let mut cells = vec![matrix.labels[i].clone()];
            cells.extend((0..matrix.size()).map(|j| format!("{:.6}", matrix.get(i, j))));
            cells
        })
        .collect();
    format_grid(&headers, &rows)
}

/// Expected counts of the rural/urban table, one row per area.
pub fn format_expected(expected: &[Vec<f64>]) -> String {
    let headers = vec![
        String::new(),
        "Main_Workers".to_string(),
        "Other_Workers".to_string(),
    ];
    let rows: Vec<Vec<String>> = ["Rural", "Urban"]
        .iter()
        .zip(expected)
        .map(|(area, counts)| {
            let mut cells = vec![area.to_string()];
            cells.extend(counts.iter().map(|c| format!("{:.2}", c)));
            cells
        })
        .collect();
    format_grid(&headers, &rows)
}

pub fn format_objective(result: &ObjectiveResult) -> String {
    let mut out = format!("\n{}\n", result.kind);

    if let Some(ref error) = result.error {
        out.push_str(&format!("FAILED: {}\n", error));
        return out;
    }

    for note in &result.notes {
        out.push_str(&format!("Note: {}\n", note));
    }

    if let Some(ref summary) = result.summary {
        let name = match result.kind {
            ObjectiveKind::GenderGap => "Male - Female Participation Gap",
            _ => "Workforce_Participation_Rate",
        };
        out.push_str(&format!("{} Summary:\n", name.replace('_', " ")));
        out.push_str(&format_summary(name, summary));
    }

    for test in &result.tests {
        out.push_str(&format_verdict(test));
    }

    if let Some(ref expected) = result.expected_frequencies {
        out.push_str("Expected Frequencies:\n");
        out.push_str(&format_expected(expected));
    }

    if let Some(ref matrix) = result.correlation {
        out.push_str("Correlation Matrix:\n");
        out.push_str(&format_correlation(matrix));
    }

    if !result.composition.is_empty() {
        let headers = vec![
            "Age_group".to_string(),
            "Main_Workers".to_string(),
            "Marginal_Workers".to_string(),
        ];
        let rows: Vec<Vec<String>> = result
            .composition
            .iter()
            .map(|c| {
                vec![
                    c.age_group.clone(),
                    format!("{:.0}", c.main_workers),
                    format!("{:.0}", c.marginal_workers),
                ]
            })
            .collect();
        out.push_str(&format_grid(&headers, &rows));
    }

    if let Some(ref chart) = result.chart {
        out.push_str(&format!("Chart saved to {}\n", chart.display()));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AgeComposition;
    use crate::stats::ShapiroWilk;
    use crate::table::cell::Cell;
    use crate::table::Table;

    #[test]
    fn test_format_grid_aligns() {
        let grid = format_grid(
            &["a".to_string(), "long".to_string()],
            &[vec!["123".to_string(), "1".to_string()]],
        );
        let header = grid.lines().find(|l| l.contains("long")).unwrap();
        let row = grid.lines().find(|l| l.contains("123")).unwrap();

        // right-aligned: "a" ends where "123" ends
        assert_eq!(header.find('a').unwrap(), row.find("123").unwrap() + 2);
        assert_eq!(header.find("long").unwrap() + 3, row.rfind('1').unwrap());
    }

    #[test]
    fn test_overview_output() {
        let table = Table::new(
            vec!["State_Code".to_string(), "Area".to_string()],
            vec![
                vec![Cell::Number(1.0), Cell::from("Total")],
                vec![Cell::Number(1.0), Cell::from("Total")],
                vec![Cell::Number(2.0), Cell::Empty],
            ],
        )
        .unwrap();
        let text = format_overview(&DatasetOverview::from_table(&table, 5));

        assert!(text.contains("Null values:"));
        assert!(text.contains("Duplicate rows: 1"));
        assert!(text.contains("mean"));
    }

    #[test]
    fn test_objective_output() {
        let mut result = ObjectiveResult::new(ObjectiveKind::GenderGap);
        result.tests.push(TestResult::from_shapiro(
            &ShapiroWilk {
                n: 10,
                w: 0.91234,
                p_value: 0.3,
            },
            "Male Participation Rate",
            0.05,
        ));
        let text = format_objective(&result);
        assert!(text.contains("Objective 2: Male vs Female Participation Rate"));
        assert!(text.contains("Statistic=0.9123, P-Value=0.3000"));
        assert!(text.contains("\nNormal\n"));
    }

    #[test]
    fn test_failed_and_composition_output() {
        let failed = ObjectiveResult::failed(ObjectiveKind::AreaContrast, "no urban rows".to_string());
        assert!(format_objective(&failed).contains("FAILED: no urban rows"));

        let mut area = ObjectiveResult::new(ObjectiveKind::AreaContrast);
        area.expected_frequencies = Some(vec![vec![766.67, 233.33], vec![383.33, 116.67]]);
        let text = format_objective(&area);
        assert!(text.contains("Expected Frequencies:"));
        assert!(text.contains("766.67"));
        assert!(text.contains("116.67"));

        let mut ages = ObjectiveResult::new(ObjectiveKind::AgeComposition);
        ages.composition.push(AgeComposition {
            age_group: "15-19".to_string(),
            main_workers: 1200.0,
            marginal_workers: 300.0,
        });
        let text = format_objective(&ages);
        assert!(text.contains("15-19"));
        assert!(text.contains("1200"));
    }
}
