//! Markdown report generation.
//!
//! This module generates the Markdown and JSON census reports from
//! the analysis results.

use crate::analysis::{
    failed_objectives, largest_age_group, main_worker_share, rank_by_participation,
    significant_tests, widest_gender_gaps,
};
use crate::models::{ObjectiveKind, ObjectiveResult, Report, ReportMetadata, RunSummary};
use crate::stats::SeriesSummary;
use crate::table::DatasetOverview;
use anyhow::Result;
use std::path::Path;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# Employment Census Report\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_table_of_contents(report));
    output.push_str(&generate_overview_section(&report.overview));
    output.push_str(&generate_summary_section(&report.summary, &report.objectives));

    for result in &report.objectives {
        output.push_str(&generate_objective_section(result));
    }

    output.push_str(&generate_footer());

    output
}

/// GitHub-style heading anchor.
fn anchor(heading: &str) -> String {
    heading
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-')
        .map(|c| if c == ' ' { '-' } else { c })
        .collect()
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:.4}", value)
    }
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Data File:** `{}`\n", metadata.data_path));
    if let Some(ref sheet) = metadata.sheet {
        section.push_str(&format!("- **Sheet:** {}\n", sheet));
    }
    section.push_str(&format!(
        "- **Analysis Date:** {}\n",
        metadata.analysis_date.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Rows Loaded:** {}\n", metadata.rows_loaded));
    section.push_str(&format!("- **Significance Level:** {}\n", metadata.alpha));
    section.push_str(&format!(
        "- **Analysis Duration:** {:.1}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

/// Generate the table of contents.
fn generate_table_of_contents(report: &Report) -> String {
    let mut toc = String::new();

    toc.push_str("## Table of Contents\n\n");
    toc.push_str("- [Metadata](#metadata)\n");
    toc.push_str("- [Dataset Overview](#dataset-overview)\n");
    toc.push_str("- [Summary](#summary)\n");

    for result in &report.objectives {
        let heading = result.kind.to_string();
        toc.push_str(&format!("- [{}](#{})\n", heading, anchor(&heading)));
    }

    toc.push('\n');

    toc
}

fn summary_table(rows: &[(String, SeriesSummary)]) -> String {
    let mut table = String::new();
    table.push_str("| Column | count | mean | std | min | 25% | 50% | 75% | max |\n");
    table.push_str("|:---|---:|---:|---:|---:|---:|---:|---:|---:|\n");
    for (name, summary) in rows {
        let cells: Vec<String> = summary
            .rows()
            .iter()
            .map(|(label, v)| {
                if *label == "count" {
                    format!("{:.0}", v)
                } else {
                    format!("{:.2}", v)
                }
            })
            .collect();
        table.push_str(&format!("| {} | {} |\n", name, cells.join(" | ")));
    }
    table
}

/// Generate the dataset overview section.
fn generate_overview_section(overview: &DatasetOverview) -> String {
    let mut section = String::new();

    section.push_str("## Dataset Overview\n\n");
    section.push_str(&format!(
        "{} rows, {} columns, {} empty cells, {} duplicate rows.\n\n",
        overview.rows,
        overview.columns.len(),
        overview.total_nulls(),
        overview.duplicate_rows
    ));

    if !overview.head.is_empty() {
        section.push_str("### First Rows\n\n");
        section.push_str(&format!("| {} |\n", overview.columns.join(" | ")));
        section.push_str(&format!("|{}\n", "---|".repeat(overview.columns.len())));
        for row in &overview.head {
            section.push_str(&format!("| {} |\n", row.join(" | ")));
        }
        section.push('\n');
    }

    if !overview.describe.is_empty() {
        section.push_str("### Numeric Columns\n\n");
        section.push_str(&summary_table(&overview.describe));
        section.push('\n');
    }

    let missing: Vec<_> = overview.null_counts.iter().filter(|(_, n)| *n > 0).collect();
    section.push_str("### Missing Values\n\n");
    if missing.is_empty() {
        section.push_str("No missing values.\n\n");
    } else {
        section.push_str("| Column | Empty Cells |\n");
        section.push_str("|:---|:---:|\n");
        for (name, count) in missing {
            section.push_str(&format!("| {} | {} |\n", name, count));
        }
        section.push('\n');
    }

    section
}

/// Generate the summary section.
fn generate_summary_section(summary: &RunSummary, results: &[ObjectiveResult]) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str("| Objectives | Failed | Tests | Significant | Charts |\n");
    section.push_str("|:---:|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} | {} |\n\n",
        summary.objectives, summary.failed, summary.tests, summary.significant, summary.charts
    ));

    let significant = significant_tests(results);
    if !significant.is_empty() {
        section.push_str("### Significant Results\n\n");
        for test in significant {
            section.push_str(&format!(
                "- **{}** on {}: p = {} ({})\n",
                test.kind,
                test.subject,
                format_value(test.p_value),
                test.verdict
            ));
        }
        section.push('\n');
    }

    let failed = failed_objectives(results);
    if !failed.is_empty() {
        section.push_str("### Failed Objectives\n\n");
        for result in failed {
            section.push_str(&format!(
                "- {}: {}\n",
                result.kind,
                result.error.as_deref().unwrap_or("unknown error")
            ));
        }
        section.push('\n');
    }

    section
}

/// Generate the section for one objective.
fn generate_objective_section(result: &ObjectiveResult) -> String {
    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", result.kind));

    if let Some(ref error) = result.error {
        section.push_str(&format!("> **Failed:** {}\n\n", error));
        return section;
    }

    for note in &result.notes {
        section.push_str(&format!("> **Note:** {}\n\n", note));
    }

    if let Some(ref summary) = result.summary {
        let name = match result.kind {
            ObjectiveKind::GenderGap => "Male - Female Gap (pp)",
            _ => "Participation Rate (%)",
        };
        section.push_str(&summary_table(&[(name.to_string(), summary.clone())]));
        section.push('\n');
    }

    match result.kind {
        ObjectiveKind::ParticipationRate if !result.state_rates.is_empty() => {
            section.push_str("| State | Participation Rate (%) |\n");
            section.push_str("|:---|---:|\n");
            for rate in rank_by_participation(&result.state_rates) {
                section.push_str(&format!("| {} | {:.2} |\n", rate.state, rate.participation_rate));
            }
            section.push('\n');
        }
        ObjectiveKind::GenderGap if !result.state_rates.is_empty() => {
            section.push_str("**Widest gaps:**\n\n");
            section.push_str("| State | Male (%) | Female (%) | Gap (pp) |\n");
            section.push_str("|:---|---:|---:|---:|\n");
            for rate in widest_gender_gaps(&result.state_rates, 5) {
                section.push_str(&format!(
                    "| {} | {:.2} | {:.2} | {:.2} |\n",
                    rate.state,
                    rate.male_rate,
                    rate.female_rate,
                    rate.male_rate - rate.female_rate
                ));
            }
            section.push('\n');
        }
        _ => {}
    }

    if !result.tests.is_empty() {
        section.push_str("| Test | Subject | Statistic | p-value | df | Verdict |\n");
        section.push_str("|:---|:---|---:|---:|---:|:---|\n");
        for test in &result.tests {
            let dof = test.dof.map(|d| format!("{}", d)).unwrap_or_else(|| "-".to_string());
            section.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                test.kind,
                test.subject,
                format_value(test.statistic),
                format_value(test.p_value),
                dof,
                test.verdict
            ));
        }
        section.push('\n');
    }

    if let Some(ref matrix) = result.correlation {
        section.push_str(&format!("| | {} |\n", matrix.labels.join(" | ")));
        section.push_str(&format!("|:---|{}\n", "---:|".repeat(matrix.size())));
        for i in 0..matrix.size() {
            let cells: Vec<String> = (0..matrix.size())
                .map(|j| {
                    let r = matrix.get(i, j);
                    if r.is_nan() {
                        "NaN".to_string()
                    } else {
                        format!("{:.2}", r)
                    }
                })
                .collect();
            section.push_str(&format!("| **{}** | {} |\n", matrix.labels[i], cells.join(" | ")));
        }
        section.push('\n');
        if let Some((a, b, r)) = matrix.strongest_pairs().first() {
            section.push_str(&format!("Strongest pair: {} / {} (r = {:.2})\n\n", a, b, r));
        }
    }

    if !result.composition.is_empty() {
        section.push_str("| Age Group | Main Workers | Marginal Workers | Total |\n");
        section.push_str("|:---|---:|---:|---:|\n");
        for group in &result.composition {
            section.push_str(&format!(
                "| {} | {:.0} | {:.0} | {:.0} |\n",
                group.age_group,
                group.main_workers,
                group.marginal_workers,
                group.total()
            ));
        }
        section.push('\n');
        if let Some(largest) = largest_age_group(&result.composition) {
            section.push_str(&format!("Largest age group: {}", largest.age_group));
            if let Some(share) = main_worker_share(&result.composition) {
                section.push_str(&format!("; main workers are {:.1}% of the total", share));
            }
            section.push_str(".\n\n");
        }
    }

    if let Some(ref area) = result.contingency {
        section.push_str("| Area | Main Workers | Other Workers | Total |\n");
        section.push_str("|:---|---:|---:|---:|\n");
        for (label, main, total) in [
            ("Rural", area.rural_main, area.rural_total),
            ("Urban", area.urban_main, area.urban_total),
        ] {
            section.push_str(&format!(
                "| {} | {:.0} | {:.0} | {:.0} |\n",
                label,
                main,
                total - main,
                total
            ));
        }
        section.push_str(&format!(
            "| **Total** | {:.0} | {:.0} | {:.0} |\n",
            area.rural_main + area.urban_main,
            area.grand_total() - area.rural_main - area.urban_main,
            area.grand_total()
        ));
        section.push('\n');
    }

    if let Some(ref expected) = result.expected_frequencies {
        section.push_str("**Expected frequencies under independence:**\n\n");
        section.push_str("| Area | Main Workers | Other Workers |\n");
        section.push_str("|:---|---:|---:|\n");
        for (label, counts) in ["Rural", "Urban"].iter().zip(expected) {
            let cells: Vec<String> = counts.iter().map(|c| format!("{:.2}", c)).collect();
            section.push_str(&format!("| {} | {} |\n", label, cells.join(" | ")));
        }
        section.push('\n');
    }

    if let Some(ref chart) = result.chart {
        section.push_str(&format!("![{}]({})\n\n", result.kind.title(), chart.display()));
    }

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Report generated by censuswork v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write the report to `path` in the requested format.
pub fn write_report(report: &Report, path: &Path, json: bool) -> Result<()> {
    let content = if json {
        generate_json_report(report)?
    } else {
        generate_markdown_report(report)
    };
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AreaContingency, StateRates, TestResult};
    use crate::stats::{ChiSquareTest, CorrelationMatrix};
    use chrono::Utc;
    use std::path::PathBuf;

    fn create_test_report() -> Report {
        let metadata = ReportMetadata {
            data_path: "sample_employment_data.xlsx".to_string(),
            sheet: None,
            analysis_date: Utc::now(),
            rows_loaded: 120,
            alpha: 0.05,
            duration_seconds: 0.4,
        };

        let mut participation = ObjectiveResult::new(ObjectiveKind::ParticipationRate);
        participation.summary = SeriesSummary::from_values(&[38.0, 41.5, 44.0]);
        participation.state_rates = vec![
            StateRates {
                state: "1".to_string(),
                participation_rate: 38.0,
                male_rate: 52.0,
                female_rate: 22.0,
            },
            StateRates {
                state: "2".to_string(),
                participation_rate: 44.0,
                male_rate: 55.0,
                female_rate: 31.0,
            },
        ];
        participation.chart = Some(PathBuf::from("charts/participation_rate_histogram.svg"));

        let mut correlation = ObjectiveResult::new(ObjectiveKind::WorkerTypeCorrelation);
        correlation.correlation = Some(CorrelationMatrix {
            labels: vec!["Cultivators".to_string(), "Other_Workers".to_string()],
            values: vec![vec![1.0, f64::NAN], vec![f64::NAN, 1.0]],
        });

        let mut area = ObjectiveResult::new(ObjectiveKind::AreaContrast);
        area.contingency = Some(AreaContingency {
            rural_main: 700.0,
            rural_total: 1000.0,
            urban_main: 450.0,
            urban_total: 500.0,
        });
        area.expected_frequencies = Some(vec![vec![766.67, 233.33], vec![383.33, 116.67]]);
        area.tests.push(TestResult::from_chi_square(
            &ChiSquareTest {
                statistic: 61.2,
                p_value: 1e-10,
                dof: 1,
                expected: vec![],
                yates_corrected: true,
            },
            "Main workers: Rural vs Urban",
            0.05,
        ));

        let failed = ObjectiveResult::failed(
            ObjectiveKind::GenderGap,
            "paired t-test: degenerate input (differences have zero variance)".to_string(),
        );

        let objectives = vec![participation, failed, correlation, area];
        Report {
            metadata,
            overview: DatasetOverview {
                rows: 120,
                columns: vec!["State_Code".to_string(), "Area_Name".to_string()],
                head: vec![vec!["1".to_string(), "STATE 01".to_string()]],
                describe: vec![(
                    "State_Code".to_string(),
                    SeriesSummary::from_values(&[1.0, 2.0]).unwrap(),
                )],
                null_counts: vec![("State_Code".to_string(), 0), ("Area_Name".to_string(), 2)],
                duplicate_rows: 0,
            },
            summary: RunSummary::from_results(&objectives),
            objectives,
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report);

        assert!(markdown.contains("# Employment Census Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("## Dataset Overview"));
        assert!(markdown.contains("## Summary"));
        assert!(markdown.contains("## Objective 1: Workforce Participation Rate Analysis"));
        assert!(markdown.contains("![Workforce Participation Rate Analysis]"));
        assert!(markdown.contains("| Area_Name | 2 |"));
        assert!(markdown.contains("> **Failed:** paired t-test"));
        assert!(markdown.contains("### Significant Results"));
        assert!(markdown.contains("| Rural | 700 | 300 | 1000 |"));
        assert!(markdown.contains("| **Total** | 1150 | 350 | 1500 |"));
        assert!(markdown.contains("| Urban | 383.33 | 116.67 |"));
        assert!(markdown.contains("NaN"));
    }

    #[test]
    fn test_anchor() {
        assert_eq!(
            anchor("Objective 5: Urban vs Rural Main Workforce (Chi-Square Test)"),
            "objective-5-urban-vs-rural-main-workforce-chi-square-test"
        );
    }

    #[test]
    fn test_participation_ranked() {
        let report = create_test_report();
        let section = generate_objective_section(&report.objectives[0]);
        let first = section.find("| 2 | 44.00 |").unwrap();
        let second = section.find("| 1 | 38.00 |").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report();
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"metadata\""));
        assert!(json.contains("\"objectives\""));
        assert!(json.contains("\"participation_rate\""));
        // NaN coefficients serialize as null
        assert!(json.contains("null"));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["summary"]["failed"], 1);
        assert_eq!(value["objectives"][3]["expected_frequencies"][0][0], 766.67);
    }

    #[test]
    fn test_write_report() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("report.md");
        write_report(&create_test_report(), &path, false).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("# Employment"));
    }
}
