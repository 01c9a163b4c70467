//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// CensusWork - workforce participation statistics for census tables
///
/// Loads a census employment table, runs the participation, gender gap,
/// worker-type correlation, age composition and rural/urban analyses, and
/// writes a report plus SVG charts.
///
/// Examples:
///   censuswork
///   censuswork --data census_b01.xlsx --sheet "B-01"
///   censuswork --data census.csv --format json --output report.json
///   censuswork --alpha 0.01 --no-charts
///   censuswork --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Spreadsheet or CSV file to analyze
    ///
    /// Supports xlsx, xlsm, xlsb, xls, ods and csv.
    /// Defaults to sample_employment_data.xlsx or the config file setting.
    #[arg(short, long, value_name = "FILE", env = "CENSUSWORK_DATA")]
    pub data: Option<PathBuf>,

    /// Worksheet to read (defaults to the first sheet)
    #[arg(long, value_name = "NAME")]
    pub sheet: Option<String>,

    /// Output file path for the report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Directory for the SVG charts
    #[arg(long, value_name = "DIR")]
    pub chart_dir: Option<PathBuf>,

    /// Skip chart rendering
    #[arg(long)]
    pub no_charts: bool,

    /// Significance level for the statistical tests (0 < alpha < 1)
    #[arg(long, value_name = "P")]
    pub alpha: Option<f64>,

    /// Number of histogram bins for the participation rate
    #[arg(long, value_name = "N")]
    pub bins: Option<usize>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .censuswork.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Record failing analyses and continue
    ///
    /// Without this flag a degenerate statistic (e.g. zero variance) aborts
    /// the run. With it, the process exits with code 2 if anything failed.
    #[arg(long)]
    pub keep_going: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .censuswork.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(alpha) = self.alpha {
            if !(alpha > 0.0 && alpha < 1.0) {
                return Err("Alpha must be strictly between 0 and 1".to_string());
            }
        }

        if self.bins == Some(0) {
            return Err("Bins must be at least 1".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref data) = self.data {
            if !data.exists() {
                return Err(format!("Data file does not exist: {}", data.display()));
            }
            if !data.is_file() {
                return Err(format!("Data path is not a file: {}", data.display()));
            }
        }

        if let Some(ref dir) = self.chart_dir {
            if dir.exists() && !dir.is_dir() {
                return Err(format!(
                    "Chart directory is not a directory: {}",
                    dir.display()
                ));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `config_verbose` is `general.verbose` from the config file; `--quiet`
    /// still wins over it.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
