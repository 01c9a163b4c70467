//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.censuswork.toml` files. Every field has a default, so an empty file (or
//! no file at all) reproduces the standard census analysis.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".censuswork.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Input dataset settings.
    #[serde(default)]
    pub data: DataConfig,

    /// Column names of the census schema.
    #[serde(default)]
    pub columns: ColumnsConfig,

    /// Category labels used to select subsets.
    #[serde(default)]
    pub filters: FiltersConfig,

    /// Statistical settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Chart output settings.
    #[serde(default)]
    pub charts: ChartsConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Report output path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "employment_report.md".to_string()
}

/// Input dataset settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Spreadsheet or CSV file to analyze.
    #[serde(default = "default_data_path")]
    pub path: PathBuf,

    /// Worksheet name; the first sheet when unset.
    #[serde(default)]
    pub sheet: Option<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            sheet: None,
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("sample_employment_data.xlsx")
}

/// Column names of the census schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnsConfig {
    #[serde(default = "default_state_code")]
    pub state_code: String,
    #[serde(default = "default_district_code")]
    pub district_code: String,
    #[serde(default = "default_age_group")]
    pub age_group: String,
    #[serde(default = "default_area_type")]
    pub area_type: String,
    #[serde(default = "default_total_persons")]
    pub total_persons: String,
    #[serde(default = "default_total_males")]
    pub total_males: String,
    #[serde(default = "default_total_females")]
    pub total_females: String,
    #[serde(default = "default_total_workers")]
    pub total_workers: String,

    /// Workers by sex. When either column is missing from the data, workers
    /// are apportioned by each sex's share of persons.
    #[serde(default = "default_male_workers")]
    pub male_workers: String,
    #[serde(default = "default_female_workers")]
    pub female_workers: String,

    #[serde(default = "default_main_workers")]
    pub main_workers: String,
    #[serde(default = "default_marginal_workers")]
    pub marginal_workers: String,

    /// Worker-type columns compared in the correlation analysis.
    #[serde(default = "default_worker_types")]
    pub worker_types: Vec<String>,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            state_code: default_state_code(),
            district_code: default_district_code(),
            age_group: default_age_group(),
            area_type: default_area_type(),
            total_persons: default_total_persons(),
            total_males: default_total_males(),
            total_females: default_total_females(),
            total_workers: default_total_workers(),
            male_workers: default_male_workers(),
            female_workers: default_female_workers(),
            main_workers: default_main_workers(),
            marginal_workers: default_marginal_workers(),
            worker_types: default_worker_types(),
        }
    }
}

fn default_state_code() -> String {
    "State_Code".to_string()
}

fn default_district_code() -> String {
    "Distt_Code".to_string()
}

fn default_age_group() -> String {
    "Age_group".to_string()
}

fn default_area_type() -> String {
    "Total_or_Rural_or_Urban".to_string()
}

fn default_total_persons() -> String {
    "Total_Persons".to_string()
}

fn default_total_males() -> String {
    "Total_Males".to_string()
}

fn default_total_females() -> String {
    "Total_Females".to_string()
}

fn default_total_workers() -> String {
    "Total_Workers".to_string()
}

fn default_male_workers() -> String {
    "Male_Workers".to_string()
}

fn default_female_workers() -> String {
    "Female_Workers".to_string()
}

fn default_main_workers() -> String {
    "Main_Workers".to_string()
}

fn default_marginal_workers() -> String {
    "Marginal_Workers".to_string()
}

fn default_worker_types() -> Vec<String> {
    vec![
        "Cultivators",
        "Agricultural_Labourers",
        "Household_Industry_Workers",
        "Other_Workers",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Category labels used to select subsets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiltersConfig {
    /// District code marking state-level rows.
    #[serde(default)]
    pub state_level_district_code: f64,

    #[serde(default = "default_all_ages")]
    pub all_ages_label: String,

    #[serde(default = "default_total_label")]
    pub total_label: String,

    #[serde(default = "default_rural_label")]
    pub rural_label: String,

    #[serde(default = "default_urban_label")]
    pub urban_label: String,
}

impl Default for FiltersConfig {
    fn default() -> Self {
        Self {
            state_level_district_code: 0.0,
            all_ages_label: default_all_ages(),
            total_label: default_total_label(),
            rural_label: default_rural_label(),
            urban_label: default_urban_label(),
        }
    }
}

fn default_all_ages() -> String {
    "All ages".to_string()
}

fn default_total_label() -> String {
    "Total".to_string()
}

fn default_rural_label() -> String {
    "Rural".to_string()
}

fn default_urban_label() -> String {
    "Urban".to_string()
}

/// Statistical settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Significance level for every test.
    #[serde(default = "default_alpha")]
    pub alpha: f64,

    /// Histogram bin count for the participation rate.
    #[serde(default = "default_bins")]
    pub histogram_bins: usize,

    /// Rows shown in the dataset preview.
    #[serde(default = "default_head_rows")]
    pub head_rows: usize,

    /// Record failed objectives and continue instead of aborting.
    #[serde(default)]
    pub keep_going: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            histogram_bins: default_bins(),
            head_rows: default_head_rows(),
            keep_going: false,
        }
    }
}

fn default_alpha() -> f64 {
    0.05
}

fn default_bins() -> usize {
    10
}

fn default_head_rows() -> usize {
    5
}

/// Chart output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartsConfig {
    /// Render SVG charts.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Directory the charts are written to.
    #[serde(default = "default_chart_dir")]
    pub directory: PathBuf,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: default_chart_dir(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_chart_dir() -> PathBuf {
    PathBuf::from("charts")
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref data) = args.data {
            self.data.path = data.clone();
        }
        if let Some(ref sheet) = args.sheet {
            self.data.sheet = Some(sheet.clone());
        }
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }

        if let Some(alpha) = args.alpha {
            self.analysis.alpha = alpha;
        }
        if let Some(bins) = args.bins {
            self.analysis.histogram_bins = bins;
        }

        if let Some(ref dir) = args.chart_dir {
            self.charts.directory = dir.clone();
        }

        // Flags only ever switch behavior on
        if args.no_charts {
            self.charts.enabled = false;
        }
        if args.keep_going {
            self.analysis.keep_going = true;
        }
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
