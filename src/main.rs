//! CensusWork - workforce participation statistics for census tables
//!
//! A CLI tool that loads a census employment table, runs five fixed
//! analyses (participation rate, gender gap, worker-type correlation, age
//! composition, rural/urban contrast) and writes a report plus SVG charts.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (missing file, schema mismatch, degenerate statistic)
//!   2 - One or more objectives failed under --keep-going

mod analysis;
mod chart;
mod cli;
mod config;
mod error;
mod models;
mod report;
mod stats;
mod table;

use analysis::Pipeline;
use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, DEFAULT_CONFIG_FILE};
use models::{Report, ReportMetadata, RunSummary};
use std::path::{Path, PathBuf};
use std::time::Instant;
use table::DatasetOverview;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Configuration is read before logging so `general.verbose` applies
    let (config, source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(args.log_level(config.general.verbose));

    info!("CensusWork v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    source.log();

    match run_analysis(args, config) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Analysis failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .censuswork.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to customize column names, filters, alpha and charts.");
    Ok(())
}

/// Initialize logging at `level`.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the complete analysis workflow. Returns exit code (0 or 2).
fn run_analysis(args: Args, mut config: Config) -> Result<i32> {
    let start_time = Instant::now();

    config.merge_with_args(&args);
    let output = output_path(&args, &config);

    // Step 1: Load the table
    println!("📥 Loading data: {}", config.data.path.display());
    let table = table::load_table(&config.data.path, config.data.sheet.as_deref())
        .with_context(|| format!("Failed to load {}", config.data.path.display()))?;
    if table.is_empty() {
        warn!("{} has a header but no data rows", config.data.path.display());
    }

    // Step 2: Dataset overview
    let overview = DatasetOverview::from_table(&table, config.analysis.head_rows);
    println!("\n{}", report::console::format_overview(&overview));

    // Step 3: Objectives, charting each as it completes
    println!("🔬 Running analyses (alpha = {})...", config.analysis.alpha);
    let pipeline = Pipeline::new(&config);
    let objectives = pipeline.run(&table, |result| {
        result.chart = chart::render_objective(result, &config)?;
        print!("{}", report::console::format_objective(result));
        Ok(())
    })?;

    // Step 4: Build the report
    println!("\n📝 Generating report...");

    let summary = RunSummary::from_results(&objectives);
    let metadata = ReportMetadata {
        data_path: config.data.path.display().to_string(),
        sheet: config.data.sheet.clone(),
        analysis_date: Utc::now(),
        rows_loaded: table.len(),
        alpha: config.analysis.alpha,
        duration_seconds: start_time.elapsed().as_secs_f64(),
    };

    let report = Report {
        metadata,
        overview,
        objectives,
        summary: summary.clone(),
    };

    // Step 5: Save the report
    report::write_report(&report, &output, args.format == OutputFormat::Json)
        .with_context(|| format!("Failed to write report to {}", output.display()))?;

    // Print summary
    println!("\n📊 Analysis Summary:");
    for line in analysis::generate_summary_text(&summary).lines() {
        println!("   {}", line);
    }
    println!("   Duration: {:.1}s", report.metadata.duration_seconds);
    println!("\n✅ Analysis complete! Report saved to: {}", output.display());

    if summary.failed > 0 {
        eprintln!(
            "\n⛔ {} objective(s) failed. Failing (exit code 2).",
            summary.failed
        );
        return Ok(2);
    }

    Ok(0)
}

/// Report path; a JSON report without an explicit path gets a `.json` name.
fn output_path(args: &Args, config: &Config) -> PathBuf {
    let path = PathBuf::from(&config.general.output);
    if args.output.is_none() && args.format == OutputFormat::Json {
        path.with_extension("json")
    } else {
        path
    }
}

/// Where the configuration came from, logged once tracing is up.
enum ConfigSource {
    File(PathBuf),
    Defaults,
    DefaultsAfterError(String),
}

impl ConfigSource {
    fn log(&self) {
        match self {
            ConfigSource::File(path) => info!("Loaded config from {}", path.display()),
            ConfigSource::Defaults => debug!("No config file found, using defaults"),
            ConfigSource::DefaultsAfterError(e) => warn!("Failed to load config: {}", e),
        }
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<(Config, ConfigSource)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigSource::File(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigSource::File(PathBuf::from(DEFAULT_CONFIG_FILE)))),
        Ok(None) => Ok((Config::default(), ConfigSource::Defaults)),
        Err(e) => Ok((Config::default(), ConfigSource::DefaultsAfterError(format!("{:#}", e)))),
    }
}
