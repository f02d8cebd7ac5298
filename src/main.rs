//! Millbrief - narrative KPI briefings from tabular business records
//!
//! A CLI tool that reads production, shipment, and finance records,
//! compares current KPI windows against rolling baselines, fits simple
//! trend forecasts, and renders markdown reports.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad data directory, parse failure, etc.)

mod cli;
mod config;
mod engine;
mod models;
mod report;
mod store;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use cli::Args;
use config::Config;
use std::path::{Path, PathBuf};
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

    // Initialize logging
    init_logging(&args);

    info!("Millbrief v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Generate the reports
    match run_reports(args) {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Report generation failed: {}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .millbrief.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(".millbrief.toml");

    if path.exists() {
        eprintln!("⚠️  .millbrief.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .millbrief.toml")?;

    println!("✅ Created .millbrief.toml with default settings.");
    println!("   Edit it to customize the data directory and report selection.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete report workflow.
fn run_reports(args: Args) -> Result<()> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let data_dir = PathBuf::from(&config.data.dir);
    if !data_dir.is_dir() {
        bail!(
            "Data directory does not exist: {} (set --data or [data].dir in .millbrief.toml)",
            data_dir.display()
        );
    }

    // Step 1: Load the records
    println!("📂 Loading data from: {}", data_dir.display());
    let store = store::loader::load_dir(&data_dir).context("Failed to load data directory")?;
    println!(
        "   {} production, {} shipment, {} finance rows",
        store.production.len(),
        store.shipments.len(),
        store.finance.len()
    );

    // The run date only labels the briefing header; windowing follows
    // the latest periods in the data.
    let run_date = args
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    debug!("Run date label: {}", run_date);

    let out_dir = PathBuf::from(&config.general.out_dir);

    // Step 2: Compose and deliver the requested reports
    let mut written = 0usize;

    if config.report.briefing {
        println!("📝 Composing daily briefing...");
        let briefing = report::generate_briefing(&store, run_date)?;
        deliver(&args, &out_dir, "briefing", run_date, &briefing)?;
        written += 1;
    }

    if config.report.copilot {
        println!("📝 Composing copilot report...");
        let copilot = report::generate_copilot(&store)?;
        deliver(&args, &out_dir, "copilot", run_date, &copilot)?;
        written += 1;
    }

    if written == 0 {
        bail!("Nothing to do: both reports are disabled in the configuration");
    }

    println!("\n✅ Done. {} report(s) generated.", written);
    Ok(())
}

/// Print a report to stdout or write it under the output directory.
fn deliver(
    args: &Args,
    out_dir: &Path,
    name: &str,
    run_date: NaiveDate,
    content: &str,
) -> Result<()> {
    if args.stdout {
        println!("\n{}", content);
        return Ok(());
    }

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let path = out_dir.join(format!("{}_{}.md", name, run_date.format("%Y%m%d")));
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    println!("   Saved: {}", path.display());
    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .millbrief.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
