//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Millbrief - narrative KPI briefings from tabular business records
///
/// Reads production, shipment, and finance records from a data
/// directory and renders two markdown reports: a daily briefing
/// (latest KPIs vs rolling baselines) and a copilot report
/// (diagnostic, predictive, prescriptive).
///
/// Examples:
///   millbrief --data ./data
///   millbrief --data ./data --report briefing --stdout
///   millbrief --data ./data --date 2025-06-30 --out-dir ./reports
///   millbrief --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Data directory holding production.json, shipments.json, finance.json
    ///
    /// Files are discovered recursively by stem, case-insensitively.
    /// Can also be set via MILLBRIEF_DATA or .millbrief.toml config.
    #[arg(short, long, value_name = "DIR", env = "MILLBRIEF_DATA")]
    pub data: Option<PathBuf>,

    /// Output directory for rendered reports
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Which report(s) to generate
    #[arg(short, long, value_name = "KIND")]
    pub report: Option<ReportKind>,

    /// Run date label for the briefing header
    ///
    /// Defaults to today. Only labels the header; window selection
    /// always follows the latest periods present in the data.
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,

    /// Print reports to stdout instead of writing files
    #[arg(long)]
    pub stdout: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .millbrief.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .millbrief.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Which reports a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportKind {
    /// Daily briefing only
    Briefing,
    /// Copilot report only
    Copilot,
    /// Both reports
    #[default]
    Both,
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

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        // Validate the data directory if provided on the command line
        if let Some(ref data_dir) = self.data {
            if !data_dir.exists() {
                return Err(format!(
                    "Data directory does not exist: {}",
                    data_dir.display()
                ));
            }
            if !data_dir.is_dir() {
                return Err(format!(
                    "Data path is not a directory: {}",
                    data_dir.display()
                ));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
