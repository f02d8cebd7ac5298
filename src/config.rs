//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.millbrief.toml` files.
//!
//! Window lengths, thresholds, and forecast horizons are deliberately
//! not configurable here; they live in static tables in
//! `engine::domains` so report output stays comparable across runs.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Data location settings.
    #[serde(default)]
    pub data: DataConfig,

    /// Report selection settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Output directory for rendered reports.
    #[serde(default = "default_out_dir")]
    pub out_dir: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            verbose: false,
        }
    }
}

fn default_out_dir() -> String {
    "reports".to_string()
}

/// Data location settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding the domain record files.
    #[serde(default = "default_data_dir")]
    pub dir: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> String {
    "data".to_string()
}

/// Report selection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Generate the daily briefing.
    #[serde(default = "default_true")]
    pub briefing: bool,

    /// Generate the copilot report.
    #[serde(default = "default_true")]
    pub copilot: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            briefing: true,
            copilot: true,
        }
    }
}

fn default_true() -> bool {
    true
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
        let default_path = Path::new(".millbrief.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref data_dir) = args.data {
            self.data.dir = data_dir.display().to_string();
        }

        if let Some(ref out_dir) = args.out_dir {
            self.general.out_dir = out_dir.display().to_string();
        }

        if let Some(kind) = args.report {
            self.report.briefing = matches!(
                kind,
                crate::cli::ReportKind::Briefing | crate::cli::ReportKind::Both
            );
            self.report.copilot = matches!(
                kind,
                crate::cli::ReportKind::Copilot | crate::cli::ReportKind::Both
            );
        }

        // Flags always override
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
