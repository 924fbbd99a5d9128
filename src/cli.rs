//! CLI argument parsing for pathorder

use crate::selection::{DofMode, LikelihoodMode, SelectionConfig};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for selection reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV format for spreadsheet analysis
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "pathorder")]
#[command(version)]
#[command(about = "Select the Markov order of path data with likelihood-ratio tests", long_about = None)]
pub struct Cli {
    /// Path file: one comma-separated path per line
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Highest order to consider (default: 3)
    #[arg(short = 'k', long = "max-order", value_name = "K")]
    pub max_order: Option<usize>,

    /// Significance level of each likelihood-ratio test (default: 0.05)
    #[arg(short = 'a', long = "alpha", value_name = "ALPHA")]
    pub alpha: Option<f64>,

    /// Pseudo-count added to every possible transition (default: 0)
    #[arg(long = "smoothing", value_name = "S")]
    pub smoothing: Option<f64>,

    /// Count degrees of freedom over observed or possible k-grams (default: possible)
    #[arg(long = "dof-mode", value_enum)]
    pub dof_mode: Option<DofMode>,

    /// Score orders as multi-order models or single layers
    #[arg(long = "likelihood-mode", value_enum)]
    pub likelihood_mode: Option<LikelihoodMode>,

    /// TOML configuration file; command-line flags override its values
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Evaluate orders one after another instead of in parallel
    #[arg(long = "sequential")]
    pub sequential: bool,

    /// Last field of each line is the path weight
    #[arg(short = 'w', long = "weighted")]
    pub weighted: bool,

    /// Print the subpath statistics summary to stderr
    #[arg(short = 's', long = "stats")]
    pub stats: bool,

    /// Output format (text, json or csv)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Selection configuration from the config file (if any) and flags
    pub fn selection_config(&self) -> anyhow::Result<SelectionConfig> {
        let mut config = match &self.config {
            Some(path) => SelectionConfig::from_toml(path)?,
            None => SelectionConfig::default(),
        };

        if let Some(max_order) = self.max_order {
            config.max_order = max_order;
        }
        if let Some(alpha) = self.alpha {
            config.significance_level = alpha;
        }
        if let Some(smoothing) = self.smoothing {
            config.smoothing = smoothing;
        }
        if let Some(dof_mode) = self.dof_mode {
            config.dof_mode = dof_mode;
        }
        if let Some(likelihood_mode) = self.likelihood_mode {
            config.likelihood_mode = likelihood_mode;
        }
        if self.sequential {
            config.parallel = false;
        }

        config.validate()?;
        Ok(config)
    }
}
