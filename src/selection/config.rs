// Configuration for likelihood-ratio order selection
//
// The significance level, smoothing pseudo-count and the way models are
// scored and counted are all explicit settings; nothing is hard-coded in the
// selector.

use crate::error::{PathOrderError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How degrees of freedom are counted per order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DofMode {
    /// Out-degrees of the observed order-k network
    ///
    /// Undercounts higher orders on sparse data, where most k-grams that are
    /// walks in the first-order network were never observed.
    Observed,
    /// Out-degrees of every k-gram that is a walk in the first-order network
    #[default]
    Possible,
}

/// Which observations an order-k model is scored on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LikelihoodMode {
    /// Layers 0..=k combined: every path position is scored exactly once
    #[default]
    MultiOrder,
    /// Last entity of every window of the highest order, predicted from the
    /// k entities before it by the order-k maximum-likelihood estimate
    Layer,
}

/// Configuration for model-order selection
///
/// # Example
/// ```
/// use pathorder::selection::SelectionConfig;
///
/// let config = SelectionConfig::default();
/// assert_eq!(config.significance_level, 0.05);
/// assert_eq!(config.max_order, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Highest order K considered
    pub max_order: usize,

    /// Significance level (alpha) of each likelihood-ratio test
    ///
    /// The higher order is accepted when the p-value falls below it.
    /// - 0.05 (default)
    /// - 0.01: stricter, fewer spurious higher orders
    /// - 0.10: looser
    pub significance_level: f64,

    /// Pseudo-count added to every possible transition before normalizing
    ///
    /// Default: 0.0 (maximum-likelihood estimate)
    pub smoothing: f64,

    pub dof_mode: DofMode,

    pub likelihood_mode: LikelihoodMode,

    /// Build and evaluate orders on the rayon pool
    pub parallel: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            max_order: 3,
            significance_level: 0.05,
            smoothing: 0.0,
            dof_mode: DofMode::Possible,
            likelihood_mode: LikelihoodMode::MultiOrder,
            parallel: true,
        }
    }
}

impl SelectionConfig {
    /// Strict configuration: higher orders need stronger evidence
    pub fn strict() -> Self {
        Self {
            significance_level: 0.01,
            ..Self::default()
        }
    }

    /// Permissive configuration: higher orders are accepted more readily
    pub fn permissive() -> Self {
        Self {
            significance_level: 0.10,
            ..Self::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.significance_level > 0.0 && self.significance_level < 1.0) {
            return Err(PathOrderError::InvalidConfig {
                reason: format!(
                    "significance_level must be in (0, 1), got {}",
                    self.significance_level
                ),
            });
        }

        if self.max_order == 0 {
            return Err(PathOrderError::InvalidConfig {
                reason: "max_order must be at least 1".to_string(),
            });
        }

        if !self.smoothing.is_finite() || self.smoothing < 0.0 {
            return Err(PathOrderError::InvalidConfig {
                reason: format!(
                    "smoothing must be finite and non-negative, got {}",
                    self.smoothing
                ),
            });
        }

        Ok(())
    }

    /// Load configuration from a TOML file
    ///
    /// Missing keys keep their defaults.
    pub fn from_toml<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: SelectionConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }
}
