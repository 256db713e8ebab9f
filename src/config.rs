//! Configuration for a dashboard session.
//!
//! Values come from an optional JSON file and are then overridden by
//! command-line flags.
//!
//! ```json
//! { "histogram_bins": 12, "season_order": "canonical", "export_prefix": "filtered_" }
//! ```

use crate::stats::{AggregateOptions, SeasonOrder, DEFAULT_BINS, MAX_BINS};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Session settings. Missing keys in a config file fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Number of equal-width age buckets. Default: 10
    pub histogram_bins: usize,
    /// Ordering of the season trend. Default: first seen
    pub season_order: SeasonOrder,
    /// Prefix for exported file names. Default: "filtered_"
    pub export_prefix: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            histogram_bins: DEFAULT_BINS,
            season_order: SeasonOrder::FirstSeen,
            export_prefix: "filtered_".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Load from a JSON file and validate.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = bins;
        self
    }

    pub fn season_order(mut self, order: SeasonOrder) -> Self {
        self.season_order = order;
        self
    }

    pub fn export_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.export_prefix = prefix.into();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.histogram_bins == 0 || self.histogram_bins > MAX_BINS {
            return Err(ConfigError::Invalid(format!(
                "histogram_bins must be between 1 and {MAX_BINS}"
            )));
        }
        if self.export_prefix.contains(['/', '\\']) {
            return Err(ConfigError::Invalid(
                "export_prefix must not contain path separators".to_string(),
            ));
        }
        Ok(())
    }

    pub fn aggregate_options(&self) -> AggregateOptions {
        AggregateOptions {
            histogram_bins: self.histogram_bins,
            season_order: self.season_order,
        }
    }
}
