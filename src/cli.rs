//! Command-line interface definitions and argument parsing

use crate::config::{ConfigError, DashboardConfig};
use crate::data::{Facet, FilterError, FilterSpec};
use crate::stats::SeasonOrder;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CLI-compatible season ordering
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliSeasonOrder {
    /// Order in which seasons first appear in the source
    FirstSeen,
    /// Spring, Summer, Fall, Winter
    Canonical,
}

impl From<CliSeasonOrder> for SeasonOrder {
    fn from(cli: CliSeasonOrder) -> Self {
        match cli {
            CliSeasonOrder::FirstSeen => SeasonOrder::FirstSeen,
            CliSeasonOrder::Canonical => SeasonOrder::Canonical,
        }
    }
}

/// Online shopping behavior analysis: normalize, filter and summarize a CSV source
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "Loads an online shopping CSV, derives returning customers, applies the \
                  selected filters and prints the dashboard KPIs.\n\n\
                  EXAMPLES:\n  \
                  shoplens -i Shopping.csv\n  \
                  shoplens -i Shopping.csv --season Winter --season Fall --min-sales 40\n  \
                  shoplens -i Shopping.csv --selection selection.json --export-dir out/"
)]
pub struct Args {
    /// Path to the source CSV file
    #[arg(short, long)]
    pub input: PathBuf,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// JSON selection file (serialized filter spec)
    #[arg(long)]
    pub selection: Option<PathBuf>,

    /// Allowed season (repeatable)
    #[arg(long = "season")]
    pub seasons: Vec<String>,

    /// Allowed product category (repeatable)
    #[arg(long = "category")]
    pub categories: Vec<String>,

    /// Allowed payment method (repeatable)
    #[arg(long = "payment")]
    pub payment_methods: Vec<String>,

    /// Allowed gender (repeatable)
    #[arg(long = "gender")]
    pub genders: Vec<String>,

    /// Lower sales bound (inclusive); defaults to the observed minimum
    #[arg(long)]
    pub min_sales: Option<f64>,

    /// Upper sales bound (inclusive); defaults to the observed maximum
    #[arg(long)]
    pub max_sales: Option<f64>,

    /// Number of age histogram buckets
    #[arg(long)]
    pub bins: Option<usize>,

    /// Ordering of the season trend
    #[arg(long, value_enum)]
    pub season_order: Option<CliSeasonOrder>,

    /// Write the JSON report to this file
    #[arg(short, long)]
    pub report: Option<PathBuf>,

    /// Print the JSON report to stdout instead of the text summary
    #[arg(long)]
    pub json: bool,

    /// Directory to write the filtered CSV export into
    #[arg(short, long)]
    pub export_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Config file values with command-line overrides applied.
    pub fn dashboard_config(&self) -> Result<DashboardConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => DashboardConfig::from_json_file(path)?,
            None => DashboardConfig::default(),
        };
        if let Some(bins) = self.bins {
            config = config.histogram_bins(bins);
        }
        if let Some(order) = self.season_order {
            config = config.season_order(order.into());
        }
        config.validate()?;
        Ok(config)
    }

    /// Merge command-line facet flags over `base`.
    ///
    /// Flags for a facet replace that facet's set; a lone bound keeps the
    /// other side of the range from `observed`.
    pub fn filter_spec(
        &self,
        base: FilterSpec,
        observed: Option<(f64, f64)>,
    ) -> Result<FilterSpec, FilterError> {
        let mut spec = base;
        for (facet, values) in [
            (Facet::Season, &self.seasons),
            (Facet::Category, &self.categories),
            (Facet::PaymentMethod, &self.payment_methods),
            (Facet::Gender, &self.genders),
        ] {
            if !values.is_empty() {
                spec = spec.with_values(facet, values.iter().cloned());
            }
        }

        if self.min_sales.is_some() || self.max_sales.is_some() {
            let current = spec
                .sales_range()
                .map(|r| (r.min, r.max))
                .or(observed)
                .unwrap_or((0.0, f64::MAX));
            let min = self.min_sales.unwrap_or(current.0);
            let max = self.max_sales.unwrap_or(current.1);
            spec = spec.with_sales_range(min, max)?;
        }
        Ok(spec)
    }
}
