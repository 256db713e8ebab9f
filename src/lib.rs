//! Shoplens - Online Shopping Behavior Analysis
//!
//! Loads an e-commerce transaction CSV, normalizes it into a canonical schema,
//! derives returning customers, applies faceted filters and computes the
//! aggregates behind the shopping dashboard.

pub mod cli;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod report;
pub mod stats;

pub use cli::Args;
pub use config::{ConfigError, DashboardConfig};
pub use dashboard::{Dashboard, DashboardError, DashboardView, DashboardWarning};
pub use data::{
    DataLoader, DataProcessor, Exporter, Facet, FacetFilter, FilterSpec, LoaderError, Record,
    SalesRange, Table,
};
pub use report::Report;
pub use stats::{AggregateOptions, AggregateResult, SeasonOrder, StatsCalculator};
