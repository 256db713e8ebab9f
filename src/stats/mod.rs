//! Stats module - KPI aggregation and age histograms

mod aggregator;
mod histogram;

pub use aggregator::{
    AggregateOptions, AggregateResult, SeasonOrder, StatsCalculator, CANONICAL_SEASONS,
};
pub use histogram::{age_histogram, AgeBucket, DEFAULT_BINS, MAX_BINS};
