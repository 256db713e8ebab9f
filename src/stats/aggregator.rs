//! Aggregator Module
//! KPIs and grouped summaries computed over a (filtered) canonical table.

use crate::data::{Facet, Table};
use crate::stats::histogram::{age_histogram, AgeBucket, DEFAULT_BINS};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Seasons in calendar order, used by [`SeasonOrder::Canonical`].
pub const CANONICAL_SEASONS: [&str; 4] = ["Spring", "Summer", "Fall", "Winter"];

/// Emission order for `sales_by_season`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SeasonOrder {
    /// Order in which seasons first appear in the table
    #[default]
    FirstSeen,
    /// Spring, Summer, Fall, Winter, then unknown seasons first-seen
    Canonical,
}

/// Tunables for [`StatsCalculator::aggregate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateOptions {
    pub histogram_bins: usize,
    pub season_order: SeasonOrder,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            histogram_bins: DEFAULT_BINS,
            season_order: SeasonOrder::FirstSeen,
        }
    }
}

/// Snapshot of dashboard metrics for one table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregateResult {
    pub distinct_customers: usize,
    pub total_sales: f64,
    pub returning_customer_count: usize,
    pub sales_by_season: Vec<(String, f64)>,
    pub count_by_category: Vec<(String, usize)>,
    pub count_by_payment_method: Vec<(String, usize)>,
    pub count_by_gender: Vec<(String, usize)>,
    pub age_histogram: Vec<AgeBucket>,
}

impl AggregateResult {
    /// Returning records per distinct customer; `0.0` when there are no customers.
    pub fn returning_customer_rate(&self) -> f64 {
        if self.distinct_customers == 0 {
            0.0
        } else {
            self.returning_customer_count as f64 / self.distinct_customers as f64
        }
    }

    pub fn is_empty(&self) -> bool {
        self.distinct_customers == 0
    }
}

/// Computes aggregate metrics.
pub struct StatsCalculator;

impl StatsCalculator {
    pub fn aggregate(table: &Table, options: &AggregateOptions) -> AggregateResult {
        let distinct_customers = table
            .iter()
            .map(|r| r.customer_id.as_str())
            .collect::<HashSet<_>>()
            .len();
        let total_sales = table.iter().fold(0.0, |acc, r| acc + r.sales_amount);
        let returning_customer_count = table.iter().filter(|r| r.is_returning_customer).count();
        let ages: Vec<u32> = table.iter().map(|r| r.age).collect();

        AggregateResult {
            distinct_customers,
            total_sales,
            returning_customer_count,
            sales_by_season: Self::sales_by_season(table, options.season_order),
            count_by_category: Self::value_counts(table, Facet::Category),
            count_by_payment_method: Self::value_counts(table, Facet::PaymentMethod),
            count_by_gender: Self::value_counts(table, Facet::Gender),
            age_histogram: age_histogram(&ages, options.histogram_bins),
        }
    }

    /// Sum of `sales_amount` per season.
    pub fn sales_by_season(table: &Table, order: SeasonOrder) -> Vec<(String, f64)> {
        let mut sums: Vec<(String, f64)> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for record in table {
            match index.get(record.season.as_str()) {
                Some(&i) => sums[i].1 += record.sales_amount,
                None => {
                    index.insert(record.season.as_str(), sums.len());
                    sums.push((record.season.clone(), record.sales_amount));
                }
            }
        }

        if order == SeasonOrder::Canonical {
            // stable: unknown seasons keep first-seen order after the known four
            sums.sort_by_key(|(season, _)| {
                CANONICAL_SEASONS
                    .iter()
                    .position(|s| s.eq_ignore_ascii_case(season))
                    .unwrap_or(CANONICAL_SEASONS.len())
            });
        }
        sums
    }

    /// Record count per facet value, descending; ties keep first-seen order.
    pub fn value_counts(table: &Table, facet: Facet) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for record in table {
            let value = record.facet_value(facet);
            match index.get(value) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(value, counts.len());
                    counts.push((value.to_string(), 1));
                }
            }
        }

        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }
}
