//! Facet Filter Module
//! Conjunctive categorical and sales-range filtering over a canonical table.

use crate::data::record::{Facet, Record, Table};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    #[error("Invalid sales range: min {min} is greater than max {max}")]
    InvalidRange { min: f64, max: f64 },
    #[error("Sales range bound is not a finite number")]
    NonFiniteBound,
}

/// Inclusive `[min, max]` bound on `sales_amount`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalesRange {
    pub min: f64,
    pub max: f64,
}

impl SalesRange {
    pub fn new(min: f64, max: f64) -> Result<Self, FilterError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(FilterError::NonFiniteBound);
        }
        if min > max {
            return Err(FilterError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// User selection applied to a table.
///
/// A facet absent from `facets` is unconstrained; a facet present with an
/// empty set lets nothing through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default)]
    facets: BTreeMap<Facet, BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sales_range: Option<SalesRange>,
}

impl FilterSpec {
    /// Unconstrained spec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every observed value of every facet and the full observed sales range.
    pub fn all_observed(table: &Table) -> Self {
        let facets = Facet::ALL
            .iter()
            .map(|&facet| (facet, table.observed_values(facet).into_iter().collect()))
            .collect();
        let sales_range = table
            .sales_bounds()
            .map(|(min, max)| SalesRange { min, max });
        Self {
            facets,
            sales_range,
        }
    }

    /// Restrict `facet` to `values`. An empty iterator rejects every record.
    pub fn with_values<I, S>(mut self, facet: Facet, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.facets
            .insert(facet, values.into_iter().map(Into::into).collect());
        self
    }

    /// Drop any constraint on `facet`.
    pub fn without_facet(mut self, facet: Facet) -> Self {
        self.facets.remove(&facet);
        self
    }

    pub fn with_sales_range(mut self, min: f64, max: f64) -> Result<Self, FilterError> {
        self.sales_range = Some(SalesRange::new(min, max)?);
        Ok(self)
    }

    pub fn without_sales_range(mut self) -> Self {
        self.sales_range = None;
        self
    }

    pub fn allowed(&self, facet: Facet) -> Option<&BTreeSet<String>> {
        self.facets.get(&facet)
    }

    pub fn sales_range(&self) -> Option<SalesRange> {
        self.sales_range
    }

    pub fn is_unconstrained(&self) -> bool {
        self.facets.is_empty() && self.sales_range.is_none()
    }

    /// Validate the spec against a table, clamping the sales range into the
    /// table's observed `[min, max]`.
    ///
    /// A range disjoint from the observed one is kept as requested; it matches
    /// no record.
    pub fn bounded_to(&self, table: &Table) -> Result<Self, FilterError> {
        let Some(range) = self.sales_range else {
            return Ok(self.clone());
        };
        let range = SalesRange::new(range.min, range.max)?;
        let Some((observed_min, observed_max)) = table.sales_bounds() else {
            return Ok(self.clone());
        };

        if range.max < observed_min || range.min > observed_max {
            debug!(
                "Sales range [{}, {}] outside observed [{}, {}]",
                range.min, range.max, observed_min, observed_max
            );
            return Ok(Self {
                facets: self.facets.clone(),
                sales_range: Some(range),
            });
        }

        Ok(Self {
            facets: self.facets.clone(),
            sales_range: Some(SalesRange {
                min: range.min.max(observed_min),
                max: range.max.min(observed_max),
            }),
        })
    }

    /// True when `record` satisfies every constraint.
    pub fn matches(&self, record: &Record) -> bool {
        self.facets
            .iter()
            .all(|(facet, allowed)| allowed.contains(record.facet_value(*facet)))
            && self
                .sales_range
                .map_or(true, |range| range.contains(record.sales_amount))
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unconstrained() {
            return f.write_str("unconstrained");
        }
        let mut parts: Vec<String> = self
            .facets
            .iter()
            .map(|(facet, allowed)| {
                let values: Vec<&str> = allowed.iter().map(String::as_str).collect();
                format!("{}∈{{{}}}", facet, values.join(","))
            })
            .collect();
        if let Some(range) = self.sales_range {
            parts.push(format!("sales_amount∈[{}, {}]", range.min, range.max));
        }
        f.write_str(&parts.join(" AND "))
    }
}

/// Applies a [`FilterSpec`] to a table.
pub struct FacetFilter;

impl FacetFilter {
    /// Records passing every constraint, in table order.
    pub fn apply(table: &Table, spec: &FilterSpec) -> Table {
        let filtered: Table = table.iter().filter(|r| spec.matches(r)).cloned().collect();
        debug!(
            "Filter [{}] kept {} of {} record(s)",
            spec,
            filtered.len(),
            table.len()
        );
        filtered
    }
}
