//! Canonical Record Module
//! Typed row representation shared by every pipeline stage.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

pub const CUSTOMER_ID: &str = "customer_id";
pub const PRODUCT_CATEGORY: &str = "product_category";
pub const PAYMENT_METHOD: &str = "payment_method";
pub const SALES_AMOUNT: &str = "sales_amount";
pub const GENDER: &str = "gender";
pub const AGE: &str = "age";
pub const SEASON: &str = "season";
pub const IS_RETURNING_CUSTOMER: &str = "is_returning_customer";

/// Fields every source row must provide, in export order.
pub const REQUIRED_FIELDS: [&str; 7] = [
    CUSTOMER_ID,
    PRODUCT_CATEGORY,
    PAYMENT_METHOD,
    SALES_AMOUNT,
    GENDER,
    AGE,
    SEASON,
];

/// One row of the canonical table.
///
/// Text fields are trimmed and non-empty; the loader enforces this, so a
/// record built with padded values does not survive an export/load cycle
/// byte-for-byte.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub customer_id: String,
    pub product_category: String,
    pub payment_method: String,
    pub sales_amount: f64,
    pub gender: String,
    pub age: u32,
    pub season: String,
    pub is_returning_customer: bool,
}

impl Record {
    /// Value of a categorical facet for this record.
    pub fn facet_value(&self, facet: Facet) -> &str {
        match facet {
            Facet::Season => &self.season,
            Facet::Category => &self.product_category,
            Facet::PaymentMethod => &self.payment_method,
            Facet::Gender => &self.gender,
        }
    }
}

/// Categorical dimension a table can be filtered or grouped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    Season,
    #[serde(rename = "product_category")]
    Category,
    PaymentMethod,
    Gender,
}

impl Facet {
    pub const ALL: [Facet; 4] = [
        Facet::Season,
        Facet::Category,
        Facet::PaymentMethod,
        Facet::Gender,
    ];

    /// Canonical column name backing this facet.
    pub fn column_name(self) -> &'static str {
        match self {
            Facet::Season => SEASON,
            Facet::Category => PRODUCT_CATEGORY,
            Facet::PaymentMethod => PAYMENT_METHOD,
            Facet::Gender => GENDER,
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Ordered, immutable sequence of canonical records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    records: Vec<Record>,
}

impl Table {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Distinct values of a facet in first-seen order.
    pub fn observed_values(&self, facet: Facet) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        self.records
            .iter()
            .map(|r| r.facet_value(facet))
            .filter(|v| seen.insert(*v))
            .map(str::to_string)
            .collect()
    }

    /// Observed `(min, max)` of `sales_amount`, `None` for an empty table.
    pub fn sales_bounds(&self) -> Option<(f64, f64)> {
        self.records.iter().map(|r| r.sales_amount).fold(None, |acc, v| {
            Some(match acc {
                None => (v, v),
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
            })
        })
    }
}

impl FromIterator<Record> for Table {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
