//! Data Processor Module
//! Derives fields that the source table does not carry.

use crate::data::record::{Record, Table};
use std::collections::HashSet;
use tracing::debug;

/// Computes derived columns over a canonical table.
pub struct DataProcessor;

impl DataProcessor {
    /// Mark each record whose `customer_id` appeared in an earlier record.
    ///
    /// Depends on table order: the first occurrence of an id is never returning.
    pub fn derive(table: &Table) -> Table {
        let mut seen: HashSet<&str> = HashSet::with_capacity(table.len());

        let derived: Table = table
            .iter()
            .map(|record| Record {
                is_returning_customer: !seen.insert(record.customer_id.as_str()),
                ..record.clone()
            })
            .collect();

        debug!(
            "Derived returning flag: {} of {} record(s) returning",
            derived.iter().filter(|r| r.is_returning_customer).count(),
            derived.len()
        );
        derived
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::tests::record;

    #[test]
    fn returning_flag_follows_table_order() {
        let table = Table::new(vec![
            record("A", "Clothing", 10.0, 20, "Winter"),
            record("B", "Clothing", 10.0, 20, "Winter"),
            record("A", "Clothing", 10.0, 20, "Winter"),
        ]);

        let flags: Vec<bool> = DataProcessor::derive(&table)
            .iter()
            .map(|r| r.is_returning_customer)
            .collect();
        assert_eq!(flags, vec![false, false, true]);
    }

    #[test]
    fn derive_overwrites_stale_flags() {
        let mut stale = record("A", "Clothing", 10.0, 20, "Winter");
        stale.is_returning_customer = true;
        let table = Table::new(vec![stale]);

        let derived = DataProcessor::derive(&table);
        assert!(!derived.records()[0].is_returning_customer);
        // input untouched
        assert!(table.records()[0].is_returning_customer);
    }

    #[test]
    fn derive_preserves_order_and_values() {
        let table = Table::new(vec![
            record("3", "Footwear", 30.0, 33, "Fall"),
            record("1", "Clothing", 10.0, 21, "Winter"),
        ]);
        let derived = DataProcessor::derive(&table);
        assert_eq!(derived, table);
    }
}
