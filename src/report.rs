//! Report Module
//! Snapshot handed to the rendering layer, plus KPI text for the terminal.

use crate::dashboard::{DashboardView, DashboardWarning};
use crate::data::FilterSpec;
use crate::stats::AggregateResult;
use serde::Serialize;
use std::fmt::{self, Write as _};
use std::path::Path;

/// KPI card values as displayed on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiCards {
    pub total_customers: String,
    pub total_sales: String,
    pub returning_customers: String,
}

impl KpiCards {
    pub fn from_aggregate(aggregate: &AggregateResult) -> Self {
        Self {
            total_customers: aggregate.distinct_customers.to_string(),
            total_sales: format_currency(aggregate.total_sales),
            returning_customers: format_percent(aggregate.returning_customer_rate()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report<'a> {
    pub source: String,
    pub total_records: usize,
    pub filtered_records: usize,
    pub selection: &'a FilterSpec,
    pub kpis: KpiCards,
    pub aggregate: &'a AggregateResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<DashboardWarning>,
}

impl<'a> Report<'a> {
    pub fn from_view(source: &Path, total_records: usize, view: &'a DashboardView) -> Self {
        Self {
            source: source.display().to_string(),
            total_records,
            filtered_records: view.filtered.len(),
            selection: &view.spec,
            kpis: KpiCards::from_aggregate(&view.aggregate),
            aggregate: &view.aggregate,
            warning: view.warning,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Plain-text summary: KPI cards followed by the grouped breakdowns.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        self.write_summary(&mut out)
            .expect("writing to a String cannot fail");
        out
    }

    fn write_summary(&self, out: &mut String) -> fmt::Result {
        let agg = self.aggregate;

        writeln!(out, "Source: {}", self.source)?;
        writeln!(
            out,
            "Records: {} of {} selected",
            self.filtered_records, self.total_records
        )?;
        if self.warning == Some(DashboardWarning::EmptyResult) {
            writeln!(out, "Warning: selection matched no records")?;
        }
        writeln!(out)?;
        writeln!(out, "Total Customers      {}", self.kpis.total_customers)?;
        writeln!(out, "Total Sales          {}", self.kpis.total_sales)?;
        writeln!(out, "Returning Customers  {}", self.kpis.returning_customers)?;

        if !agg.sales_by_season.is_empty() {
            writeln!(out, "\nSales by season")?;
            for (season, sales) in &agg.sales_by_season {
                writeln!(out, "  {:<16} {}", season, format_currency(*sales))?;
            }
        }
        write_counts(out, "Top product categories", &agg.count_by_category)?;
        write_counts(out, "Payment methods", &agg.count_by_payment_method)?;
        write_counts(out, "Gender split", &agg.count_by_gender)?;

        if !agg.age_histogram.is_empty() {
            writeln!(out, "\nAge distribution")?;
            for bucket in &agg.age_histogram {
                writeln!(out, "  {:<16} {}", bucket.label(), bucket.count)?;
            }
        }
        Ok(())
    }
}

fn write_counts(out: &mut String, title: &str, counts: &[(String, usize)]) -> fmt::Result {
    if counts.is_empty() {
        return Ok(());
    }
    writeln!(out, "\n{title}")?;
    for (value, count) in counts {
        writeln!(out, "  {:<16} {}", value, count)?;
    }
    Ok(())
}

/// Whole dollars with thousands separators, e.g. `$12,345`.
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}")
}

/// Ratio rendered as a whole percentage, e.g. `0.336` → `34%`.
pub fn format_percent(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.4), "$999");
        assert_eq!(format_currency(1234.5), "$1,235");
        assert_eq!(format_currency(233081.0), "$233,081");
        assert_eq!(format_currency(1_000_000.0), "$1,000,000");
    }

    #[test]
    fn percent_rounds() {
        assert_eq!(format_percent(0.0), "0%");
        assert_eq!(format_percent(1.0 / 3.0), "33%");
        assert_eq!(format_percent(1.0), "100%");
    }

    #[test]
    fn summary_lists_warning_and_breakdowns() {
        let aggregate = AggregateResult {
            distinct_customers: 2,
            total_sales: 1500.0,
            returning_customer_count: 1,
            sales_by_season: vec![("Winter".to_string(), 1500.0)],
            count_by_category: vec![("Clothing".to_string(), 3)],
            ..AggregateResult::default()
        };
        let view = DashboardView {
            spec: FilterSpec::new(),
            filtered: crate::data::Table::default(),
            aggregate,
            warning: Some(DashboardWarning::EmptyResult),
        };
        let report = Report::from_view(Path::new("Shopping.csv"), 4, &view);
        let text = report.summary();

        assert!(text.starts_with("Source: Shopping.csv\nRecords: 0 of 4 selected\n"));
        assert!(text.contains("Warning: selection matched no records"));
        assert!(text.contains("Total Sales          $1,500"));
        assert!(text.contains("\nSales by season\n  Winter           $1,500\n"));
        assert!(text.contains("\nTop product categories\n  Clothing         3\n"));
        assert!(!text.contains("Payment methods"));
        assert!(!text.contains("Age distribution"));
    }

    #[test]
    fn kpis_for_empty_aggregate() {
        let cards = KpiCards::from_aggregate(&AggregateResult::default());
        assert_eq!(
            cards,
            KpiCards {
                total_customers: "0".to_string(),
                total_sales: "$0".to_string(),
                returning_customers: "0%".to_string(),
            }
        );
    }
}
