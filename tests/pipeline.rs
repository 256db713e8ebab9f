//! Integration tests for the shopping analysis pipeline

use pretty_assertions::assert_eq;
use shoplens::{
    DataLoader, DataProcessor, Dashboard, DashboardConfig, DashboardWarning, Exporter, Facet,
    FacetFilter, FilterSpec, Report, SeasonOrder, StatsCalculator,
};
use shoplens::stats::AggregateOptions;
use std::io::Write;
use tempfile::NamedTempFile;

/// Create a source CSV in the raw shopping-survey layout
fn create_shopping_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        " Customer ID ,Age,Gender,Item Purchased,Category,Purchase Amount (USD),Location,Season,Payment Method "
    )
    .unwrap();

    writeln!(file, "1,55,Male,Blouse,Clothing,53,Kentucky,Winter,Credit Card").unwrap();
    writeln!(file, "2,19,Male,Sweater,Clothing,64,Maine,Winter,Bank Transfer").unwrap();
    writeln!(file, "3,50,Male,Jeans,Clothing,73,Massachusetts,Spring,Cash").unwrap();
    writeln!(file, "4,21,Female,Sandals,Footwear,90,Rhode Island,Spring,PayPal").unwrap();
    // incomplete: no purchase amount
    writeln!(file, "5,45,Male,Blouse,Clothing,,Oregon,Spring,PayPal").unwrap();
    writeln!(file, "1,63,Male,Sneakers,Footwear,49,Wyoming,Fall,Cash").unwrap();
    writeln!(file, "6,27,Female,Shorts,Clothing,20,Montana,Winter,Credit Card").unwrap();
    writeln!(file, "2,26,Male,Coat,Outerwear,85,Louisiana,Summer,Venmo").unwrap();

    file
}

#[test]
fn test_end_to_end_pipeline() {
    let source = create_shopping_csv();

    let table = DataProcessor::derive(&DataLoader::load_path(source.path()).unwrap());
    assert_eq!(table.len(), 7);

    let flags: Vec<bool> = table.iter().map(|r| r.is_returning_customer).collect();
    assert_eq!(flags, vec![false, false, false, false, true, false, true]);

    let result = StatsCalculator::aggregate(&table, &AggregateOptions::default());
    assert_eq!(result.distinct_customers, 5);
    assert_eq!(result.total_sales, 434.0);
    assert_eq!(result.returning_customer_count, 2);
    assert_eq!(
        result.sales_by_season,
        vec![
            ("Winter".to_string(), 137.0),
            ("Spring".to_string(), 163.0),
            ("Fall".to_string(), 49.0),
            ("Summer".to_string(), 85.0),
        ]
    );
    assert_eq!(
        result.count_by_category,
        vec![
            ("Clothing".to_string(), 4),
            ("Footwear".to_string(), 2),
            ("Outerwear".to_string(), 1),
        ]
    );
    assert_eq!(result.age_histogram.len(), 10);
    assert_eq!(
        result.age_histogram.iter().map(|b| b.count).sum::<usize>(),
        7
    );
}

#[test]
fn test_filtered_view_and_export_round_trip() {
    let source = create_shopping_csv();
    let out = tempfile::tempdir().unwrap();
    let config = DashboardConfig::default().season_order(SeasonOrder::Canonical);
    let dashboard = Dashboard::open(source.path(), config).unwrap();

    let spec = FilterSpec::new()
        .with_values(Facet::Season, ["Winter", "Spring"])
        .with_values(Facet::PaymentMethod, ["Credit Card", "Cash", "PayPal"])
        .with_sales_range(50.0, 100.0)
        .unwrap();
    let view = dashboard.view(&spec).unwrap();

    let ids: Vec<&str> = view.filtered.iter().map(|r| r.customer_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "3", "4"]);
    assert_eq!(
        view.aggregate.sales_by_season,
        vec![("Spring".to_string(), 163.0), ("Winter".to_string(), 53.0)]
    );

    let path = dashboard.export(&view, out.path()).unwrap();
    assert_eq!(DataLoader::load_path(&path).unwrap(), view.filtered);

    let bytes = Exporter::to_csv_bytes(&view.filtered).unwrap();
    assert_eq!(DataLoader::load_bytes(&bytes).unwrap(), view.filtered);
}

#[test]
fn test_returning_flag_survives_filtering() {
    let source = create_shopping_csv();
    let dashboard = Dashboard::open(source.path(), DashboardConfig::default()).unwrap();

    // customer 1's second purchase is in Fall; the flag comes from the full table
    let spec = FilterSpec::new().with_values(Facet::Season, ["Fall"]);
    let view = dashboard.view(&spec).unwrap();
    assert_eq!(view.filtered.len(), 1);
    assert!(view.filtered.records()[0].is_returning_customer);
    assert_eq!(view.aggregate.returning_customer_count, 1);
    assert_eq!(view.aggregate.returning_customer_rate(), 1.0);
}

#[test]
fn test_over_constrained_selection_is_zeroed() {
    let source = create_shopping_csv();
    let dashboard = Dashboard::open(source.path(), DashboardConfig::default()).unwrap();

    let spec = FilterSpec::new()
        .with_values(Facet::Season, ["Summer"])
        .with_values(Facet::Category, ["Footwear"]);
    let view = dashboard.view(&spec).unwrap();

    assert!(view.filtered.is_empty());
    assert_eq!(view.warning, Some(DashboardWarning::EmptyResult));
    assert_eq!(view.aggregate.total_sales, 0.0);
    assert!(view.aggregate.age_histogram.is_empty());

    let report = Report::from_view(dashboard.source(), dashboard.table().len(), &view);
    assert_eq!(report.kpis.total_sales, "$0");
    assert_eq!(report.kpis.returning_customers, "0%");
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["warning"], "empty_result");
    assert_eq!(json["filtered_records"], 0);
}

#[test]
fn test_report_summary_lists_kpis() {
    let source = create_shopping_csv();
    let dashboard = Dashboard::open(source.path(), DashboardConfig::default()).unwrap();
    let view = dashboard.view(&dashboard.default_selection()).unwrap();
    let report = Report::from_view(dashboard.source(), dashboard.table().len(), &view);

    let summary = report.summary();
    assert!(summary.contains("Total Customers      5"));
    assert!(summary.contains("Total Sales          $434"));
    assert!(summary.contains("Returning Customers  40%"));
    assert!(summary.contains("Records: 7 of 7 selected"));
}

#[test]
fn test_filter_does_not_mutate_input() {
    let source = create_shopping_csv();
    let table = DataProcessor::derive(&DataLoader::load_path(source.path()).unwrap());
    let snapshot = table.clone();

    let spec = FilterSpec::new().with_values(Facet::Gender, ["Female"]);
    let filtered = FacetFilter::apply(&table, &spec);

    assert_eq!(filtered.len(), 2);
    assert_eq!(table, snapshot);
}
