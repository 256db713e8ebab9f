//! CSV Exporter Module
//! Writes a canonical table back out as delimited text.

use crate::data::record::{
    Table, AGE, CUSTOMER_ID, GENDER, IS_RETURNING_CUSTOMER, PAYMENT_METHOD, PRODUCT_CATEGORY,
    SALES_AMOUNT, SEASON,
};
use polars::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write CSV: {0}")]
    Polars(#[from] PolarsError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Serializes tables using the canonical header.
pub struct Exporter;

impl Exporter {
    /// Build a DataFrame with one column per canonical field, in record order.
    pub fn to_frame(table: &Table) -> Result<DataFrame, ExportError> {
        let records = table.records();

        let df = DataFrame::new(vec![
            Column::new(
                CUSTOMER_ID.into(),
                records.iter().map(|r| r.customer_id.clone()).collect::<Vec<_>>(),
            ),
            Column::new(
                PRODUCT_CATEGORY.into(),
                records.iter().map(|r| r.product_category.clone()).collect::<Vec<_>>(),
            ),
            Column::new(
                PAYMENT_METHOD.into(),
                records.iter().map(|r| r.payment_method.clone()).collect::<Vec<_>>(),
            ),
            Column::new(
                SALES_AMOUNT.into(),
                records.iter().map(|r| r.sales_amount).collect::<Vec<f64>>(),
            ),
            Column::new(
                GENDER.into(),
                records.iter().map(|r| r.gender.clone()).collect::<Vec<_>>(),
            ),
            Column::new(
                AGE.into(),
                records.iter().map(|r| r.age).collect::<Vec<u32>>(),
            ),
            Column::new(
                SEASON.into(),
                records.iter().map(|r| r.season.clone()).collect::<Vec<_>>(),
            ),
            Column::new(
                IS_RETURNING_CUSTOMER.into(),
                records.iter().map(|r| r.is_returning_customer).collect::<Vec<bool>>(),
            ),
        ])?;

        Ok(df)
    }

    /// Serialize to CSV bytes with a header row.
    pub fn to_csv_bytes(table: &Table) -> Result<Vec<u8>, ExportError> {
        let mut buf = Vec::new();
        Self::write_csv(table, &mut buf)?;
        Ok(buf)
    }

    /// Write the table to `path`, creating parent directories as needed.
    pub fn write_file(table: &Table, path: &Path) -> Result<(), ExportError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut file = File::create(path)?;
        Self::write_csv(table, &mut file)?;

        info!("Exported {} record(s) to {}", table.len(), path.display());
        Ok(())
    }

    fn write_csv<W: Write>(table: &Table, writer: &mut W) -> Result<(), ExportError> {
        let mut df = Self::to_frame(table)?;
        CsvWriter::new(writer)
            .include_header(true)
            .with_separator(b',')
            .with_quote_char(b'"')
            .finish(&mut df)?;
        Ok(())
    }

    /// Download name for a filtered export of `source`, e.g. `filtered_Shopping.csv`.
    pub fn file_name_for(source: &Path, prefix: &str) -> PathBuf {
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "data.csv".to_string());
        PathBuf::from(format!("{prefix}{name}"))
    }
}
