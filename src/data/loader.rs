//! CSV Data Loader Module
//! Reads the shopping source with Polars and normalizes it into canonical records.

use crate::data::record::{
    Record, Table, AGE, CUSTOMER_ID, GENDER, IS_RETURNING_CUSTOMER, PAYMENT_METHOD,
    PRODUCT_CATEGORY, REQUIRED_FIELDS, SALES_AMOUNT, SEASON,
};
use polars::prelude::*;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Missing source: {0}")]
    MissingSource(String),
    #[error("Schema error: {0}")]
    Schema(String),
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Source header → canonical field. Canonical names map to themselves so an
/// exported table loads back without a rename step.
const RENAME_TABLE: [(&str, &str); 15] = [
    ("Customer ID", CUSTOMER_ID),
    ("Category", PRODUCT_CATEGORY),
    ("Payment Method", PAYMENT_METHOD),
    ("Purchase Amount (USD)", SALES_AMOUNT),
    ("Gender", GENDER),
    ("Age", AGE),
    ("Season", SEASON),
    (CUSTOMER_ID, CUSTOMER_ID),
    (PRODUCT_CATEGORY, PRODUCT_CATEGORY),
    (PAYMENT_METHOD, PAYMENT_METHOD),
    (SALES_AMOUNT, SALES_AMOUNT),
    (GENDER, GENDER),
    (AGE, AGE),
    (SEASON, SEASON),
    (IS_RETURNING_CUSTOMER, IS_RETURNING_CUSTOMER),
];

/// Map a (trimmed) source header to its canonical name.
pub fn canonical_name(source: &str) -> Option<&'static str> {
    RENAME_TABLE
        .iter()
        .find(|(from, _)| *from == source)
        .map(|(_, to)| *to)
}

/// Loads raw CSV input and converts it into a canonical [`Table`].
pub struct DataLoader;

impl DataLoader {
    /// Load and normalize a CSV file.
    pub fn load_path(path: impl AsRef<Path>) -> Result<Table, LoaderError> {
        let bytes = Self::read_source(path.as_ref())?;
        Self::load_bytes(&bytes)
    }

    /// Raw bytes of the source file.
    pub fn read_source(path: &Path) -> Result<Vec<u8>, LoaderError> {
        if !path.is_file() {
            return Err(LoaderError::MissingSource(format!(
                "no source file at {}",
                path.display()
            )));
        }

        let bytes = std::fs::read(path)?;
        info!("Read {} ({} bytes)", path.display(), bytes.len());
        Ok(bytes)
    }

    /// Load and normalize CSV content already held in memory.
    pub fn load_bytes(bytes: &[u8]) -> Result<Table, LoaderError> {
        let df = Self::read_frame(bytes)?;
        Self::normalize(&df)
    }

    /// Parse CSV bytes into a DataFrame with every column kept as text.
    ///
    /// Type coercion happens in [`DataLoader::normalize`], so schema inference
    /// is switched off here.
    pub fn read_frame(bytes: &[u8]) -> Result<DataFrame, LoaderError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(LoaderError::MissingSource("source is empty".to_string()));
        }

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
            .finish()?;

        Ok(df)
    }

    /// Normalize a raw frame: trim headers, rename to canonical fields, and
    /// drop every row missing a canonical value.
    pub fn normalize(df: &DataFrame) -> Result<Table, LoaderError> {
        if df.height() == 0 {
            return Err(LoaderError::MissingSource(
                "source contains no data rows".to_string(),
            ));
        }

        let mut mapped: HashMap<&'static str, Vec<Option<String>>> = HashMap::new();
        for source_name in df.get_column_names() {
            let trimmed = source_name.trim();
            let Some(canonical) = canonical_name(trimmed) else {
                debug!("Dropping unmapped column '{}'", trimmed);
                continue;
            };
            if mapped.contains_key(canonical) {
                debug!("Column '{}' already mapped to {}, ignoring", trimmed, canonical);
                continue;
            }

            let values = Self::text_values(df, source_name.as_str())?;
            debug!("Mapped column '{}' -> {}", trimmed, canonical);
            mapped.insert(canonical, values);
        }

        if mapped.is_empty() {
            return Err(LoaderError::Schema(
                "none of the expected fields could be mapped".to_string(),
            ));
        }

        let missing: Vec<&str> = REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|field| !mapped.contains_key(field))
            .collect();
        if !missing.is_empty() {
            return Err(LoaderError::Schema(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }

        let returning = mapped.get(IS_RETURNING_CUSTOMER);
        let mut records = Vec::with_capacity(df.height());
        let mut dropped = 0usize;

        for i in 0..df.height() {
            let field = |name: &str| {
                mapped
                    .get(name)
                    .and_then(|values| values[i].as_deref())
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
            };

            let is_returning_customer = match returning {
                None => Some(false),
                Some(values) => values[i].as_deref().and_then(parse_flag),
            };

            let record = (|| {
                Some(Record {
                    customer_id: field(CUSTOMER_ID)?.to_string(),
                    product_category: field(PRODUCT_CATEGORY)?.to_string(),
                    payment_method: field(PAYMENT_METHOD)?.to_string(),
                    sales_amount: parse_amount(field(SALES_AMOUNT)?)?,
                    gender: field(GENDER)?.to_string(),
                    age: parse_age(field(AGE)?)?,
                    season: field(SEASON)?.to_string(),
                    is_returning_customer: is_returning_customer?,
                })
            })();

            match record {
                Some(record) => records.push(record),
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            warn!("Dropped {} incomplete row(s)", dropped);
        }
        if records.is_empty() {
            return Err(LoaderError::MissingSource(
                "no complete rows after normalization".to_string(),
            ));
        }

        info!("Normalized {} record(s)", records.len());
        Ok(Table::new(records))
    }

    /// Column values as optional strings.
    fn text_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, LoaderError> {
        let column = df.column(name)?;
        let text = column.cast(&DataType::String)?;
        let ca = text.str()?;
        Ok(ca.into_iter().map(|v| v.map(str::to_string)).collect())
    }
}

fn parse_amount(raw: &str) -> Option<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

fn parse_age(raw: &str) -> Option<u32> {
    raw.parse::<u32>().ok().or_else(|| {
        // Accept "42.0" style ages written by spreadsheet tools.
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.fract() == 0.0 && *v >= 0.0 && *v <= u32::MAX as f64)
            .map(|v| v as u32)
    })
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
