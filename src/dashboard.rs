//! Dashboard session.
//!
//! Holds the canonical (normalized and derived) table for one source file and
//! recomputes filtered views from it. The canonical table only depends on the
//! source content, so it is cached under a SHA-256 checksum of the file and
//! rebuilt only when [`Dashboard::refresh`] sees different bytes.

use crate::config::{ConfigError, DashboardConfig};
use crate::data::{
    DataLoader, DataProcessor, ExportError, Exporter, FacetFilter, FilterError, FilterSpec,
    LoaderError, Table,
};
use crate::stats::{AggregateResult, StatsCalculator};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Non-fatal conditions attached to a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardWarning {
    /// The selection matched no records; every aggregate is zero.
    EmptyResult,
}

/// Filtered records plus the metrics computed over them.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub spec: FilterSpec,
    pub filtered: Table,
    pub aggregate: AggregateResult,
    pub warning: Option<DashboardWarning>,
}

pub struct Dashboard {
    source: PathBuf,
    config: DashboardConfig,
    checksum: String,
    table: Table,
}

impl Dashboard {
    /// Load `source` and build its canonical table.
    pub fn open(source: impl Into<PathBuf>, config: DashboardConfig) -> Result<Self, DashboardError> {
        config.validate()?;
        let source = source.into();
        let bytes = DataLoader::read_source(&source)?;
        let checksum = source_checksum(&bytes);
        let table = Self::prepare(&bytes)?;

        info!(
            "Opened {} ({} records, checksum {})",
            source.display(),
            table.len(),
            &checksum[..12]
        );
        Ok(Self {
            source,
            config,
            checksum,
            table,
        })
    }

    /// Normalizer followed by the returning-customer derivation.
    fn prepare(bytes: &[u8]) -> Result<Table, LoaderError> {
        let normalized = DataLoader::load_bytes(bytes)?;
        Ok(DataProcessor::derive(&normalized))
    }

    /// Re-read the source. Returns `true` when the content changed and the
    /// canonical table was rebuilt.
    pub fn refresh(&mut self) -> Result<bool, DashboardError> {
        let bytes = DataLoader::read_source(&self.source)?;
        let checksum = source_checksum(&bytes);
        if checksum == self.checksum {
            debug!("Source unchanged, reusing canonical table");
            return Ok(false);
        }

        self.table = Self::prepare(&bytes)?;
        self.checksum = checksum;
        info!("Source changed, rebuilt {} records", self.table.len());
        Ok(true)
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    /// The canonical table every view is filtered from.
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Selection used when the user has not narrowed anything.
    pub fn default_selection(&self) -> FilterSpec {
        FilterSpec::all_observed(&self.table)
    }

    /// Filter the canonical table with `spec` and aggregate the result.
    pub fn view(&self, spec: &FilterSpec) -> Result<DashboardView, DashboardError> {
        let spec = spec.bounded_to(&self.table)?;
        let filtered = FacetFilter::apply(&self.table, &spec);
        let aggregate = StatsCalculator::aggregate(&filtered, &self.config.aggregate_options());

        let warning = if filtered.is_empty() {
            warn!("Selection [{}] matched no records", spec);
            Some(DashboardWarning::EmptyResult)
        } else {
            None
        };

        Ok(DashboardView {
            spec,
            filtered,
            aggregate,
            warning,
        })
    }

    /// File name for downloads of a filtered view, e.g. `filtered_Shopping.csv`.
    pub fn export_file_name(&self) -> PathBuf {
        Exporter::file_name_for(&self.source, &self.config.export_prefix)
    }

    /// Write `view`'s records into `dir` using [`Dashboard::export_file_name`].
    pub fn export(&self, view: &DashboardView, dir: &Path) -> Result<PathBuf, DashboardError> {
        let path = dir.join(self.export_file_name());
        Exporter::write_file(&view.filtered, &path)?;
        Ok(path)
    }
}

/// Hex SHA-256 of the source bytes.
pub fn source_checksum(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
