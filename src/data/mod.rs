//! Data module - CSV loading, normalization, filtering and export

mod export;
mod filter;
mod loader;
mod processor;
pub mod record;

pub use export::{ExportError, Exporter};
pub use filter::{FacetFilter, FilterError, FilterSpec, SalesRange};
pub use loader::{canonical_name, DataLoader, LoaderError};
pub use processor::DataProcessor;
pub use record::{Facet, Record, Table};
