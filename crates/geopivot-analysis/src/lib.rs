//! Categorical pivot aggregation over event datasets
//!
//! This crate turns a [`Dataset`](geopivot_data::Dataset) of events into the
//! ordered count tables and decluttered point sets that a report renders.
//!
//! # Overview
//!
//! 1. **Extract Categories** ([`category::extract_keys`], [`category::extract_labels`]):
//!    distinct keys of a dimension in display order, plus their display labels
//! 2. **Aggregate** ([`pivot::single_dimension_pass`], [`pivot::double_dimension_pass`]):
//!    count and point tables keyed by one or two dimensions
//! 3. **Declutter** ([`geopivot_stats::declutter`]): merge nearby points into
//!    weighted representatives before rendering
//! 4. **Relabel** ([`table::PivotTable::relabel`]): swap internal codes for display
//!    labels without disturbing table order
//!
//! [`report::Report`] runs the whole pipeline for one dataset according to a
//! [`config::ReportConfig`].
//!
//! # Examples
//!
//! ```
//! use geopivot_analysis::{
//!     category::{extract_keys, extract_labels},
//!     dimension::Dimension,
//!     pivot::single_dimension_pass,
//! };
//! use geopivot_data::{Dataset, Event};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let dataset = Dataset::from_events(&[
//!     Event::from_raw("2020-01-01", "A", "Fire", 30.0, 60.0)?,
//!     Event::from_raw("2020-02-01", "A", "Fire", 30.0, 60.0)?,
//!     Event::from_raw("2021-01-01", "B", "Flood", 40.0, 50.0)?,
//! ]);
//!
//! let keys = extract_keys(&dataset, Dimension::Type)?;
//! let labels = extract_labels(&dataset, &keys, Dimension::Type)?;
//! let (counts, _points) = single_dimension_pass(&dataset, &keys, Dimension::Type)?;
//! let counts = counts.relabel(&labels)?;
//!
//! assert_eq!(counts.get("Fire"), Some(&2));
//! assert_eq!(counts.get("Flood"), Some(&1));
//! # Ok(())
//! # }
//! ```

use geopivot_data::DatasetError;

use crate::{config::ConfigError, dimension::Dimension};

pub mod category;
pub mod config;
pub mod dimension;
pub mod pivot;
pub mod report;
pub mod table;

/// Errors that abort a report.
///
/// None of these are recoverable per row: a report is only meaningful as a
/// whole, so every error propagates to the caller.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum AnalysisError {
    #[display("invalid {dimension} value '{value}': not an integer")]
    Parse { dimension: Dimension, value: String },
    #[display("dataset query failed")]
    Dataset(DatasetError),
    #[display("month {month} is outside 1-12")]
    Range { month: i64 },
    #[display("no {dimension} entry for key '{key}'")]
    NotFound { dimension: Dimension, key: String },
    #[display("invalid report configuration")]
    Config(ConfigError),
}

impl From<DatasetError> for AnalysisError {
    fn from(err: DatasetError) -> Self {
        Self::Dataset(err)
    }
}

impl From<ConfigError> for AnalysisError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}
