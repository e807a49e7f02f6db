//! Event records and the read-only tabular dataset the report engine queries.
//!
//! - [`event`]: One parsed event row (date parts, type code/name, coordinates)
//! - [`dataset`]: Columnar dataset with equality filtering and column extraction
//! - [`ingest`]: Semicolon-delimited CSV ingestion into events

pub use self::{dataset::*, event::*, ingest::*};

pub mod dataset;
pub mod event;
pub mod ingest;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum DatasetError {
    #[display("dataset has no '{column}' column")]
    MissingColumn { column: Column },
    #[display("'{value}' is not a valid value for numeric column '{column}'")]
    InvalidValue { column: Column, value: String },
    #[display("column '{column}' is not numeric")]
    NotNumeric { column: Column },
    #[display("column '{column}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        column: Column,
        expected: usize,
        actual: usize,
    },
}
