//! FILENAME: core/forest-engine/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// Exactly one of the row's confidence bounds is the "Reference" sentinel.
    #[error("Row {row} ({variable}): both confidence bounds must be \"Reference\" or neither")]
    InvalidReferenceRow { row: usize, variable: String },

    /// The count column was requested but a row has no sample size.
    #[error("Row {row} ({variable}): no sample size for the count column")]
    MissingCount { row: usize, variable: String },

    #[error("Result table has no rows")]
    EmptyTable,

    #[error("Invalid color: {0}")]
    InvalidColor(String),
}
