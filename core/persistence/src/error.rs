//! FILENAME: core/persistence/src/error.rs

use forest_engine::LayoutError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XLSX write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("XLSX read error: {0}")]
    XlsxRead(#[from] calamine::XlsxError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unsupported file extension: {0:?} (expected .csv or .xlsx)")]
    UnsupportedFileExtension(String),

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// `row` counts data rows from 1, skipping the header and blank lines.
    #[error("Data row {row}, column {column:?}: cannot read {value:?}")]
    InvalidCell {
        row: usize,
        column: String,
        value: String,
    },

    #[error(transparent)]
    Layout(#[from] LayoutError),
}
