//! FILENAME: core/persistence/src/lib.rs
//! Forest Plot Persistence Module
//!
//! Loads regression result tables from CSV and XLSX files and writes them
//! back out. The file type is chosen from the extension; the column layout
//! is a fixed schema checked once per load (see `schema`).

mod csv_reader;
mod csv_writer;
mod error;
mod schema;
mod xlsx_reader;
mod xlsx_writer;

pub use csv_reader::read_csv;
pub use csv_writer::save_table_csv;
pub use error::PersistenceError;
pub use schema::{
    build_table, ColumnMap, COUNT_COLUMN, DEFAULT_RESULT_COLUMN, GROUP_COLUMN, LOWER_COLUMN,
    UPPER_COLUMN, VARIABLE_COLUMN,
};
pub use xlsx_reader::read_xlsx;
pub use xlsx_writer::save_table_xlsx;

use forest_engine::ResultTable;
use log::info;
use std::path::Path;

// ============================================================================
// FILE KIND
// ============================================================================

/// Supported table file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Xlsx,
}

impl FileKind {
    /// Picks the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, PersistenceError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match extension.as_str() {
            "csv" => Ok(FileKind::Csv),
            "xlsx" => Ok(FileKind::Xlsx),
            _ => Err(PersistenceError::UnsupportedFileExtension(extension)),
        }
    }
}

// ============================================================================
// LOAD OPTIONS
// ============================================================================

/// How to find the table inside a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Worksheet to read from an XLSX file. None reads the first sheet.
    pub sheet: Option<String>,
    /// Header of the estimate column (historically "Odds Ratio").
    pub result_column: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            sheet: None,
            result_column: DEFAULT_RESULT_COLUMN.to_string(),
        }
    }
}

// ============================================================================
// RAW CELL
// ============================================================================

/// A cell as read from disk, before the schema gives it meaning.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
    Error(String),
}

impl RawCell {
    pub fn is_blank(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Numeric value, parsing text cells (CSV cells are always text).
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawCell::Number(n) => Some(*n),
            RawCell::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// The cell as it would be displayed in a spreadsheet.
    pub fn display_value(&self) -> String {
        match self {
            RawCell::Empty => String::new(),
            RawCell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    format!("{}", n)
                }
            }
            RawCell::Text(s) => s.trim().to_string(),
            RawCell::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            RawCell::Error(e) => e.clone(),
        }
    }
}

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Loads and validates a result table.
/// Fails before reading anything when the extension is not .csv or .xlsx.
pub fn load_table(path: &Path, options: &LoadOptions) -> Result<ResultTable, PersistenceError> {
    let kind = FileKind::from_path(path)?;
    info!(target: "LOAD", "Loading {:?} table from {}", kind, path.display());

    let cells = match kind {
        FileKind::Csv => read_csv(path)?,
        FileKind::Xlsx => read_xlsx(path, options.sheet.as_deref())?,
    };

    let table = build_table(cells, options)?;
    table.validate()?;

    info!(
        target: "LOAD",
        "Loaded {} rows (counts: {})",
        table.len(),
        table.has_counts()
    );
    Ok(table)
}

/// Writes a table using the fixed schema; format chosen by extension.
pub fn save_table(table: &ResultTable, path: &Path) -> Result<(), PersistenceError> {
    match FileKind::from_path(path)? {
        FileKind::Csv => save_table_csv(table, path),
        FileKind::Xlsx => save_table_xlsx(table, path),
    }
}
