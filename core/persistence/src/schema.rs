//! FILENAME: core/persistence/src/schema.rs
//! PURPOSE: The fixed column layout of a result table.
//! CONTEXT: Columns are located by header name once, on the first non-blank
//! row. Every later lookup goes through `ColumnMap` indices, so a misnamed
//! column fails here instead of deep inside the layout code.

use crate::{LoadOptions, PersistenceError, RawCell};
use forest_engine::{CiBound, ResultRow, ResultTable};

pub const GROUP_COLUMN: &str = "Variable group";
pub const VARIABLE_COLUMN: &str = "Variable";
pub const LOWER_COLUMN: &str = "Conf int lower";
pub const UPPER_COLUMN: &str = "Conf int upper";
pub const COUNT_COLUMN: &str = "Number";
pub const DEFAULT_RESULT_COLUMN: &str = "Result";

/// Stands in for cells past the end of a short row.
static EMPTY_CELL: RawCell = RawCell::Empty;

/// Column indices resolved from the header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub group: usize,
    pub variable: usize,
    pub result: usize,
    pub lower: usize,
    pub upper: usize,
    /// The sample size column is optional.
    pub count: Option<usize>,
}

impl ColumnMap {
    pub fn resolve(header: &[RawCell], result_column: &str) -> Result<Self, PersistenceError> {
        let names: Vec<String> = header.iter().map(|c| c.display_value()).collect();
        let find = |name: &str| names.iter().position(|n| n == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| PersistenceError::MissingColumn(name.to_string()))
        };

        Ok(ColumnMap {
            group: require(GROUP_COLUMN)?,
            variable: require(VARIABLE_COLUMN)?,
            result: require(result_column.trim())?,
            lower: require(LOWER_COLUMN)?,
            upper: require(UPPER_COLUMN)?,
            count: find(COUNT_COLUMN),
        })
    }
}

/// Turns raw rows (header first) into a table. Blank rows are skipped.
pub fn build_table(
    cells: Vec<Vec<RawCell>>,
    options: &LoadOptions,
) -> Result<ResultTable, PersistenceError> {
    let mut lines = cells
        .into_iter()
        .filter(|line| !line.iter().all(RawCell::is_blank));

    let header = lines
        .next()
        .ok_or_else(|| PersistenceError::InvalidFormat("No header row found".to_string()))?;
    let columns = ColumnMap::resolve(&header, &options.result_column)?;

    let mut rows = Vec::new();
    for line in lines {
        let reader = RowReader {
            line: &line,
            row: rows.len() + 1,
        };
        let mut row = ResultRow::new(
            reader.text(columns.group),
            reader.text(columns.variable),
            reader.number(columns.result, &options.result_column)?,
            reader.bound(columns.lower, LOWER_COLUMN)?,
            reader.bound(columns.upper, UPPER_COLUMN)?,
        );
        if let Some(index) = columns.count {
            row.count = reader.count(index)?;
        }
        rows.push(row);
    }

    Ok(ResultTable::new(rows, options.result_column.trim()))
}

/// Typed access to the cells of one data row.
struct RowReader<'a> {
    line: &'a [RawCell],
    row: usize,
}

impl RowReader<'_> {
    fn cell(&self, index: usize) -> &RawCell {
        self.line.get(index).unwrap_or(&EMPTY_CELL)
    }

    fn invalid(&self, index: usize, column: &str) -> PersistenceError {
        PersistenceError::InvalidCell {
            row: self.row,
            column: column.to_string(),
            value: self.cell(index).display_value(),
        }
    }

    fn text(&self, index: usize) -> String {
        self.cell(index).display_value()
    }

    fn number(&self, index: usize, column: &str) -> Result<f64, PersistenceError> {
        self.cell(index)
            .as_number()
            .ok_or_else(|| self.invalid(index, column))
    }

    fn bound(&self, index: usize, column: &str) -> Result<CiBound, PersistenceError> {
        let cell = self.cell(index);
        if let RawCell::Text(s) = cell {
            if CiBound::is_sentinel_text(s) {
                return Ok(CiBound::Reference);
            }
        }
        self.number(index, column).map(CiBound::Value)
    }

    fn count(&self, index: usize) -> Result<Option<u64>, PersistenceError> {
        let cell = self.cell(index);
        if cell.is_blank() {
            return Ok(None);
        }
        match cell.as_number() {
            Some(n) if n >= 0.0 && n.fract() == 0.0 => Ok(Some(n as u64)),
            _ => Err(self.invalid(index, COUNT_COLUMN)),
        }
    }
}
