// FILENAME: core\persistence\src\xlsx_reader.rs

use crate::{PersistenceError, RawCell};
use calamine::{open_workbook, Data, Reader, Xlsx};
use log::debug;
use std::path::Path;

/// Reads one worksheet into rows of raw cells.
/// `sheet = None` picks the first sheet in the workbook.
pub fn read_xlsx(path: &Path, sheet: Option<&str>) -> Result<Vec<Vec<RawCell>>, PersistenceError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let sheet_names = workbook.sheet_names().to_vec();

    if sheet_names.is_empty() {
        return Err(PersistenceError::InvalidFormat(
            "Workbook contains no sheets".to_string(),
        ));
    }

    let sheet_name = match sheet {
        Some(name) => sheet_names
            .iter()
            .find(|s| s.as_str() == name)
            .cloned()
            .ok_or_else(|| PersistenceError::SheetNotFound(name.to_string()))?,
        None => sheet_names[0].clone(),
    };
    debug!(target: "LOAD", "Reading sheet {:?} of {}", sheet_name, path.display());

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| PersistenceError::InvalidFormat(e.to_string()))?;

    let rows = range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::Empty => RawCell::Empty,
                    Data::String(s) => RawCell::Text(s.clone()),
                    Data::Float(f) => RawCell::Number(*f),
                    Data::Int(i) => RawCell::Number(*i as f64),
                    Data::Bool(b) => RawCell::Boolean(*b),
                    Data::Error(e) => RawCell::Error(format!("{:?}", e)),
                    Data::DateTime(dt) => RawCell::Number(dt.as_f64()),
                    Data::DateTimeIso(s) => RawCell::Text(s.clone()),
                    Data::DurationIso(s) => RawCell::Text(s.clone()),
                })
                .collect()
        })
        .collect();

    Ok(rows)
}
