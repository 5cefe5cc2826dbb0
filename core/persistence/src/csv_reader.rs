//! FILENAME: core/persistence/src/csv_reader.rs

use crate::{PersistenceError, RawCell};
use std::path::Path;

/// Reads a CSV file into rows of raw cells. Every non-empty cell is text;
/// the schema decides which ones are numbers.
pub fn read_csv(path: &Path) -> Result<Vec<Vec<RawCell>>, PersistenceError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = record
            .iter()
            .map(|field| {
                if field.is_empty() {
                    RawCell::Empty
                } else {
                    RawCell::Text(field.to_string())
                }
            })
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_read_quoted_and_ragged_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        fs::write(&path, "a,\"b, c\"\n 1 ,,3\nonly\n").unwrap();

        let rows = read_csv(&path).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][1], RawCell::Text("b, c".to_string()));
        assert_eq!(rows[1][0], RawCell::Text("1".to_string()));
        assert_eq!(rows[1][1], RawCell::Empty);
        assert_eq!(rows[2].len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_csv(&dir.path().join("nope.csv"));
        assert!(matches!(result, Err(PersistenceError::Csv(_))));
    }
}
