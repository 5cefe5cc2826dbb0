//! FILENAME: core/persistence/src/csv_writer.rs

use crate::schema::{COUNT_COLUMN, GROUP_COLUMN, LOWER_COLUMN, UPPER_COLUMN, VARIABLE_COLUMN};
use crate::PersistenceError;
use forest_engine::{CiBound, ResultTable, REFERENCE_LABEL};
use log::info;
use std::path::Path;

/// Writes the table as CSV using the fixed schema.
pub fn save_table_csv(table: &ResultTable, path: &Path) -> Result<(), PersistenceError> {
    let mut writer = csv::Writer::from_path(path)?;
    let with_counts = table.has_counts();

    let mut header = vec![
        GROUP_COLUMN,
        VARIABLE_COLUMN,
        table.result_label(),
        LOWER_COLUMN,
        UPPER_COLUMN,
    ];
    if with_counts {
        header.push(COUNT_COLUMN);
    }
    writer.write_record(&header)?;

    for row in table.rows() {
        let mut record = vec![
            row.group.clone(),
            row.variable.clone(),
            row.estimate.to_string(),
            bound_text(row.ci_lower),
            bound_text(row.ci_upper),
        ];
        if let (true, Some(count)) = (with_counts, row.count) {
            record.push(count.to_string());
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    info!(target: "LOAD", "Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

fn bound_text(bound: CiBound) -> String {
    match bound {
        CiBound::Reference => REFERENCE_LABEL.to_string(),
        CiBound::Value(v) => v.to_string(),
    }
}
