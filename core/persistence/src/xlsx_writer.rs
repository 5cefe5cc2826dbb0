//! FILENAME: core/persistence/src/xlsx_writer.rs

use crate::schema::{COUNT_COLUMN, GROUP_COLUMN, LOWER_COLUMN, UPPER_COLUMN, VARIABLE_COLUMN};
use crate::PersistenceError;
use forest_engine::{CiBound, ResultTable, REFERENCE_LABEL};
use log::info;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

const SHEET_NAME: &str = "Results";

/// Writes the table as a single-sheet workbook using the fixed schema.
/// The count column is only written when every row has a count.
pub fn save_table_xlsx(table: &ResultTable, path: &Path) -> Result<(), PersistenceError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let header_format = Format::new().set_bold();
    let mut headers = vec![
        GROUP_COLUMN,
        VARIABLE_COLUMN,
        table.result_label(),
        LOWER_COLUMN,
        UPPER_COLUMN,
    ];
    if table.has_counts() {
        headers.push(COUNT_COLUMN);
    }
    for (col, name) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, &header_format)?;
        worksheet.set_column_width(col as u16, 16)?;
    }

    for (index, row) in table.rows().iter().enumerate() {
        let r = index as u32 + 1;
        worksheet.write_string(r, 0, &row.group)?;
        worksheet.write_string(r, 1, &row.variable)?;
        worksheet.write_number(r, 2, row.estimate)?;
        write_bound(worksheet, r, 3, row.ci_lower)?;
        write_bound(worksheet, r, 4, row.ci_upper)?;
        if let (true, Some(count)) = (table.has_counts(), row.count) {
            worksheet.write_number(r, 5, count as f64)?;
        }
    }

    workbook.save(path)?;
    info!(target: "LOAD", "Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

fn write_bound(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    bound: CiBound,
) -> Result<(), PersistenceError> {
    match bound {
        CiBound::Reference => worksheet.write_string(row, col, REFERENCE_LABEL)?,
        CiBound::Value(v) => worksheet.write_number(row, col, v)?,
    };
    Ok(())
}
