//! Spreadsheet workbook reader (xlsx, xlsm, xlsb, xls, ods)

use super::{ReadOptions, TableReader};
use crate::error::{TableError, TableResult};
use calamine::{open_workbook_auto, Data, Range, Reader};
use expodoc_core::dates::{from_serial_day, parse_date_text};
use expodoc_core::{Cell, Dataset};
use std::path::Path;

/// Workbook reader; the first row of the sheet is the header
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkbookReader;

impl TableReader for WorkbookReader {
    fn name(&self) -> &'static str {
        "workbook"
    }

    fn read(&self, path: &Path, options: &ReadOptions) -> TableResult<Dataset> {
        let mut workbook =
            open_workbook_auto(path).map_err(|e| TableError::workbook_error(path, e))?;

        let range = match options.sheet.as_deref() {
            Some(name) => {
                if !workbook.sheet_names().iter().any(|s| s == name) {
                    return Err(TableError::SheetNotFound {
                        path: path.to_path_buf(),
                        sheet: name.to_string(),
                    });
                }
                workbook
                    .worksheet_range(name)
                    .map_err(|e| TableError::workbook_error(path, e))?
            }
            None => workbook
                .worksheet_range_at(0)
                .ok_or_else(|| TableError::SheetNotFound {
                    path: path.to_path_buf(),
                    sheet: "first worksheet".to_string(),
                })?
                .map_err(|e| TableError::workbook_error(path, e))?,
        };

        Ok(range_to_dataset(&range))
    }

    fn extensions(&self) -> &[&str] {
        &["xlsx", "xlsm", "xlsb", "xls", "ods"]
    }
}

/// Convert a worksheet range; fully empty rows are skipped
fn range_to_dataset(range: &Range<Data>) -> Dataset {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Dataset::default();
    };
    let columns: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(i, cell)| header_name(i, cell))
        .collect();

    let mut dataset = Dataset::new(columns);
    let mut skipped = 0usize;
    for row in rows {
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            skipped += 1;
            continue;
        }
        dataset.push_values(row.iter().map(to_cell));
    }
    if skipped > 0 {
        tracing::debug!("Skipped {skipped} empty worksheet rows");
    }
    dataset
}

fn header_name(index: usize, cell: &Data) -> String {
    match cell {
        Data::Empty => format!("Unnamed: {index}"),
        Data::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

fn to_cell(cell: &Data) -> Cell {
    match cell {
        Data::Int(n) => Cell::Int(*n),
        Data::Float(f) => Cell::Float(*f),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            from_serial_day(serial).map_or(Cell::Float(serial), Cell::Date)
        }
        Data::DateTimeIso(s) => {
            parse_date_text(s).map_or_else(|| Cell::Text(s.clone()), Cell::Date)
        }
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) | Data::Empty => Cell::Empty,
    }
}
