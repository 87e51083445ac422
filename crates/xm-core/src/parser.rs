//! CSV sources read as one-sheet workbooks

use crate::address::{column_letters, CellRef};
use crate::error::{Error, Result};
use crate::value::CellValue;
use crate::workbook::{MemoryWorkbook, Sheet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Parse a CSV file into a single-sheet workbook
///
/// The first record is row 1 and the first field is column `A`; there is no
/// header row. The sheet is named after the file stem.
pub fn parse_csv<P: AsRef<Path>>(path: P) -> Result<MemoryWorkbook> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::SourceOpen {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let sheet_name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Sheet");

    read_sheet(BufReader::new(file), sheet_name, path)
}

/// Parse CSV from a string (useful for testing)
pub fn parse_csv_str(content: &str, sheet_name: &str) -> Result<MemoryWorkbook> {
    read_sheet(content.as_bytes(), sheet_name, Path::new(sheet_name))
}

fn read_sheet<R: Read>(reader: R, sheet_name: &str, path: &Path) -> Result<MemoryWorkbook> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // Allow varying number of fields
        .from_reader(reader);

    let mut sheet = Sheet::new(sheet_name);
    for (row_idx, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| Error::Csv {
            path: path.to_path_buf(),
            source: e,
        })?;

        let row = row_idx as u32 + 1;
        for (col_idx, field) in record.iter().enumerate() {
            let cell = CellRef::new(column_letters(col_idx as u32 + 1), row);
            sheet.set(&cell, CellValue::parse(field));
        }
    }

    let mut book = MemoryWorkbook::with_sheets(&[]);
    book.add_sheet(sheet);
    Ok(book)
}
