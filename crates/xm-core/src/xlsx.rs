//! `.xlsx` workbooks backed by umya-spreadsheet

use crate::address::CellRef;
use crate::error::{Error, Result};
use crate::value::CellValue;
use crate::workbook::Workbook;
use std::fmt;
use std::path::Path;
use umya_spreadsheet::{Cell, Spreadsheet};

/// An `.xlsx` workbook held in memory
///
/// Reads return the stored cell values, which for formula cells is the value
/// cached by the application that last saved the file. Styles are left alone
/// and never copied.
pub struct XlsxWorkbook {
    book: Spreadsheet,
}

impl XlsxWorkbook {
    /// A fresh workbook with a single default sheet, which is active
    pub fn create() -> Self {
        Self {
            book: umya_spreadsheet::new_file(),
        }
    }

    /// Open an existing workbook
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let book = umya_spreadsheet::reader::xlsx::read(path).map_err(|e| Error::SourceOpen {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Self { book })
    }

    /// Write the workbook to `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        umya_spreadsheet::writer::xlsx::write(&self.book, path).map_err(|e| {
            Error::DestinationSave {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })
    }
}

impl fmt::Debug for XlsxWorkbook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XlsxWorkbook")
            .field("sheets", &self.sheet_names())
            .field("active", &self.active_sheet())
            .finish()
    }
}

impl Workbook for XlsxWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.book
            .get_sheet_collection()
            .iter()
            .map(|s| s.get_name().to_string())
            .collect()
    }

    fn active_sheet(&self) -> usize {
        let active = self.book.get_active_sheet().get_name();
        self.book
            .get_sheet_collection()
            .iter()
            .position(|s| s.get_name() == active)
            .unwrap_or(0)
    }

    fn get_value(&self, sheet: usize, cell: &CellRef) -> CellValue {
        if !cell.is_valid() {
            return CellValue::Empty;
        }
        self.book
            .get_sheet_collection()
            .get(sheet)
            .and_then(|s| s.get_cell(cell.to_string().as_str()))
            .map(cell_to_value)
            .unwrap_or(CellValue::Empty)
    }

    fn set_value(&mut self, sheet: usize, cell: &CellRef, value: CellValue) {
        if !cell.is_valid() {
            return;
        }
        let Some(ws) = self.book.get_sheet_collection_mut().get_mut(sheet) else {
            return;
        };
        let coordinate = cell.to_string();

        match value {
            CellValue::Integer(i) => {
                ws.get_cell_mut(coordinate.as_str()).set_value_number(i as f64);
            }
            CellValue::Float(f) => {
                ws.get_cell_mut(coordinate.as_str()).set_value_number(f);
            }
            CellValue::String(s) => {
                ws.get_cell_mut(coordinate.as_str()).set_value_string(s);
            }
            CellValue::Bool(b) => {
                ws.get_cell_mut(coordinate.as_str()).set_value_bool(b);
            }
            CellValue::Empty => {
                ws.remove_cell(coordinate.as_str());
            }
        }
    }

    fn sheet_count(&self) -> usize {
        self.book.get_sheet_collection().len()
    }
}

/// Convert a stored cell into a typed value
fn cell_to_value(cell: &Cell) -> CellValue {
    let raw = cell.get_value();
    if raw.is_empty() {
        return CellValue::Empty;
    }

    match cell.get_data_type() {
        "n" => raw
            .parse::<f64>()
            .map(CellValue::from_number)
            .unwrap_or_else(|_| CellValue::String(raw.to_string())),
        "b" => CellValue::Bool(raw.eq_ignore_ascii_case("true") || raw == "1"),
        _ => CellValue::String(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_create_has_single_active_sheet() {
        let book = XlsxWorkbook::create();
        assert_eq!(book.sheet_count(), 1);
        assert_eq!(book.active_sheet(), 0);
    }

    #[test]
    fn test_values_survive_save_and_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("book.xlsx");

        let mut book = XlsxWorkbook::create();
        book.set_value(0, &CellRef::new("A", 1), CellValue::String("0".to_string()));
        book.set_value(0, &CellRef::new("B", 2), CellValue::Integer(5));
        book.set_value(0, &CellRef::new("C", 3), CellValue::Float(2.5));
        book.save(&path).unwrap();

        let reopened = XlsxWorkbook::open(&path).unwrap();
        assert_eq!(
            reopened.get_value(0, &CellRef::new("A", 1)),
            CellValue::String("0".to_string())
        );
        assert_eq!(reopened.get_value(0, &CellRef::new("B", 2)), CellValue::Integer(5));
        assert_eq!(reopened.get_value(0, &CellRef::new("C", 3)), CellValue::Float(2.5));
        assert_eq!(reopened.get_value(0, &CellRef::new("D", 4)), CellValue::Empty);
    }

    #[test]
    fn test_invalid_cells_are_ignored() {
        let mut book = XlsxWorkbook::create();
        book.set_value(0, &CellRef::new("A", 0), CellValue::Integer(1));
        book.set_value(9, &CellRef::new("A", 1), CellValue::Integer(1));

        assert_eq!(book.get_value(0, &CellRef::new("A", 0)), CellValue::Empty);
        assert_eq!(book.get_value(9, &CellRef::new("A", 1)), CellValue::Empty);
    }

    #[test]
    fn test_empty_value_removes_cell() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("book.xlsx");

        let mut book = XlsxWorkbook::create();
        book.set_value(0, &CellRef::new("A", 1), CellValue::Integer(3));
        book.set_value(0, &CellRef::new("A", 1), CellValue::Empty);
        book.set_value(0, &CellRef::new("B", 1), CellValue::Empty);
        assert!(book.book.get_sheet_collection()[0].get_cell("A1").is_none());
        assert!(book.book.get_sheet_collection()[0].get_cell("B1").is_none());
        book.save(&path).unwrap();

        let reopened = XlsxWorkbook::open(&path).unwrap();
        assert_eq!(reopened.get_value(0, &CellRef::new("A", 1)), CellValue::Empty);
        assert!(reopened.book.get_sheet_collection()[0].get_cell("A1").is_none());
    }

    #[test]
    fn test_debug_lists_sheets() {
        let book = XlsxWorkbook::create();
        let text = format!("{:?}", book);
        assert!(text.starts_with("XlsxWorkbook"));
        assert!(text.contains("Sheet1"));
    }

    #[test]
    fn test_open_missing_file_is_source_error() {
        let dir = tempdir().unwrap();
        let err = XlsxWorkbook::open(dir.path().join("missing.xlsx")).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let book = XlsxWorkbook::create();

        let err = book.save(dir.path().join("nope").join("out.xlsx")).unwrap_err();
        assert!(matches!(err, Error::DestinationSave { .. }));
    }
}
