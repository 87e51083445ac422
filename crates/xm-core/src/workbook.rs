//! The workbook capability the interpreter runs against
//!
//! The mapping interpreter never touches a file format directly. Everything it
//! needs from a spreadsheet is expressed by the [`Workbook`] trait:
//! - list the sheet names in tab order
//! - name the active sheet
//! - read and write a single cell value
//!
//! [`MemoryWorkbook`] is the plain in-memory implementation used for CSV
//! sources and in tests. The `.xlsx` implementation lives in [`crate::xlsx`].

use crate::address::CellRef;
use crate::value::CellValue;
use std::collections::BTreeMap;

/// Cell-level access to a workbook
pub trait Workbook {
    /// Sheet names in tab order
    fn sheet_names(&self) -> Vec<String>;

    /// 0-based index of the active sheet
    fn active_sheet(&self) -> usize;

    /// Read a cell value; missing sheets and cells read as empty
    fn get_value(&self, sheet: usize, cell: &CellRef) -> CellValue;

    /// Write a cell value; writes to a missing sheet or malformed cell are ignored
    fn set_value(&mut self, sheet: usize, cell: &CellRef, value: CellValue);

    /// Number of sheets
    fn sheet_count(&self) -> usize {
        self.sheet_names().len()
    }
}

/// A single sheet of a [`MemoryWorkbook`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    /// Sheet name as shown on its tab
    pub name: String,
    cells: BTreeMap<String, CellValue>,
}

impl Sheet {
    /// Create a new empty sheet
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: BTreeMap::new(),
        }
    }

    /// Get a cell value by reference
    pub fn get(&self, cell: &CellRef) -> Option<&CellValue> {
        self.cells.get(&cell.to_string())
    }

    /// Set a cell value by reference; empty values clear the cell
    pub fn set(&mut self, cell: &CellRef, value: CellValue) {
        if value.is_empty() {
            self.cells.remove(&cell.to_string());
        } else {
            self.cells.insert(cell.to_string(), value);
        }
    }

    /// Number of non-empty cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

/// An in-memory workbook
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryWorkbook {
    sheets: Vec<Sheet>,
    active: usize,
}

impl MemoryWorkbook {
    /// Create a workbook with one empty sheet named `Sheet`, which is active
    pub fn new() -> Self {
        Self::with_sheets(&["Sheet"])
    }

    /// Create a workbook with the given empty sheets; the first one is active
    pub fn with_sheets(names: &[&str]) -> Self {
        Self {
            sheets: names.iter().map(|n| Sheet::new(*n)).collect(),
            active: 0,
        }
    }

    /// Append a sheet and return its index
    pub fn add_sheet(&mut self, sheet: Sheet) -> usize {
        self.sheets.push(sheet);
        self.sheets.len() - 1
    }

    /// Make another sheet the active one; out-of-range indices are ignored
    pub fn set_active(&mut self, index: usize) {
        if index < self.sheets.len() {
            self.active = index;
        }
    }

    /// Get a sheet by index
    pub fn sheet(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get(index)
    }

    /// Convenience lookup by sheet index and textual reference such as `"B3"`
    pub fn value(&self, sheet: usize, reference: &str) -> CellValue {
        match CellRef::parse(reference) {
            Some(cell) => self.get_value(sheet, &cell),
            None => CellValue::Empty,
        }
    }

    /// Convenience write by sheet index and textual reference such as `"B3"`
    pub fn put(&mut self, sheet: usize, reference: &str, value: CellValue) {
        if let Some(cell) = CellRef::parse(reference) {
            self.set_value(sheet, &cell, value);
        }
    }
}

impl Workbook for MemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    fn active_sheet(&self) -> usize {
        self.active
    }

    fn get_value(&self, sheet: usize, cell: &CellRef) -> CellValue {
        self.sheets
            .get(sheet)
            .and_then(|s| s.get(cell))
            .cloned()
            .unwrap_or(CellValue::Empty)
    }

    fn set_value(&mut self, sheet: usize, cell: &CellRef, value: CellValue) {
        if !cell.is_valid() {
            return;
        }
        if let Some(s) = self.sheets.get_mut(sheet) {
            s.set(cell, value);
        }
    }

    fn sheet_count(&self) -> usize {
        self.sheets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_workbook_has_one_active_sheet() {
        let book = MemoryWorkbook::new();
        assert_eq!(book.sheet_names(), vec!["Sheet".to_string()]);
        assert_eq!(book.active_sheet(), 0);
    }

    #[test]
    fn test_get_and_set() {
        let mut book = MemoryWorkbook::with_sheets(&["One", "Two"]);
        book.put(1, "C4", CellValue::Integer(9));

        assert_eq!(book.value(1, "C4"), CellValue::Integer(9));
        assert_eq!(book.value(0, "C4"), CellValue::Empty);
        assert_eq!(book.sheet(1).unwrap().cell_count(), 1);
    }

    #[test]
    fn test_writes_to_missing_sheet_or_row_zero_are_ignored() {
        let mut book = MemoryWorkbook::new();
        book.set_value(5, &CellRef::new("A", 1), CellValue::Integer(1));
        book.set_value(0, &CellRef::new("A", 0), CellValue::Integer(1));

        assert_eq!(book.sheet(0).unwrap().cell_count(), 0);
    }

    #[test]
    fn test_set_active() {
        let mut book = MemoryWorkbook::with_sheets(&["One", "Two"]);
        book.set_active(1);
        assert_eq!(book.active_sheet(), 1);
        book.set_active(7);
        assert_eq!(book.active_sheet(), 1);
    }
}
