//! Symbolic cell addresses and their resolution against a workbook
//!
//! A mapping address is `[Sheet<N>-]<COLUMN><ROW>`. The sheet selector is
//! 1-based and counts tabs in workbook order. A row of exactly `0` is the
//! current-row alias and is replaced by the run cursor when the command
//! executes.

use crate::error::{Error, Result};
use crate::workbook::Workbook;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The row part of an address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowToken {
    /// The current cursor row (written as `0`)
    Current,
    /// A fixed row number
    Literal(u32),
}

impl RowToken {
    /// Interpret a run of digits
    ///
    /// Only the exact text `0` is the alias. Other spellings of zero such as
    /// `00` stay literal and resolve to the invalid row 0.
    pub fn parse(digits: &str) -> Self {
        if digits == "0" {
            RowToken::Current
        } else {
            RowToken::Literal(digits.parse().unwrap_or(0))
        }
    }

    /// Concrete row number given the cursor value
    pub fn resolve(self, cursor: u32) -> u32 {
        match self {
            RowToken::Current => cursor,
            RowToken::Literal(row) => row,
        }
    }
}

impl fmt::Display for RowToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowToken::Current => write!(f, "0"),
            RowToken::Literal(row) => write!(f, "{}", row),
        }
    }
}

/// A symbolic address as written in a mapping file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// 1-based sheet selector, `None` for the active sheet
    pub sheet: Option<u32>,
    /// Column letters
    pub column: String,
    /// Row number or the current-row alias
    pub row: RowToken,
}

impl Address {
    /// Build an address from the captured pieces of a command line
    ///
    /// `sheet` is the raw selector text including its trailing hyphen, such as
    /// `Sheet2-`.
    pub fn from_parts(sheet: Option<&str>, column: &str, row: &str) -> Self {
        Self {
            sheet: sheet.and_then(parse_sheet_selector),
            column: column.to_string(),
            row: RowToken::parse(row),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(n) = self.sheet {
            write!(f, "Sheet{}-", n)?;
        }
        write!(f, "{}{}", self.column, self.row)
    }
}

/// Parse `Sheet<N>-` into `N`
///
/// Selectors whose number does not fit are treated as pointing past the last
/// sheet.
fn parse_sheet_selector(text: &str) -> Option<u32> {
    let digits = text.strip_prefix("Sheet")?.strip_suffix('-')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(digits.parse().unwrap_or(u32::MAX))
}

/// A concrete A1-style cell reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRef {
    /// Column letters
    pub column: String,
    /// 1-based row number; 0 marks a malformed reference
    pub row: u32,
}

impl CellRef {
    /// Create a new cell reference
    pub fn new(column: impl Into<String>, row: u32) -> Self {
        Self {
            column: column.into(),
            row,
        }
    }

    /// Parse text such as `AB12`
    pub fn parse(text: &str) -> Option<Self> {
        let split = text.find(|c: char| !c.is_ascii_uppercase())?;
        let (column, row) = text.split_at(split);
        if column.is_empty() || row.is_empty() || !row.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self::new(column, row.parse().ok()?))
    }

    /// Whether a workbook can address this cell
    pub fn is_valid(&self) -> bool {
        self.row > 0 && column_number(&self.column).is_some()
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column, self.row)
    }
}

/// An address bound to a workbook sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAddress {
    /// 0-based sheet index in tab order
    pub sheet: usize,
    /// Concrete cell
    pub cell: CellRef,
}

/// Pick the sheet a selector refers to
///
/// No selector means the active sheet. `Sheet<N>-` is the `N`th tab; `N` of
/// zero or past the last tab is an error.
pub fn resolve_sheet(workbook: &dyn Workbook, selector: Option<u32>) -> Result<usize> {
    let Some(n) = selector else {
        return Ok(workbook.active_sheet());
    };

    let available = workbook.sheet_count();
    match (n as usize).checked_sub(1) {
        Some(index) if index < available => Ok(index),
        _ => Err(Error::SheetOutOfRange {
            selector: n,
            available,
        }),
    }
}

/// Resolve a symbolic address against a workbook and the current cursor value
pub fn resolve(workbook: &dyn Workbook, address: &Address, cursor: u32) -> Result<ResolvedAddress> {
    let sheet = resolve_sheet(workbook, address.sheet)?;
    Ok(ResolvedAddress {
        sheet,
        cell: CellRef::new(address.column.clone(), address.row.resolve(cursor)),
    })
}

/// Convert column letters to a 1-based column number (`A` = 1, `AA` = 27)
pub fn column_number(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    letters.bytes().try_fold(0u32, |acc, b| {
        if !b.is_ascii_uppercase() {
            return None;
        }
        acc.checked_mul(26)?.checked_add(u32::from(b - b'A') + 1)
    })
}

/// Convert a 1-based column number to letters (`1` = `A`, `28` = `AB`)
pub fn column_letters(mut number: u32) -> String {
    let mut letters = Vec::new();
    while number > 0 {
        let rem = ((number - 1) % 26) as u8;
        letters.push((b'A' + rem) as char);
        number = (number - 1) / 26;
    }
    letters.iter().rev().collect()
}
