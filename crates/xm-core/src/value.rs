//! Cell values moved between workbooks

use serde::{Deserialize, Serialize};

/// A cell value with type detection
///
/// Only values travel through a merge; formatting and formulas are never
/// represented here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    /// Integer value
    Integer(i64),
    /// Floating-point value
    Float(f64),
    /// String value
    String(String),
    /// Boolean value
    Bool(bool),
    /// Empty/absent cell
    Empty,
}

impl CellValue {
    /// Parse a string into a CellValue, detecting the type
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return CellValue::Empty;
        }

        // Try parsing as integer first
        if let Ok(i) = trimmed.parse::<i64>() {
            return CellValue::Integer(i);
        }

        if let Ok(f) = trimmed.parse::<f64>() {
            return CellValue::Float(f);
        }

        CellValue::String(trimmed.to_string())
    }

    /// Build a value from a stored number, keeping whole numbers as integers
    pub fn from_number(n: f64) -> Self {
        if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
            CellValue::Integer(n as i64)
        } else {
            CellValue::Float(n)
        }
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// True only for values that compare equal to the number zero.
    ///
    /// Strings never do, even when their text is `"0"`, and neither does an
    /// empty cell.
    pub fn is_numeric_zero(&self) -> bool {
        match self {
            CellValue::Integer(i) => *i == 0,
            CellValue::Float(f) => *f == 0.0,
            CellValue::Bool(b) => !*b,
            CellValue::String(_) | CellValue::Empty => false,
        }
    }

    /// Convert to a display string
    pub fn to_string_value(&self) -> String {
        match self {
            CellValue::Integer(i) => i.to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::String(s) => s.clone(),
            CellValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            CellValue::Empty => String::new(),
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_string_value())
    }
}
