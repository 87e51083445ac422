//! The run-wide destination row cursor

use serde::{Deserialize, Serialize};

/// Current destination row for the whole merge run
///
/// Starts at 1 and only moves forward, one row per `NewRow`. It is owned by
/// the executor and is not reset between source documents; resolvers only
/// ever see a copy of its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowCursor {
    row: u32,
}

impl RowCursor {
    /// First destination row
    pub const START: u32 = 1;

    /// Create a cursor at row 1
    pub fn new() -> Self {
        Self { row: Self::START }
    }

    /// Current row
    pub fn current(&self) -> u32 {
        self.row
    }

    /// Move to the next row and return it
    pub fn advance(&mut self) -> u32 {
        self.row = self.row.saturating_add(1);
        self.row
    }

    /// Number of rows advanced since the start of the run
    pub fn advanced(&self) -> u32 {
        self.row - Self::START
    }
}

impl Default for RowCursor {
    fn default() -> Self {
        Self::new()
    }
}
