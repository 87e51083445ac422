//! Execution of `Set` and `Copy` lines against the destination workbook

use crate::address::resolve;
use crate::command::{CopyCommand, SetCommand};
use crate::error::Result;
use crate::value::CellValue;
use crate::workbook::Workbook;
use tracing::info;

/// Runs command lines for one source against the destination
///
/// The dispatcher borrows both workbooks for the duration of a source. The
/// cursor value is passed in per line, so row aliases resolve to the row that
/// is current when the line runs.
pub struct CommandDispatcher<'a> {
    source: &'a dyn Workbook,
    destination: &'a mut dyn Workbook,
    writes: usize,
}

impl<'a> CommandDispatcher<'a> {
    /// Create a dispatcher for one source workbook
    pub fn new(source: &'a dyn Workbook, destination: &'a mut dyn Workbook) -> Self {
        Self {
            source,
            destination,
            writes: 0,
        }
    }

    /// Run one line
    ///
    /// The `Set` and `Copy` grammars are tried independently and both fire if
    /// both match. Lines matching neither do nothing. Returns the number of
    /// cells written.
    pub fn dispatch(&mut self, line: &str, cursor: u32) -> Result<usize> {
        let mut written = 0;

        if let Some(set) = SetCommand::parse(line) {
            self.apply_set(&set, cursor)?;
            written += 1;
        }

        if let Some(copy) = CopyCommand::parse(line) {
            self.apply_copy(&copy, cursor)?;
            written += 1;
        }

        self.writes += written;
        Ok(written)
    }

    /// Write a literal string into the destination
    pub fn apply_set(&mut self, set: &SetCommand, cursor: u32) -> Result<()> {
        let target = resolve(&*self.destination, &set.target, cursor)?;

        info!("    Set: {} to be {}", target.cell, set.literal);
        self.destination.set_value(
            target.sheet,
            &target.cell,
            CellValue::String(set.literal.clone()),
        );
        Ok(())
    }

    /// Copy a source cell value into the destination unchanged
    pub fn apply_copy(&mut self, copy: &CopyCommand, cursor: u32) -> Result<()> {
        let target = resolve(&*self.destination, &copy.target, cursor)?;
        let source = resolve(self.source, &copy.source, cursor)?;
        let value = self.source.get_value(source.sheet, &source.cell);

        info!(
            "    Copy: {} to {} data: {:?}",
            source.cell, target.cell, value
        );
        self.destination.set_value(target.sheet, &target.cell, value);
        Ok(())
    }

    /// Total cells written by this dispatcher
    pub fn writes(&self) -> usize {
        self.writes
    }
}
