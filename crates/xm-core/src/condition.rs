//! Evaluation of `BlockIf` guards against a source workbook

use crate::address::resolve;
use crate::command::Condition;
use crate::error::Result;
use crate::value::CellValue;
use crate::workbook::Workbook;
use tracing::info;

/// Whether a guard keeps its block for this source
///
/// - `BlockIf:<addr>` keeps the block when the cell is not numeric zero. Empty
///   cells and all strings, `"0"` included, count as not zero.
/// - `BlockIf:~<addr>` keeps the block when the cell is numeric zero or empty.
///
/// An empty cell therefore satisfies both forms.
pub fn keeps_block(value: &CellValue, negated: bool) -> bool {
    if negated {
        value.is_numeric_zero() || value.is_empty()
    } else {
        !value.is_numeric_zero()
    }
}

/// Read the guarded cell from `source` and decide whether to keep the block
///
/// `cursor` is only consulted when the guard row is the current-row alias.
pub fn evaluate(condition: &Condition, source: &dyn Workbook, cursor: u32) -> Result<bool> {
    let resolved = resolve(source, &condition.address, cursor)?;
    let value = source.get_value(resolved.sheet, &resolved.cell);
    let keep = keeps_block(&value, condition.negated);

    info!(
        "    BlockIf: {}{} data: {:?} keep: {}",
        if condition.negated { "~" } else { "" },
        condition.address,
        value,
        keep
    );

    Ok(keep)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::MemoryWorkbook;

    fn guard(line: &str) -> Condition {
        Condition::parse(line).unwrap()
    }

    #[test]
    fn test_plain_guard_truthiness() {
        assert!(!keeps_block(&CellValue::Integer(0), false));
        assert!(!keeps_block(&CellValue::Float(0.0), false));
        assert!(keeps_block(&CellValue::Integer(5), false));
        assert!(keeps_block(&CellValue::String("0".to_string()), false));
        assert!(keeps_block(&CellValue::String("no".to_string()), false));
        assert!(keeps_block(&CellValue::Empty, false));
    }

    #[test]
    fn test_negated_guard_truthiness() {
        assert!(keeps_block(&CellValue::Integer(0), true));
        assert!(keeps_block(&CellValue::Empty, true));
        assert!(!keeps_block(&CellValue::Integer(5), true));
        assert!(!keeps_block(&CellValue::String("0".to_string()), true));
    }

    #[test]
    fn test_evaluate_reads_selected_sheet() {
        let mut source = MemoryWorkbook::with_sheets(&["Front", "Data"]);
        source.put(0, "B1", CellValue::Integer(0));
        source.put(1, "B1", CellValue::Integer(5));

        assert!(!evaluate(&guard("BlockIf:B1"), &source, 1).unwrap());
        assert!(evaluate(&guard("BlockIf:Sheet2-B1"), &source, 1).unwrap());
        assert!(evaluate(&guard("BlockIf:~B1"), &source, 1).unwrap());
    }

    #[test]
    fn test_evaluate_current_row_alias() {
        let mut source = MemoryWorkbook::new();
        source.put(0, "A3", CellValue::Integer(1));

        assert!(evaluate(&guard("BlockIf:~A0"), &source, 1).unwrap());
        assert!(!evaluate(&guard("BlockIf:~A0"), &source, 3).unwrap());
    }

    #[test]
    fn test_evaluate_sheet_out_of_range() {
        let source = MemoryWorkbook::new();
        assert!(evaluate(&guard("BlockIf:Sheet4-A1"), &source, 1).is_err());
    }
}
