//! Mapping file preprocessing
//!
//! Two passes turn the raw mapping text into the commands run for one source:
//! - [`strip_comments`] runs once per merge: it trims every line, cuts
//!   everything from the first `#`, and drops lines left empty.
//! - [`prune_for_source`] runs once per source workbook: it drops the
//!   `BlockIf`/`EndBlockIf` markers and the lines of every block whose guard
//!   fails for that source.
//!
//! Blocks do not nest. A single emit flag is kept, so an inner `EndBlockIf`
//! switches emission back on even inside an outer block that is being skipped.
//! Mapping files must not nest blocks.

use crate::command::{is_end_block_if, Condition};
use crate::condition::evaluate;
use crate::error::Result;
use crate::workbook::Workbook;
use tracing::info;

/// Comment marker
const COMMENT: char = '#';

/// A cleaned mapping line with its 1-based line number in the original text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedLine {
    pub number: usize,
    pub text: String,
}

/// Trim and strip comments, keeping the original line numbers
pub fn numbered_lines(text: &str) -> Vec<NumberedLine> {
    text.lines()
        .enumerate()
        .filter_map(|(idx, raw)| {
            let mut line = raw.trim();
            if let Some(pos) = line.find(COMMENT) {
                line = line[..pos].trim();
            }
            (!line.is_empty()).then(|| NumberedLine {
                number: idx + 1,
                text: line.to_string(),
            })
        })
        .collect()
}

/// Trim every line, cut comments, and drop empty lines
pub fn strip_comments(text: &str) -> Vec<String> {
    numbered_lines(text).into_iter().map(|l| l.text).collect()
}

/// Drop the conditional blocks that do not apply to `source`
///
/// `cursor` is the run cursor at the time the source is opened; it is only
/// used by guards that address the current row.
pub fn prune_for_source<'a, S: AsRef<str>>(
    lines: &'a [S],
    source: &dyn Workbook,
    cursor: u32,
) -> Result<Vec<&'a str>> {
    let mut kept = Vec::with_capacity(lines.len());
    let mut emit = true;

    for line in lines {
        let line = line.as_ref();

        if let Some(condition) = Condition::parse(line) {
            if !evaluate(&condition, source, cursor)? {
                emit = false;
            }
            continue;
        }

        if is_end_block_if(line) {
            emit = true;
            continue;
        }

        if emit {
            kept.push(line);
        }
    }

    info!(
        "  Preprocess config: {} lines left from {}",
        kept.len(),
        lines.len()
    );

    Ok(kept)
}
