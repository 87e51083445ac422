//! Merge orchestration
//!
//! A run strips the mapping once, then for every source document prunes the
//! conditional blocks for that source and executes what is left against the
//! single destination workbook. The row cursor lives here and carries over
//! from one source to the next.

use crate::command::is_new_row;
use crate::cursor::RowCursor;
use crate::dispatch::CommandDispatcher;
use crate::error::{Error, Result};
use crate::job::MergeJob;
use crate::preprocess::{prune_for_source, strip_comments};
use crate::report::{MergeReport, SourceStats};
use crate::scanner::scan_sources;
use crate::workbook::Workbook;
use crate::xlsx::XlsxWorkbook;
use std::fs;
use tracing::info;

/// Runs a mapping against a sequence of source workbooks
pub struct MergeExecutor<W: Workbook> {
    lines: Vec<String>,
    destination: W,
    cursor: RowCursor,
}

impl<W: Workbook> MergeExecutor<W> {
    /// Create an executor from raw mapping text
    pub fn new(mapping: &str, destination: W) -> Self {
        Self::from_lines(strip_comments(mapping), destination)
    }

    /// Create an executor from already cleaned mapping lines
    pub fn from_lines(lines: Vec<String>, destination: W) -> Self {
        Self {
            lines,
            destination,
            cursor: RowCursor::new(),
        }
    }

    /// Current destination row
    pub fn cursor(&self) -> u32 {
        self.cursor.current()
    }

    /// The destination workbook
    pub fn destination(&self) -> &W {
        &self.destination
    }

    /// Run the mapping for one source document
    ///
    /// Stops at the first error; cells written before it stay in the
    /// destination, which the caller is expected to discard.
    pub fn merge_source(&mut self, source: &dyn Workbook) -> Result<SourceStats> {
        let kept = prune_for_source(&self.lines, source, self.cursor.current())?;
        let mut stats = SourceStats {
            lines_total: self.lines.len(),
            lines_kept: kept.len(),
            ..SourceStats::default()
        };

        let mut dispatcher = CommandDispatcher::new(source, &mut self.destination);
        for line in kept {
            if is_new_row(line) {
                let row = self.cursor.advance();
                info!("    NewRow: now at row {}", row);
                stats.rows_advanced += 1;
                continue;
            }
            dispatcher.dispatch(line, self.cursor.current())?;
        }
        stats.cells_written = dispatcher.writes();

        Ok(stats)
    }

    /// Finish the run and hand back the destination
    pub fn into_destination(self) -> W {
        self.destination
    }
}

/// Run a complete merge described by `job`
///
/// The destination is only written when every source merged cleanly.
pub fn run_merge(job: &MergeJob) -> Result<MergeReport> {
    let mut report = MergeReport::begin(job.map_file.clone(), job.output_file.clone());

    info!("Opening config {}...", job.map_file.display());
    let mapping = fs::read_to_string(&job.map_file).map_err(|e| Error::ConfigOpen {
        path: job.map_file.clone(),
        source: e,
    })?;

    info!("Opening destination file...");
    let mut executor = MergeExecutor::new(&mapping, XlsxWorkbook::create());

    info!("Searching for source files in {}...", job.input_dir.display());
    let scan = scan_sources(&job.input_dir)?;

    for source_file in &scan.sources {
        info!("  Opening {}...", source_file.path.display());
        let source = source_file.open()?;
        let stats = executor.merge_source(source.as_ref())?;
        report.add_source(source_file.path.clone(), stats);
    }

    let final_row = executor.cursor();
    executor.into_destination().save(&job.output_file)?;
    report.finish(final_row);

    info!(
        "Merged {} source(s) into {}",
        report.sources.len(),
        job.output_file.display()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::CellValue;
    use crate::workbook::MemoryWorkbook;
    use std::path::Path;

    fn text(s: &str) -> CellValue {
        CellValue::String(s.to_string())
    }

    #[test]
    fn test_set_new_row_set() {
        let source = MemoryWorkbook::new();
        let mut executor = MergeExecutor::new("Set:A1:Hello\nNewRow\nSet:A0:World", MemoryWorkbook::new());

        let stats = executor.merge_source(&source).unwrap();
        assert_eq!(stats.cells_written, 2);
        assert_eq!(stats.rows_advanced, 1);

        let dest = executor.into_destination();
        assert_eq!(dest.value(0, "A1"), text("Hello"));
        assert_eq!(dest.value(0, "A2"), text("World"));
    }

    #[test]
    fn test_cursor_is_not_reset_between_sources() {
        let mut executor = MergeExecutor::new("Copy:A1:A0\nNewRow", MemoryWorkbook::new());

        for name in ["first", "second", "third"] {
            let mut source = MemoryWorkbook::new();
            source.put(0, "A1", text(name));
            executor.merge_source(&source).unwrap();
        }

        assert_eq!(executor.cursor(), 4);
        let dest = executor.destination();
        assert_eq!(dest.value(0, "A1"), text("first"));
        assert_eq!(dest.value(0, "A2"), text("second"));
        assert_eq!(dest.value(0, "A3"), text("third"));
    }

    #[test]
    fn test_block_depends_on_each_source() {
        let mut executor = MergeExecutor::new(
            "BlockIf:B1\nSet:C0:Yes\nEndBlockIf\nNewRow",
            MemoryWorkbook::new(),
        );

        let mut zero = MemoryWorkbook::new();
        zero.put(0, "B1", CellValue::Integer(0));
        let mut five = MemoryWorkbook::new();
        five.put(0, "B1", CellValue::Integer(5));

        let skipped = executor.merge_source(&zero).unwrap();
        assert_eq!(skipped.lines_kept, 1);
        assert_eq!(skipped.cells_written, 0);

        executor.merge_source(&five).unwrap();

        let dest = executor.destination();
        assert_eq!(dest.value(0, "C1"), CellValue::Empty);
        assert_eq!(dest.value(0, "C2"), text("Yes"));
        assert_eq!(dest.sheet(0).unwrap().cell_count(), 1);
    }

    #[test]
    fn test_new_row_inside_skipped_block_does_not_advance() {
        let mut executor = MergeExecutor::new("BlockIf:A1\nNewRow\nEndBlockIf", MemoryWorkbook::new());
        let mut source = MemoryWorkbook::new();
        source.put(0, "A1", CellValue::Integer(0));

        executor.merge_source(&source).unwrap();
        assert_eq!(executor.cursor(), 1);
    }

    #[test]
    fn test_sheet_selector_out_of_range_stops_merge() {
        let mut executor = MergeExecutor::new(
            "Set:A1:before\nSet:Sheet3-A1:boom\nSet:A2:after",
            MemoryWorkbook::new(),
        );

        let err = executor.merge_source(&MemoryWorkbook::new()).unwrap_err();
        assert_eq!(err.exit_code(), 4);

        let dest = executor.destination();
        assert_eq!(dest.value(0, "A1"), text("before"));
        assert_eq!(dest.value(0, "A2"), CellValue::Empty);
    }

    fn write_job(dir: &Path, mapping: &str) -> MergeJob {
        let input = dir.join("submissions");
        fs::create_dir(&input).unwrap();
        fs::write(dir.join("mapping.cfg"), mapping).unwrap();
        MergeJob {
            input_dir: input,
            output_file: dir.join("output.xlsx"),
            map_file: dir.join("mapping.cfg"),
        }
    }

    #[test]
    fn test_run_merge_over_directory() {
        let dir = tempfile::tempdir().unwrap();
        let job = write_job(
            dir.path(),
            "# one row per submission\nCopy:A1:A0\nBlockIf:B1\nSet:B0:flagged\nEndBlockIf\nNewRow\n",
        );
        fs::write(job.input_dir.join("b.csv"), "bob,0\n").unwrap();
        fs::write(job.input_dir.join("a.csv"), "alice,1\n").unwrap();
        fs::write(job.input_dir.join("readme.txt"), "ignored").unwrap();

        let report = run_merge(&job).unwrap();
        assert_eq!(report.sources.len(), 2);
        assert_eq!(report.final_row, 3);
        assert_eq!(report.total_cells_written(), 3);

        let out = XlsxWorkbook::open(&job.output_file).unwrap();
        let cell = |r: &str| out.get_value(0, &crate::address::CellRef::parse(r).unwrap());
        assert_eq!(cell("A1"), text("alice"));
        assert_eq!(cell("B1"), text("flagged"));
        assert_eq!(cell("A2"), text("bob"));
        assert_eq!(cell("B2"), CellValue::Empty);
    }

    #[test]
    fn test_run_merge_xlsx_source_uses_active_tab() {
        let dir = tempfile::tempdir().unwrap();
        let job = write_job(
            dir.path(),
            "Copy:A1:A0\nCopy:Sheet1-A1:B0\nBlockIf:C1\nSet:C0:kept\nEndBlockIf\nNewRow\n",
        );

        let mut source = umya_spreadsheet::new_file();
        source.new_sheet("Second").unwrap();
        source.set_active_sheet(1);
        let sheets = source.get_sheet_collection_mut();
        sheets[0].get_cell_mut("A1").set_value_number(0);
        sheets[1].get_cell_mut("A1").set_value_number(7);
        sheets[1].get_cell_mut("C1").set_value_string("0");
        let path = job.input_dir.join("form.xlsx");
        umya_spreadsheet::writer::xlsx::write(&source, &path).unwrap();

        let reopened = XlsxWorkbook::open(&path).unwrap();
        assert_eq!(reopened.active_sheet(), 1);

        let report = run_merge(&job).unwrap();
        assert_eq!(report.sources.len(), 1);
        assert_eq!(report.final_row, 2);
        assert_eq!(report.total_cells_written(), 3);

        let out = XlsxWorkbook::open(&job.output_file).unwrap();
        let cell = |r: &str| out.get_value(0, &crate::address::CellRef::parse(r).unwrap());
        assert_eq!(cell("A1"), CellValue::Integer(7));
        assert_eq!(cell("B1"), CellValue::Integer(0));
        assert_eq!(cell("C1"), text("kept"));
    }

    #[test]
    fn test_run_merge_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let job = MergeJob {
            input_dir: dir.path().to_path_buf(),
            output_file: dir.path().join("out.xlsx"),
            map_file: dir.path().join("absent.cfg"),
        };

        let err = run_merge(&job).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_run_merge_bad_source_is_fatal_and_unsaved() {
        let dir = tempfile::tempdir().unwrap();
        let job = write_job(dir.path(), "Set:A1:x\n");
        fs::write(job.input_dir.join("broken.xlsx"), "not a zip").unwrap();

        let err = run_merge(&job).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(!job.output_file.exists());
    }

    #[test]
    fn test_run_merge_sheet_out_of_range_is_unsaved() {
        let dir = tempfile::tempdir().unwrap();
        let job = write_job(dir.path(), "Set:A1:x\nCopy:Sheet2-A1:B1\n");
        fs::write(job.input_dir.join("one.csv"), "1\n").unwrap();

        let err = run_merge(&job).unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(!job.output_file.exists());
    }

    #[test]
    fn test_run_merge_save_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut job = write_job(dir.path(), "Set:A1:x\n");
        job.output_file = dir.path().join("missing").join("out.xlsx");

        let err = run_merge(&job).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
