//! Discovery of source workbooks in the input directory

use crate::error::Result;
use crate::parser::parse_csv;
use crate::workbook::Workbook;
use crate::xlsx::XlsxWorkbook;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File formats accepted as sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    /// Office Open XML workbook (`.xlsx`, `.xlsm`)
    Xlsx,
    /// Comma-separated values, read as a single sheet
    Csv,
}

impl SourceKind {
    /// Detect the kind from a file extension, ignoring case
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" | "xlsm" => Some(SourceKind::Xlsx),
            "csv" => Some(SourceKind::Csv),
            _ => None,
        }
    }
}

/// A source file found in the input directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Full path to the file
    pub path: PathBuf,
    /// Detected format
    pub kind: SourceKind,
}

impl SourceFile {
    /// Open the file as a read-only workbook
    pub fn open(&self) -> Result<Box<dyn Workbook>> {
        let book: Box<dyn Workbook> = match self.kind {
            SourceKind::Xlsx => Box::new(XlsxWorkbook::open(&self.path)?),
            SourceKind::Csv => Box::new(parse_csv(&self.path)?),
        };
        Ok(book)
    }
}

/// Result of scanning the input directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    /// Directory that was scanned
    pub root: PathBuf,
    /// Sources sorted by file name
    pub sources: Vec<SourceFile>,
    /// Files skipped because of their extension
    pub skipped: usize,
}

/// List the source files directly inside `root`
///
/// Subdirectories are not entered. Files are returned in file-name order so a
/// merge over the same directory always runs in the same order.
pub fn scan_sources<P: AsRef<Path>>(root: P) -> Result<ScanResult> {
    let root = root.as_ref();
    let mut sources = Vec::new();
    let mut skipped = 0;

    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        match SourceKind::from_path(entry.path()) {
            Some(kind) => sources.push(SourceFile {
                path: entry.path().to_path_buf(),
                kind,
            }),
            None => skipped += 1,
        }
    }

    Ok(ScanResult {
        root: root.to_path_buf(),
        sources,
        skipped,
    })
}
