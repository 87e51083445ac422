//! Run reports
//!
//! A report records what a merge run did: which sources were read, how much of
//! the mapping survived for each, and where the cursor ended up.

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Counters for one source document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStats {
    /// Mapping lines before the conditional pass
    pub lines_total: usize,
    /// Mapping lines left for this source
    pub lines_kept: usize,
    /// Destination cells written
    pub cells_written: usize,
    /// `NewRow` commands executed
    pub rows_advanced: usize,
}

/// Report entry for one source document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceReport {
    /// Path of the source
    pub path: PathBuf,
    #[serde(flatten)]
    pub stats: SourceStats,
}

/// A record of a completed merge run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeReport {
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the destination was saved
    pub finished_at: Option<DateTime<Utc>>,
    /// Mapping file used
    pub map_file: PathBuf,
    /// Destination workbook
    pub output_file: PathBuf,
    /// Sources in processing order
    pub sources: Vec<SourceReport>,
    /// Cursor value at the end of the run
    pub final_row: u32,
}

impl MergeReport {
    /// Start a report for a run
    pub fn begin(map_file: PathBuf, output_file: PathBuf) -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            map_file,
            output_file,
            sources: Vec::new(),
            final_row: 1,
        }
    }

    /// Record a processed source
    pub fn add_source(&mut self, path: PathBuf, stats: SourceStats) {
        self.sources.push(SourceReport { path, stats });
    }

    /// Mark the run as finished
    pub fn finish(&mut self, final_row: u32) {
        self.final_row = final_row;
        self.finished_at = Some(Utc::now());
    }

    /// Total destination cells written
    pub fn total_cells_written(&self) -> usize {
        self.sources.iter().map(|s| s.stats.cells_written).sum()
    }

    /// Save the report as JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
