//! Merge job files
//!
//! A job file is a small JSON document naming the three paths a merge needs.
//! It lets a recurring merge be run without retyping them.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default directory holding the source workbooks
pub const DEFAULT_INPUT_DIR: &str = "submissions";
/// Default destination workbook
pub const DEFAULT_OUTPUT_FILE: &str = "output.xlsx";
/// Default mapping file
pub const DEFAULT_MAP_FILE: &str = "mapping.cfg";

/// The paths of one merge run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeJob {
    /// Directory scanned for source workbooks
    pub input_dir: PathBuf,
    /// Destination workbook written at the end of the run
    pub output_file: PathBuf,
    /// Mapping file
    pub map_file: PathBuf,
}

impl Default for MergeJob {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            map_file: PathBuf::from(DEFAULT_MAP_FILE),
        }
    }
}

impl MergeJob {
    /// Load a job file from JSON; missing fields take their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::FileRead {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save the job file to JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
