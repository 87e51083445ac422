//! Error types for xm-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in xm-core
///
/// Every variant is terminal for a merge run. [`Error::exit_code`] maps each one
/// onto the process exit code reported by the CLI.
#[derive(Debug, Error)]
pub enum Error {
    /// The mapping file could not be read
    #[error("error opening config file '{path}': {source}")]
    ConfigOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source workbook could not be opened
    #[error("error opening '{path}': {message}")]
    SourceOpen { path: PathBuf, message: String },

    /// The destination workbook could not be written
    #[error("error saving output file '{path}': {message}")]
    DestinationSave { path: PathBuf, message: String },

    /// A `Sheet<N>-` selector points past the end of the workbook
    #[error("sheet {selector} does not exist in this spreadsheet ({available} sheet(s) available)")]
    SheetOutOfRange { selector: u32, available: usize },

    /// CSV parsing error from the csv crate
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Failed to read a file other than the mapping file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal error
    #[error("failed to scan input directory: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ConfigOpen { .. } => 1,
            Error::DestinationSave { .. } => 2,
            Error::SourceOpen { .. } | Error::Csv { .. } => 3,
            Error::SheetOutOfRange { .. } => 4,
            Error::FileRead { .. } | Error::WalkDir(_) | Error::Io(_) | Error::Json(_) => 5,
        }
    }
}
