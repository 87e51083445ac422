//! xm-core: Core library for merging spreadsheet submissions
//!
//! This library provides functionality to:
//! - Parse the line-based mapping language (`Set`, `Copy`, `NewRow`,
//!   `BlockIf`/`EndBlockIf`)
//! - Strip comments once and prune conditional blocks per source document
//! - Resolve `Sheet<N>-` selectors and the current-row alias
//! - Run a mapping over a directory of source workbooks into one destination
//! - Validate mapping files and report on merge runs

pub mod address;
pub mod command;
pub mod condition;
pub mod cursor;
pub mod dispatch;
pub mod error;
pub mod executor;
pub mod job;
pub mod parser;
pub mod preprocess;
pub mod report;
pub mod scanner;
pub mod validate;
pub mod value;
pub mod workbook;
pub mod xlsx;

pub use address::{Address, CellRef, RowToken};
pub use command::{Command, Condition, CopyCommand, SetCommand};
pub use cursor::RowCursor;
pub use dispatch::CommandDispatcher;
pub use error::{Error, Result};
pub use executor::{run_merge, MergeExecutor};
pub use job::MergeJob;
pub use parser::parse_csv;
pub use preprocess::{prune_for_source, strip_comments};
pub use report::{MergeReport, SourceStats};
pub use scanner::{scan_sources, ScanResult, SourceFile, SourceKind};
pub use validate::{validate_mapping, ValidationReport};
pub use value::CellValue;
pub use workbook::{MemoryWorkbook, Workbook};
pub use xlsx::XlsxWorkbook;
