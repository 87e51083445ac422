//! Mapping file validation
//!
//! Merges ignore lines they do not understand. When a mapping does not do what
//! its author expects, [`validate_mapping`] lists those lines instead.

use crate::command::Command;
use crate::preprocess::numbered_lines;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A line that matches no command grammar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedLine {
    /// 1-based line number in the mapping file
    pub line: usize,
    /// The line after trimming and comment removal
    pub text: String,
}

/// Outcome of validating a mapping file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Lines left after comment and whitespace stripping
    pub total_lines: usize,
    /// Recognized commands by kind
    pub commands: BTreeMap<String, usize>,
    /// Lines that would be ignored during a merge
    pub unmatched: Vec<UnmatchedLine>,
}

impl ValidationReport {
    /// True when every line is a known command
    pub fn is_clean(&self) -> bool {
        self.unmatched.is_empty()
    }
}

/// Classify every line of a mapping file
pub fn validate_mapping(text: &str) -> ValidationReport {
    let mut report = ValidationReport::default();

    for line in numbered_lines(text) {
        report.total_lines += 1;

        let commands = Command::parse_all(&line.text);
        if commands.is_empty() {
            report.unmatched.push(UnmatchedLine {
                line: line.number,
                text: line.text,
            });
            continue;
        }
        for command in &commands {
            *report.commands.entry(command.kind().to_string()).or_default() += 1;
        }
    }

    report
}
