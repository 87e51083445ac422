//! Mapping-language commands
//!
//! Every cleaned mapping line is matched against the command grammars:
//!
//! ```text
//! Set:[Sheet<N>-]<COL><ROW>:<text>
//! Copy:[Sheet<N>-]<COL><ROW>:[Sheet<N>-]<COL><ROW>
//! BlockIf:[~][Sheet<N>-]<COL><ROW>
//! EndBlockIf
//! NewRow
//! ```
//!
//! Matching is permissive. `Set` must span the whole line, while `Copy`,
//! `BlockIf` and `EndBlockIf` only need to match at the start of it, so
//! trailing text after them is ignored. A line that matches nothing is not an
//! error.

use crate::address::Address;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

static SET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Set:(Sheet[0-9]+-)*([A-Z]+)([0-9]+):(.*)$").expect("valid Set pattern")
});

static COPY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Copy:(Sheet[0-9]+-)*([A-Z]+)([0-9]+):(Sheet[0-9]+-)*([A-Z]+)([0-9]+)")
        .expect("valid Copy pattern")
});

static BLOCK_IF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^BlockIf:(~*)(Sheet[0-9]+-)*([A-Z]+)([0-9]+)").expect("valid BlockIf pattern")
});

const END_BLOCK_IF: &str = "EndBlockIf";
const NEW_ROW: &str = "NewRow";

/// Write a literal into a destination cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetCommand {
    /// Destination address
    pub target: Address,
    /// Text written verbatim
    pub literal: String,
}

/// Copy a source cell value into a destination cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyCommand {
    /// Address in the source workbook
    pub source: Address,
    /// Address in the destination workbook
    pub target: Address,
}

/// The guard of a conditional block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Keep the block when the cell is zero or empty instead of non-zero
    pub negated: bool,
    /// Cell in the source workbook
    pub address: Address,
}

/// A parsed mapping-language command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// `Set:<addr>:<text>`
    Set(SetCommand),
    /// `Copy:<addr>:<addr>`
    Copy(CopyCommand),
    /// `NewRow`
    NewRow,
    BlockIf(Condition),
    EndBlockIf,
}

impl Command {
    /// Every command a line matches, in dispatch order
    ///
    /// `Set` and `Copy` are checked independently, so a line that satisfies
    /// both grammars yields both commands. An empty result means the line is
    /// not a command.
    pub fn parse_all(line: &str) -> Vec<Command> {
        let mut commands = Vec::new();

        if is_new_row(line) {
            commands.push(Command::NewRow);
        }
        if let Some(condition) = Condition::parse(line) {
            commands.push(Command::BlockIf(condition));
        }
        if is_end_block_if(line) {
            commands.push(Command::EndBlockIf);
        }
        if let Some(set) = SetCommand::parse(line) {
            commands.push(Command::Set(set));
        }
        if let Some(copy) = CopyCommand::parse(line) {
            commands.push(Command::Copy(copy));
        }

        commands
    }

    /// Short name of the command kind
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Set(_) => "Set",
            Command::Copy(_) => "Copy",
            Command::NewRow => "NewRow",
            Command::BlockIf(_) => "BlockIf",
            Command::EndBlockIf => "EndBlockIf",
        }
    }
}

impl SetCommand {
    /// Parse a `Set:` line
    pub fn parse(line: &str) -> Option<Self> {
        let caps = SET_RE.captures(line)?;
        Some(Self {
            target: address_at(&caps, 1),
            literal: caps[4].to_string(),
        })
    }
}

impl CopyCommand {
    /// Parse a `Copy:` line
    pub fn parse(line: &str) -> Option<Self> {
        let caps = COPY_RE.captures(line)?;
        Some(Self {
            source: address_at(&caps, 1),
            target: address_at(&caps, 4),
        })
    }
}

impl Condition {
    /// Parse a `BlockIf:` line
    ///
    /// The guard is negated only by a single `~`; a longer run of tildes still
    /// matches the grammar but reads as not negated.
    pub fn parse(line: &str) -> Option<Self> {
        let caps = BLOCK_IF_RE.captures(line)?;
        Some(Self {
            negated: &caps[1] == "~",
            address: address_at(&caps, 2),
        })
    }
}

/// Whether a line is the bare `NewRow` command
pub fn is_new_row(line: &str) -> bool {
    line == NEW_ROW
}

/// Whether a line closes a conditional block
pub fn is_end_block_if(line: &str) -> bool {
    line.starts_with(END_BLOCK_IF)
}

/// Build an address from three consecutive groups: sheet, column, row
fn address_at(caps: &Captures<'_>, first: usize) -> Address {
    Address::from_parts(
        caps.get(first).map(|m| m.as_str()),
        &caps[first + 1],
        &caps[first + 2],
    )
}
