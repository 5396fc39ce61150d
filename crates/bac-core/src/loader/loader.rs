//! Bytecode Loader
//!
//! Loads textual BacVM bytecode and performs the version handshake.
//! This layer performs structural work only; mnemonics are checked when
//! the VM reaches them.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::bytecode::Instruction;
use crate::error::{BacError, BacResult};

/// Supported bytecode major version
pub const VERSION_MAJOR: u32 = 1;

/// VM minor version
pub const VERSION_MINOR: u32 = 0;

/// Start of a trailing comment
const COMMENT: char = ';';

/// Version string of this VM, `MAJOR.MINOR`
pub fn version() -> String {
    format!("{}.{}", VERSION_MAJOR, VERSION_MINOR)
}

/// Offer the VM a bytecode version; true if it can run it
pub fn offer(version: &str) -> bool {
    let Some((major, minor)) = version.trim().split_once('.') else {
        return false;
    };
    match (major.parse::<u32>(), minor.parse::<u32>()) {
        (Ok(major), Ok(_)) => major == VERSION_MAJOR,
        _ => false,
    }
}

/// Bytecode loader
pub struct BytecodeLoader;

impl BytecodeLoader {
    /// Load bytecode text: a version line followed by one instruction per line
    pub fn load_str(source: &str) -> BacResult<Vec<Instruction>> {
        let mut lines = source.lines();
        let header = lines.next().ok_or(BacError::MissingVersion)?;
        if !offer(header) {
            return Err(BacError::VersionMismatch {
                vm: version(),
                bytecode: header.to_string(),
            });
        }

        let instructions: Vec<Instruction> = lines.filter_map(Self::parse_line).collect();
        debug!(header = header.trim(), instructions = instructions.len(), "bytecode loaded");
        Ok(instructions)
    }

    /// Read and load a bytecode file
    pub fn load_file(path: impl AsRef<Path>) -> BacResult<Vec<Instruction>> {
        let source = fs::read_to_string(path)?;
        Self::load_str(&source)
    }

    /// Parse a single line; comment-only and blank lines yield nothing
    pub fn parse_line(line: &str) -> Option<Instruction> {
        let line = match line.find(COMMENT) {
            Some(at) => line[..at].trim_end(),
            None => line.trim_end_matches('\r'),
        };
        if line.trim().is_empty() {
            return None;
        }
        Some(match line.split_once(' ') {
            Some((operation, argument)) => Instruction::with_argument(operation, argument),
            None => Instruction::new(line),
        })
    }
}
