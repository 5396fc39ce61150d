//! Bytecode Instruction Representation
//!
//! Defines the instruction format of the textual bytecode.
//! This layer contains no execution semantics; the mnemonic is kept raw so
//! that an unknown operation is reported when it is reached, not when loaded.

use std::fmt;

/// Single bytecode instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub operation: String,
    pub argument: Option<String>,
}

impl Instruction {
    /// Create an instruction with no argument
    pub fn new(operation: impl Into<String>) -> Self {
        Instruction {
            operation: operation.into(),
            argument: None,
        }
    }

    /// Create an instruction with a single argument
    pub fn with_argument(operation: impl Into<String>, argument: impl Into<String>) -> Self {
        Instruction {
            operation: operation.into(),
            argument: Some(argument.into()),
        }
    }

    /// Argument text, empty when absent
    pub fn argument(&self) -> &str {
        self.argument.as_deref().unwrap_or("")
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.argument {
            Some(arg) => write!(f, "{} {}", self.operation, arg),
            None => write!(f, "{}", self.operation),
        }
    }
}
