//! Bytecode Opcode Definitions
//!
//! Defines the two-letter mnemonic set of the textual bytecode.
//! This file contains no execution semantics.
//! Mnemonics are a stable contract with every bytecode file in the wild.

/// Bytecode operations (v1.0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    // Buffer
    BufferDiscard,
    PopRefeed,
    LoadVariable,

    // Feeding
    FeedBegin,
    FeedToken,
    FeedFinalize,

    // Scope
    ScopeInit,
    ScopeFinalize,
    DeleteVariable,

    // Reading
    ReadingInvert,
    ReadingClose,

    // Control flow
    Jump,
    Exit,
}

impl OpCode {
    /// Every operation, in table order
    pub const ALL: [OpCode; 13] = [
        OpCode::BufferDiscard,
        OpCode::PopRefeed,
        OpCode::LoadVariable,
        OpCode::FeedBegin,
        OpCode::FeedToken,
        OpCode::FeedFinalize,
        OpCode::ScopeInit,
        OpCode::ScopeFinalize,
        OpCode::DeleteVariable,
        OpCode::ReadingInvert,
        OpCode::ReadingClose,
        OpCode::Jump,
        OpCode::Exit,
    ];

    /// Convert a raw mnemonic to an opcode
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        match mnemonic {
            "bd" => Some(OpCode::BufferDiscard),
            "pb" => Some(OpCode::PopRefeed),
            "vl" => Some(OpCode::LoadVariable),

            "fi" => Some(OpCode::FeedBegin),
            "pu" => Some(OpCode::FeedToken),
            "ff" => Some(OpCode::FeedFinalize),

            "si" => Some(OpCode::ScopeInit),
            "sf" => Some(OpCode::ScopeFinalize),
            "gc" => Some(OpCode::DeleteVariable),

            "ri" => Some(OpCode::ReadingInvert),
            "rc" => Some(OpCode::ReadingClose),

            "gt" => Some(OpCode::Jump),
            "ex" => Some(OpCode::Exit),

            _ => None,
        }
    }

    /// The mnemonic as it appears in bytecode text
    pub fn mnemonic(self) -> &'static str {
        match self {
            OpCode::BufferDiscard => "bd",
            OpCode::PopRefeed => "pb",
            OpCode::LoadVariable => "vl",
            OpCode::FeedBegin => "fi",
            OpCode::FeedToken => "pu",
            OpCode::FeedFinalize => "ff",
            OpCode::ScopeInit => "si",
            OpCode::ScopeFinalize => "sf",
            OpCode::DeleteVariable => "gc",
            OpCode::ReadingInvert => "ri",
            OpCode::ReadingClose => "rc",
            OpCode::Jump => "gt",
            OpCode::Exit => "ex",
        }
    }

    /// Reading-control operations run even inside a suppressed branch
    pub fn is_reading_control(self) -> bool {
        matches!(self, OpCode::ReadingInvert | OpCode::ReadingClose)
    }
}
