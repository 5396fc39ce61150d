//! BacVM Error Types
//!
//! Defines every error condition a run can raise. All of them are fatal:
//! the dispatch loop stops at the first one and hands it to the host.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BacError {
    // Buffer errors
    #[error("attempted to access buffer, but buffer is empty")]
    BufferEmpty,
    #[error("buffer overflow: limit of {0} values reached")]
    BufferOverflow(usize),

    // Feeding errors
    #[error("unexpected feed quantity (too much or too little)")]
    FeedQuantity,
    #[error("invalid feed size")]
    FeedSize,
    #[error("unknown feed type: {0:?}")]
    FeedType(String),

    // Dispatch errors
    #[error("unknown native function reference: {0:?}")]
    FunctionReference(String),
    #[error("unexpected operation argument: {0}")]
    OperationArgument(String),
    #[error("unknown operation: {0:?}")]
    OperationUnknown(String),

    // Scope errors
    #[error("cannot finalize scope; already at lowest level")]
    ScopeMin,
    #[error("scope overflow: limit of {0} nested scopes reached")]
    ScopeOverflow(usize),

    // Reading errors
    #[error("there is no active reading session")]
    ReadingClosed,

    // Variable errors
    #[error("variable referenced does not exist: {0:?}")]
    VariableNotFound(String),
    #[error("variable type error: {0}")]
    VariableType(String),

    // Loader errors
    #[error("version incompatibility: VM running {vm} bytecode running {bytecode}")]
    VersionMismatch { vm: String, bytecode: String },
    #[error("bytecode is missing its version header")]
    MissingVersion,

    // IO boundary
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl BacError {
    /// Build an operation-argument error for `operation` given `argument`.
    pub fn argument(operation: &str, argument: &str) -> Self {
        BacError::OperationArgument(format!("{} {:?}", operation, argument))
    }
}

pub type BacResult<T> = Result<T, BacError>;
