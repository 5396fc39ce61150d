//! BacVM - Core Library
//!
//! Public API surface for the BacVM execution engine.

pub mod error;
pub mod config;
pub mod bytecode;
pub mod vm;
pub mod loader;
pub mod native;

// Re-export commonly used types
pub use error::{BacError, BacResult};
pub use config::VmConfig;
pub use bytecode::{Instruction, OpCode};
pub use vm::{ExecutionState, StateDump, Variable, VirtualMachine};
pub use loader::BytecodeLoader;
pub use native::{NativeFn, NativeRegistry};
