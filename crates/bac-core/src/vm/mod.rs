pub mod feed;
pub mod memory;
pub mod reading;
pub mod stack;
pub mod value;
pub mod vm;

pub use vm::{ExecutionState, StateDump, VirtualMachine};
pub use value::{Comparison, Variable, VariableKind};
