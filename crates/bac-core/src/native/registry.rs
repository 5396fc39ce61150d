//! Native Function Registry
//!
//! Maps names to host-provided native functions. The registry is filled by
//! the host before a run and only read by the VM while it runs.

use std::collections::HashMap;
use std::fmt;

use crate::error::{BacError, BacResult};
use crate::vm::value::Variable;
use crate::vm::vm::ExecutionState;

/// Native function signature: VM state handle and ordered arguments in,
/// one value out.
pub type NativeFn = fn(&mut ExecutionState, &[Variable]) -> Variable;

/// Registry of callable natives
#[derive(Default, Clone)]
pub struct NativeRegistry {
    functions: HashMap<String, NativeFn>,
}

impl NativeRegistry {
    /// New registry knows no natives
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a native under `name`
    pub fn register(&mut self, name: impl Into<String>, function: NativeFn) {
        self.functions.insert(name.into(), function);
    }

    /// Builder form of [`NativeRegistry::register`]
    pub fn with(mut self, name: impl Into<String>, function: NativeFn) -> Self {
        self.register(name, function);
        self
    }

    /// Resolve a native, failing on unknown names
    pub fn get(&self, name: &str) -> BacResult<NativeFn> {
        self.functions
            .get(name)
            .copied()
            .ok_or_else(|| BacError::FunctionReference(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl fmt::Debug for NativeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeRegistry")
            .field("functions", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(_: &mut ExecutionState, _: &[Variable]) -> Variable {
        Variable::Number(42.0)
    }

    #[test]
    fn registry_resolves_registered_names() {
        let registry = NativeRegistry::new().with("answer", answer);
        assert!(registry.contains("answer"));
        assert_eq!(registry.names(), vec!["answer"]);
        assert!(registry.get("answer").is_ok());
        assert!(matches!(
            registry.get("question"),
            Err(BacError::FunctionReference(name)) if name == "question"
        ));
    }
}
