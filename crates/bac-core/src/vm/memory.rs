//! VM Memory Model
//!
//! Lexical scopes as a stack of owned frames, root at index 0. A frame's
//! parent is the frame beneath it.

use std::collections::HashMap;

use crate::error::{BacError, BacResult};
use super::value::Variable;

/// Bindings of a single scope
pub type Frame = HashMap<String, Variable>;

/// Chain of nested scopes
#[derive(Debug)]
pub struct ScopeChain {
    frames: Vec<Frame>,
    max_depth: Option<usize>,
}

impl ScopeChain {
    /// New chain holding only the root scope
    pub fn new(max_depth: Option<usize>) -> Self {
        ScopeChain {
            frames: vec![Frame::new()],
            max_depth,
        }
    }

    /// Open a child of the current scope
    pub fn push(&mut self) -> BacResult<()> {
        if let Some(max) = self.max_depth {
            if self.frames.len() >= max {
                return Err(BacError::ScopeOverflow(max));
            }
        }
        self.frames.push(Frame::new());
        Ok(())
    }

    /// Destroy the current scope.
    ///
    /// Each binding of the destroyed scope overwrites the nearest remaining
    /// frame that already defines the same name; bindings with no such
    /// frame are dropped.
    pub fn pop(&mut self) -> BacResult<()> {
        if self.frames.len() <= 1 {
            return Err(BacError::ScopeMin);
        }
        let popped = self.frames.pop().ok_or(BacError::ScopeMin)?;
        for (name, value) in popped {
            if let Some(frame) = self.resolve_mut(&name) {
                frame.insert(name, value);
            }
        }
        Ok(())
    }

    /// Look a name up from the current scope outwards
    pub fn get(&self, name: &str) -> BacResult<&Variable> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(name))
            .ok_or_else(|| BacError::VariableNotFound(name.to_string()))
    }

    /// Bind a name in the current scope only
    pub fn put(&mut self, name: String, value: Variable) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name, value);
        }
    }

    /// Remove the nearest binding of `name`; returns whether one existed
    pub fn delete(&mut self, name: &str) -> bool {
        match self.resolve_mut(name) {
            Some(frame) => frame.remove(name).is_some(),
            None => false,
        }
    }

    /// Number of live scopes, root included
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Frames from root to current
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Drop every scope but a fresh root
    pub fn reset(&mut self) {
        self.frames.clear();
        self.frames.push(Frame::new());
    }

    fn resolve_mut(&mut self, name: &str) -> Option<&mut Frame> {
        self.frames
            .iter_mut()
            .rev()
            .find(|frame| frame.contains_key(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> Variable {
        Variable::Number(n)
    }

    #[test]
    fn root_cannot_be_popped() {
        let mut scopes = ScopeChain::new(None);
        assert!(matches!(scopes.pop(), Err(BacError::ScopeMin)));
        scopes.push().unwrap();
        scopes.pop().unwrap();
        assert!(matches!(scopes.pop(), Err(BacError::ScopeMin)));
        assert_eq!(scopes.depth(), 1);
    }

    #[test]
    fn lookup_walks_outwards() {
        let mut scopes = ScopeChain::new(None);
        scopes.put("x".into(), num(1.0));
        scopes.push().unwrap();
        assert_eq!(scopes.get("x").unwrap(), &num(1.0));
        scopes.put("x".into(), num(2.0));
        assert_eq!(scopes.get("x").unwrap(), &num(2.0));
        assert!(matches!(scopes.get("y"), Err(BacError::VariableNotFound(_))));
    }

    #[test]
    fn teardown_writes_back_into_shadowed_binding() {
        let mut scopes = ScopeChain::new(None);
        scopes.put("x".into(), num(1.0));
        scopes.push().unwrap();
        scopes.put("x".into(), num(2.0));
        scopes.put("local".into(), num(3.0));
        scopes.pop().unwrap();
        assert_eq!(scopes.get("x").unwrap(), &num(2.0));
        assert!(scopes.get("local").is_err());
    }

    #[test]
    fn teardown_writes_into_nearest_ancestor_only() {
        let mut scopes = ScopeChain::new(None);
        scopes.put("x".into(), num(1.0));
        scopes.push().unwrap();
        scopes.put("x".into(), num(2.0));
        scopes.push().unwrap();
        scopes.put("x".into(), num(3.0));
        scopes.pop().unwrap();
        assert_eq!(scopes.frames()[1].get("x"), Some(&num(3.0)));
        assert_eq!(scopes.frames()[0].get("x"), Some(&num(1.0)));
    }

    #[test]
    fn delete_removes_nearest_binding() {
        let mut scopes = ScopeChain::new(None);
        scopes.put("x".into(), num(1.0));
        scopes.push().unwrap();
        scopes.put("x".into(), num(2.0));
        assert!(scopes.delete("x"));
        assert_eq!(scopes.get("x").unwrap(), &num(1.0));
        assert!(scopes.delete("x"));
        assert!(!scopes.delete("x"));
    }

    #[test]
    fn uncapped_chain_nests_freely() {
        let mut scopes = ScopeChain::new(None);
        for _ in 0..1000 {
            scopes.push().unwrap();
        }
        assert_eq!(scopes.depth(), 1001);
    }

    #[test]
    fn scope_overflow_trapped() {
        let mut scopes = ScopeChain::new(Some(2));
        scopes.push().unwrap();
        assert!(matches!(scopes.push(), Err(BacError::ScopeOverflow(2))));
    }
}
