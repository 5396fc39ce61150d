//! BacVM Configuration
//!
//! Optional runtime limits for the virtual machine. By default nothing is
//! capped: buffer pushes and scope pushes always succeed. A host that wants
//! a bound opts in; enforcement is handled by the structures that own the
//! state.

/// VM Configuration
#[derive(Debug, Clone, Default)]
pub struct VmConfig {
    /// Maximum number of values held by the buffer stack, if capped
    pub max_buffer_size: Option<usize>,

    /// Maximum number of nested scopes, root included, if capped
    pub max_scope_depth: Option<usize>,
}

impl VmConfig {
    /// Create a new configuration with no limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the buffer at `max` values
    pub fn with_max_buffer_size(mut self, max: usize) -> Self {
        self.max_buffer_size = Some(max);
        self
    }

    /// Cap scope nesting at `max` scopes
    pub fn with_max_scope_depth(mut self, max: usize) -> Self {
        self.max_scope_depth = Some(max);
        self
    }
}
