//! Buffer
//!
//! Native results and loaded variables land here as rendered text until a
//! later `pb` or `bd` consumes them.

use crate::error::{BacError, BacResult};

/// Rendered values, most recent last
#[derive(Debug)]
pub struct BufferStack {
    values: Vec<String>,
    limit: Option<usize>,
}

impl BufferStack {
    /// Empty buffer; `limit` caps it only when the host asked for one
    pub fn new(limit: Option<usize>) -> Self {
        BufferStack {
            values: Vec::new(),
            limit,
        }
    }

    /// Buffer a rendered value
    pub fn push(&mut self, value: String) -> BacResult<()> {
        if let Some(limit) = self.limit {
            if self.values.len() >= limit {
                return Err(BacError::BufferOverflow(limit));
            }
        }
        self.values.push(value);
        Ok(())
    }

    /// Take the most recently buffered value
    pub fn pop(&mut self) -> BacResult<String> {
        self.values.pop().ok_or(BacError::BufferEmpty)
    }

    /// Values from bottom to top
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Number of values waiting to be consumed
    pub fn size(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Drop everything left over from a previous run
    pub fn clear(&mut self) {
        self.values.clear();
    }
}
