//! Reading Stack
//!
//! Nested boolean gates deciding whether instructions execute. With no
//! frame pushed the stack reads as an implicit, always-true root.

use crate::error::{BacError, BacResult};

#[derive(Debug, Default)]
pub struct ReadingStack {
    frames: Vec<bool>,
}

impl ReadingStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gate of the innermost frame
    pub fn current(&self) -> bool {
        self.frames.last().copied().unwrap_or(true)
    }

    /// Open a new frame gated by `value`
    pub fn push(&mut self, value: bool) {
        self.frames.push(value);
    }

    /// Flip the innermost frame, unless the frame enclosing it is already
    /// suppressed.
    pub fn invert(&mut self) -> BacResult<()> {
        let depth = self.frames.len();
        if depth == 0 {
            return Err(BacError::ReadingClosed);
        }
        let enclosing = if depth >= 2 { self.frames[depth - 2] } else { true };
        if enclosing {
            self.frames[depth - 1] = !self.frames[depth - 1];
        }
        Ok(())
    }

    /// Close the innermost frame
    pub fn close(&mut self) -> BacResult<bool> {
        self.frames.pop().ok_or(BacError::ReadingClosed)
    }

    /// Frames from outermost to innermost
    pub fn frames(&self) -> &[bool] {
        &self.frames
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}
