//! Scope stack for variable bindings
//!
//! Frames live in a `Vec<HashMap>`: index 0 is the outermost frame (built-ins),
//! the last element is the innermost. Lookup and assignment both search from
//! the innermost frame outwards.

use super::Value;
use super::error::{InterpResult, RuntimeError};
use std::collections::HashMap;

/// One level of variable bindings
pub type Frame = HashMap<String, Value>;

/// Stack-based scope management for the interpreter
#[derive(Debug)]
pub struct ScopeStack {
    /// Stack of frames, index 0 is the outermost
    frames: Vec<Frame>,
}

impl ScopeStack {
    /// Create a new scope stack with a single outermost frame
    pub fn new() -> Self {
        ScopeStack {
            frames: vec![HashMap::new()],
        }
    }

    /// Push an empty frame at the innermost end.
    /// Returns the new frame's index
    pub fn push_frame(&mut self) -> usize {
        self.frames.push(HashMap::new());
        let depth = self.frames.len() - 1;
        tracing::trace!(depth, "push frame");
        depth
    }

    /// Remove the innermost frame
    /// Panics if trying to pop the outermost frame
    pub fn pop_frame(&mut self) {
        if self.frames.len() <= 1 {
            panic!("Cannot pop outermost frame");
        }
        self.frames.pop();
        tracing::trace!(depth = self.frames.len() - 1, "pop frame");
    }

    /// Number of frames on the stack
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Bind a name in the innermost frame, shadowing any outer binding
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.into(), value);
        }
    }

    /// Look up a variable, searching from the innermost frame to the outermost
    pub fn lookup(&self, name: &str) -> InterpResult<Value> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(name))
            .cloned()
            .ok_or_else(|| RuntimeError::undefined_variable(name))
    }

    /// Assign to the nearest existing binding of `name`; if no frame binds it,
    /// create the binding in the innermost frame. Returns the assigned value.
    pub fn assign(&mut self, name: &str, value: Value) -> Value {
        // Search phase: nearest frame that already binds the name
        let target = self
            .frames
            .iter()
            .rposition(|frame| frame.contains_key(name))
            .unwrap_or(self.frames.len() - 1);

        // Mutate-or-create phase
        self.frames[target].insert(name.to_string(), value.clone());
        value
    }

    /// Check if a variable exists in any frame
    pub fn contains(&self, name: &str) -> bool {
        self.frames.iter().any(|frame| frame.contains_key(name))
    }

    /// Every frame except the outermost, outermost first
    pub fn user_frames(&self) -> &[Frame] {
        &self.frames[1..]
    }

    /// Drop every frame above the outermost and clear what is left
    pub fn reset(&mut self) {
        self.frames.truncate(1);
        self.frames[0].clear();
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}
