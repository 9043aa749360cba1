//! Nests and the windows nested in them.
//!
//! A nest is a window whose native surface hosts other windows. Nested
//! windows register with their nest when they are created and deregister
//! when they are destroyed. Both sides only hold [`WindowId`]s, so either
//! may go away first.

use super::window::WindowId;

/// Registry of the windows rendering into a nest's surface.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Nest {
    nested: Vec<WindowId>,
}

impl Nest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a nested window. Registering twice is a no-op.
    pub fn add(&mut self, window: WindowId) {
        if !self.nested.contains(&window) {
            self.nested.push(window);
        }
    }

    /// Deregister a nested window. Unknown windows are ignored.
    pub fn remove(&mut self, window: WindowId) {
        self.nested.retain(|w| *w != window);
    }

    pub fn nested_window_count(&self) -> usize {
        self.nested.len()
    }

    pub fn nested_window(&self, index: usize) -> Option<WindowId> {
        self.nested.get(index).copied()
    }

    pub fn contains(&self, window: WindowId) -> bool {
        self.nested.contains(&window)
    }

    pub fn iter(&self) -> impl Iterator<Item = WindowId> + '_ {
        self.nested.iter().copied()
    }
}

/// Nesting details of a window that renders inside a nest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NestedWindow {
    window: WindowId,
    nest: WindowId,
}

impl NestedWindow {
    pub(crate) fn new(window: WindowId, nest: WindowId) -> Self {
        Self { window, nest }
    }

    /// The nested window itself.
    pub fn as_window(&self) -> WindowId {
        self.window
    }

    /// The window hosting this one.
    pub fn nested_root(&self) -> WindowId {
        self.nest
    }
}
