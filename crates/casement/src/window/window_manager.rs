//! Registry of live windows.
//!
//! The [`WindowManager`] trait is the narrow interface the window core uses
//! to track which windows exist, in which order, and where they sit on the
//! desktop. [`DesktopWindowManager`] is the in-memory implementation.

use std::collections::HashMap;

use casement_core::logging::targets;
use casement_core::{Point, Rect, Signal, Size};

use super::window::WindowId;

/// Desktop used by [`DesktopWindowManager::new`].
pub const DEFAULT_DESKTOP: Rect = Rect::new(0.0, 0.0, 1920.0, 1080.0);

/// Registry of live windows, ordered by insertion.
///
/// Every window is added once when it is created and removed once when it
/// closes or is destroyed.
pub trait WindowManager: Send {
    fn add_window(&mut self, window: WindowId, rect: Rect);

    fn remove_window(&mut self, window: WindowId);

    fn has_window(&self, window: WindowId) -> bool;

    fn window_count(&self) -> usize;

    /// Window at `index` in insertion order.
    fn window(&self, index: usize) -> Option<WindowId>;

    fn move_window(&mut self, window: WindowId, position: Point);

    fn resize_window(&mut self, window: WindowId, size: Size);

    /// Desktop rectangle of `window`, or an empty rectangle if unknown.
    fn window_rect(&self, window: WindowId) -> Rect;

    /// Rectangle of the desktop `window` lives on.
    fn desktop_rect(&self, window: WindowId) -> Rect;

    /// Pointer position relative to `window`.
    fn mouse_position(&self, window: WindowId) -> Point;

    /// Move the pointer, in desktop coordinates.
    fn set_mouse_position(&mut self, position: Point);
}

/// In-memory registry for a single desktop.
///
/// # Signals
///
/// - `window_added(WindowId)`: emitted after a window was registered
/// - `window_removed(WindowId)`: emitted after a window was deregistered
pub struct DesktopWindowManager {
    order: Vec<WindowId>,
    rects: HashMap<WindowId, Rect>,
    desktop: Rect,
    mouse: Point,
    /// Signal emitted after a window was registered.
    pub window_added: Signal<WindowId>,
    /// Signal emitted after a window was deregistered.
    pub window_removed: Signal<WindowId>,
}

impl Default for DesktopWindowManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DesktopWindowManager {
    /// Create a registry for the default desktop.
    pub fn new() -> Self {
        Self::with_desktop(DEFAULT_DESKTOP)
    }

    /// Create a registry for a desktop of the given geometry.
    pub fn with_desktop(desktop: Rect) -> Self {
        Self {
            order: Vec::new(),
            rects: HashMap::new(),
            desktop,
            mouse: Point::ZERO,
            window_added: Signal::new(),
            window_removed: Signal::new(),
        }
    }

    /// Registered windows in insertion order.
    pub fn windows(&self) -> &[WindowId] {
        &self.order
    }
}

impl WindowManager for DesktopWindowManager {
    fn add_window(&mut self, window: WindowId, rect: Rect) {
        if self.rects.contains_key(&window) {
            tracing::warn!(target: targets::REGISTRY, ?window, "window registered twice");
            return;
        }
        self.order.push(window);
        self.rects.insert(window, rect);
        tracing::debug!(target: targets::REGISTRY, ?window, count = self.order.len(), "window added");
        self.window_added.emit(window);
    }

    fn remove_window(&mut self, window: WindowId) {
        if self.rects.remove(&window).is_none() {
            return;
        }
        self.order.retain(|w| *w != window);
        tracing::debug!(target: targets::REGISTRY, ?window, count = self.order.len(), "window removed");
        self.window_removed.emit(window);
    }

    fn has_window(&self, window: WindowId) -> bool {
        self.rects.contains_key(&window)
    }

    fn window_count(&self) -> usize {
        self.order.len()
    }

    fn window(&self, index: usize) -> Option<WindowId> {
        self.order.get(index).copied()
    }

    fn move_window(&mut self, window: WindowId, position: Point) {
        if let Some(rect) = self.rects.get_mut(&window) {
            rect.origin = position;
        }
    }

    fn resize_window(&mut self, window: WindowId, size: Size) {
        if let Some(rect) = self.rects.get_mut(&window) {
            rect.size = size;
        }
    }

    fn window_rect(&self, window: WindowId) -> Rect {
        self.rects.get(&window).copied().unwrap_or_default()
    }

    fn desktop_rect(&self, _window: WindowId) -> Rect {
        self.desktop
    }

    fn mouse_position(&self, window: WindowId) -> Point {
        self.mouse - self.window_rect(window).top_left()
    }

    fn set_mouse_position(&mut self, position: Point) {
        self.mouse = position;
    }
}
