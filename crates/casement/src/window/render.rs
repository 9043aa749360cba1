//! Update scheduling and render propagation.
//!
//! Drawing itself belongs to the backend's graphics context; the window
//! core only decides what needs repainting and in which order windows are
//! handed to the context. Nests forward both to their nested windows.

use casement_core::logging::targets;
use casement_core::{Color, Point, Rect, Size};

use super::error::WindowResult;
use super::style::WindowStyle;
use super::system::WindowSystem;
use super::window::WindowId;

/// Offset of a nested window's drop shadow.
pub const DROP_SHADOW_OFFSET: f32 = 4.0;

/// Colour of a nested window's drop shadow.
pub const DROP_SHADOW_COLOR: Color = Color::from_rgba(0.0, 0.0, 0.0, 0.25);

/// Rendering priority of the active window.
pub const ACTIVE_RENDERING_PRIORITY: f64 = 1.0;

/// Rendering priority of every other window.
pub const INACTIVE_RENDERING_PRIORITY: f64 = 0.1;

/// Drawing surface windows are rendered onto.
pub trait GraphicsContext {
    fn set_origin(&mut self, origin: Point);

    fn set_extents(&mut self, extents: Size);

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color);

    /// Paint the window's own content.
    fn paint_window(&mut self, window: WindowId);
}

impl WindowSystem {
    /// Schedule a repaint of `rect` (window coordinates), or of the whole
    /// window when `rect` is `None`.
    ///
    /// A nest schedules a full repaint of every nested window its update
    /// region touches. Returns `false` when there is nothing to update.
    pub fn update(&mut self, id: WindowId, rect: Option<Rect>) -> WindowResult<bool> {
        let bounds = Rect::from_size(self.window_rect(id).size);
        let region = rect.unwrap_or(bounds);
        let window = self.window_mut(id)?;
        if region.is_empty() {
            return Ok(false);
        }
        window.update_region = Some(match window.update_region {
            Some(pending) => pending.union(&region),
            None => region,
        });

        if let Ok(owner) = self.surface_owner(id) {
            let offset = if owner == id {
                Point::ZERO
            } else {
                self.window_rect(id).top_left() - self.window_rect(owner).top_left()
            };
            if let Ok(surface) = self.native_surface_mut(owner) {
                surface.invalidate(region.translate(offset));
            }
        }

        let nested: Vec<WindowId> = match self.as_nest(id) {
            Ok(nest) => nest.iter().collect(),
            Err(_) => return Ok(true),
        };
        let origin = self.window_rect(id).top_left();
        let update_area = region.translate(origin);
        for child in nested {
            let touched = self
                .get(child)
                .is_some_and(|w| !w.is_closed() && self.window_rect(child).intersects(&update_area));
            if touched {
                self.update(child, None)?;
            }
        }
        Ok(true)
    }

    /// Take the pending update region, leaving none behind.
    pub fn take_update_region(&mut self, id: WindowId) -> WindowResult<Option<Rect>> {
        Ok(self.window_mut(id)?.update_region.take())
    }

    /// Render the window, then every window nested in it.
    ///
    /// Nested windows with [`WindowStyle::DROP_SHADOW`] get a rounded
    /// shadow behind their content.
    pub fn render<G: GraphicsContext + ?Sized>(&self, id: WindowId, gc: &mut G) -> WindowResult<()> {
        let window = self.window(id)?;
        let rect = self.window_rect(id);
        let origin = match self.surface_owner(id) {
            Ok(owner) if owner != id => rect.top_left() - self.window_rect(owner).top_left(),
            _ => Point::ZERO,
        };

        gc.set_extents(rect.size);
        gc.set_origin(origin);
        if window.style().has(WindowStyle::DROP_SHADOW) && window.is_nested() {
            let shadow = Rect::from_size(rect.size)
                .translate(Point::new(DROP_SHADOW_OFFSET, DROP_SHADOW_OFFSET));
            gc.fill_rounded_rect(shadow, DROP_SHADOW_OFFSET, DROP_SHADOW_COLOR);
            gc.set_extents(rect.size);
            gc.set_origin(origin);
        }
        gc.paint_window(id);

        if let Ok(nest) = self.as_nest(id) {
            for child in nest.iter() {
                if self.get(child).is_some_and(|w| !w.is_closed() && w.is_visible()) {
                    self.render(child, gc)?;
                }
            }
        }
        tracing::trace!(target: targets::WINDOW, window = ?id, "rendered");
        Ok(())
    }

    /// Run `f` with the window's surface rendering paused.
    ///
    /// Rendering resumes afterwards only if both the window and its surface
    /// survived `f`.
    pub fn with_rendering_paused<R>(
        &mut self,
        id: WindowId,
        f: impl FnOnce(&mut WindowSystem) -> R,
    ) -> R {
        let liveness = if self.window_manager().has_window(id) {
            match self.native_surface_mut(id) {
                Ok(surface) => {
                    let liveness = surface.liveness();
                    surface.pause_rendering();
                    Some(liveness)
                }
                Err(_) => None,
            }
        } else {
            None
        };

        let result = f(self);

        if let Some(liveness) = liveness {
            if self.contains(id) && liveness.is_alive() {
                if let Ok(surface) = self.native_surface_mut(id) {
                    surface.resume_rendering();
                }
            }
        }
        result
    }

    pub fn ready_to_render(&self, id: WindowId) -> bool {
        self.get(id).is_some_and(|w| w.ready_to_render())
    }

    /// Mark the window ready or not; becoming ready schedules a repaint.
    pub fn set_ready_to_render(&mut self, id: WindowId, ready: bool) -> WindowResult<()> {
        let window = self.window_mut(id)?;
        let was_ready = window.ready_to_render;
        window.ready_to_render = ready;
        if !was_ready && ready {
            self.update(id, None)?;
        }
        Ok(())
    }

    pub fn rendering_priority(&self, id: WindowId) -> f64 {
        if self.is_active(id) {
            ACTIVE_RENDERING_PRIORITY
        } else {
            INACTIVE_RENDERING_PRIORITY
        }
    }

    /// Frame rate of the surface the window renders into.
    pub fn fps(&self, id: WindowId) -> f64 {
        self.surface_owner(id)
            .and_then(|owner| self.native_window(owner))
            .map(|native| native.fps())
            .unwrap_or(0.0)
    }

    pub fn potential_fps(&self, id: WindowId) -> f64 {
        self.surface_owner(id)
            .and_then(|owner| self.native_window(owner))
            .map(|native| native.potential_fps())
            .unwrap_or(0.0)
    }
}
