//! How a window is bound to a native surface.

use casement_core::LivenessObserver;

use super::nest::{Nest, NestedWindow};
use super::native::NativeSurface;
use super::widget::WidgetId;

/// A native surface owned by one window.
pub struct OwnedSurface {
    native: Box<dyn NativeSurface>,
    liveness: LivenessObserver,
    capturing: Option<WidgetId>,
}

impl OwnedSurface {
    pub(crate) fn new(native: Box<dyn NativeSurface>) -> Self {
        let liveness = native.liveness();
        Self {
            native,
            liveness,
            capturing: None,
        }
    }

    /// Whether the backend has not destroyed the surface yet.
    pub fn is_alive(&self) -> bool {
        self.liveness.is_alive()
    }

    pub fn liveness(&self) -> LivenessObserver {
        self.liveness.clone()
    }

    pub fn native(&self) -> &dyn NativeSurface {
        self.native.as_ref()
    }

    pub fn native_mut(&mut self) -> &mut dyn NativeSurface {
        self.native.as_mut()
    }

    /// Widget that currently captures pointer input on this surface.
    pub fn capturing_widget(&self) -> Option<WidgetId> {
        self.capturing
    }

    pub(crate) fn set_capture(&mut self, widget: WidgetId) {
        self.capturing = Some(widget);
    }

    /// Release the capture if `widget` holds it.
    pub(crate) fn release_capture(&mut self, widget: WidgetId) -> bool {
        if self.capturing == Some(widget) {
            self.capturing = None;
            true
        } else {
            false
        }
    }
}

impl std::fmt::Debug for OwnedSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnedSurface")
            .field("id", &self.native.id())
            .field("alive", &self.is_alive())
            .field("capturing", &self.capturing)
            .finish()
    }
}

/// A window's relationship to native surfaces.
///
/// A window either owns a surface or borrows its nest's, never both.
#[derive(Debug)]
pub enum SurfaceBinding {
    /// Owns a surface and hosts no nested windows.
    Standalone(OwnedSurface),
    /// Owns a surface that nested windows render into.
    NestRoot { surface: OwnedSurface, nest: Nest },
    /// Renders inside a nest's surface.
    Nested(NestedWindow),
}

impl SurfaceBinding {
    /// The surface this window owns, if any.
    pub fn owned(&self) -> Option<&OwnedSurface> {
        match self {
            SurfaceBinding::Standalone(surface) | SurfaceBinding::NestRoot { surface, .. } => {
                Some(surface)
            }
            SurfaceBinding::Nested(_) => None,
        }
    }

    pub fn owned_mut(&mut self) -> Option<&mut OwnedSurface> {
        match self {
            SurfaceBinding::Standalone(surface) | SurfaceBinding::NestRoot { surface, .. } => {
                Some(surface)
            }
            SurfaceBinding::Nested(_) => None,
        }
    }

    pub fn nest(&self) -> Option<&Nest> {
        match self {
            SurfaceBinding::NestRoot { nest, .. } => Some(nest),
            _ => None,
        }
    }

    pub fn nest_mut(&mut self) -> Option<&mut Nest> {
        match self {
            SurfaceBinding::NestRoot { nest, .. } => Some(nest),
            _ => None,
        }
    }

    pub fn nested(&self) -> Option<&NestedWindow> {
        match self {
            SurfaceBinding::Nested(nested) => Some(nested),
            _ => None,
        }
    }

    pub fn is_surface(&self) -> bool {
        self.owned().is_some()
    }

    /// Keep the surface and start hosting nested windows in it.
    pub(crate) fn into_nest_root(self) -> SurfaceBinding {
        match self {
            SurfaceBinding::Standalone(surface) => SurfaceBinding::NestRoot {
                surface,
                nest: Nest::new(),
            },
            binding => binding,
        }
    }

    pub fn is_nest(&self) -> bool {
        matches!(self, SurfaceBinding::NestRoot { .. })
    }

    pub fn is_nested(&self) -> bool {
        matches!(self, SurfaceBinding::Nested(_))
    }
}
