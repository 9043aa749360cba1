//! Interfaces to the native windowing backend.
//!
//! The window core never talks to an operating system directly. A
//! [`RenderingEngine`] creates [`NativeSurface`]s on request; surfaces that
//! are real on-screen windows also implement [`NativeWindow`].
//!
//! Every surface exposes a [`LivenessObserver`] so the core can tell when a
//! backend destroyed a surface behind its back.

use std::fmt;

use casement_core::{LivenessObserver, Padding, Point, Rect, Size};
use thiserror::Error;

use super::placement::VideoMode;
use super::style::WindowStyle;

/// Backend-assigned identifier of a native surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeSurfaceId(pub u64);

impl fmt::Display for NativeSurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// Kind of drawable a native surface is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceType {
    Window,
    Offscreen,
}

/// Geometry requested for a new native surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceKind {
    /// A regular window at a desktop position.
    Windowed { position: Point, size: Size },
    /// A fullscreen window in the given video mode.
    Fullscreen(VideoMode),
}

/// Everything a backend needs to create a native window.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceRequest {
    pub kind: SurfaceKind,
    /// Native surface the new window is parented to, if any.
    pub parent: Option<NativeSurfaceId>,
    pub title: String,
    pub style: WindowStyle,
}

/// Result of closing a native surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceCloseOutcome {
    /// The surface closed; the owning window is untouched.
    Closed,
    /// Closing the surface tears down the owning window as well.
    DestroyOwner,
}

/// Errors reported by a native backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NativeSurfaceError {
    #[error("native surface creation failed: {0}")]
    CreationFailed(String),
}

/// A backend able to create native surfaces.
pub trait RenderingEngine: Send {
    /// Create a native window for `request`.
    fn create_window(
        &mut self,
        request: &SurfaceRequest,
    ) -> Result<Box<dyn NativeSurface>, NativeSurfaceError>;
}

/// A native drawable owned by exactly one window.
pub trait NativeSurface: Send {
    fn id(&self) -> NativeSurfaceId;

    fn surface_type(&self) -> SurfaceType;

    /// Observer that turns dead once the backend destroys this surface.
    fn liveness(&self) -> LivenessObserver;

    fn surface_size(&self) -> Size;

    /// Mark `rect` (surface coordinates) as needing a repaint.
    fn invalidate(&mut self, rect: Rect);

    fn pause_rendering(&mut self);

    fn resume_rendering(&mut self);

    /// Close the surface.
    fn close(&mut self) -> SurfaceCloseOutcome;

    fn as_native_window(&self) -> Option<&dyn NativeWindow>;

    fn as_native_window_mut(&mut self) -> Option<&mut dyn NativeWindow>;
}

/// A native surface that is an on-screen window.
pub trait NativeWindow: NativeSurface {
    fn show(&mut self);
    fn hide(&mut self);
    fn is_visible(&self) -> bool;

    fn activate(&mut self);
    fn is_active(&self) -> bool;

    fn iconize(&mut self);
    fn is_iconic(&self) -> bool;
    fn maximize(&mut self);
    fn is_maximized(&self) -> bool;
    fn restore(&mut self);
    fn is_restored(&self) -> bool;
    fn enter_fullscreen(&mut self, mode: VideoMode);
    fn is_fullscreen(&self) -> bool;

    fn enable(&mut self, enable: bool);
    fn is_enabled(&self) -> bool;

    fn set_title_text(&mut self, title: &str);
    fn title_text(&self) -> &str;

    fn fps(&self) -> f64;
    fn potential_fps(&self) -> f64;

    /// Thickness of the native frame around the client area.
    fn border_thickness(&self) -> Padding;

    /// Called once the owning window finished initialising.
    fn initialisation_complete(&mut self);
}
