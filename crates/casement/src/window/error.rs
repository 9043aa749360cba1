//! Error types for window operations.

use thiserror::Error;

use super::native::NativeSurfaceError;

/// Errors raised by window construction and window accessors.
///
/// Accessor failures (`NoSurface`, `NoParentWindow`, `WidgetNotFocused`, ...)
/// indicate misuse: check the matching `has_*` predicate first.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WindowError {
    /// A window with a video mode was also asked to nest.
    #[error("a fullscreen window cannot be nested")]
    FullscreenWindowCannotNest,

    /// A window was asked to nest without a parent to nest in.
    #[error("a window without a parent cannot be nested")]
    ParentlessWindowCannotNest,

    /// Neither the window nor any ancestor provides a surface.
    #[error("window has no surface")]
    NoSurface,

    /// The window does not own a live native surface.
    #[error("window has no native surface")]
    NoNativeSurface,

    /// The window's native surface is not a native window.
    #[error("window has no native window")]
    NoNativeWindow,

    /// The window has no parent window.
    #[error("window has no parent window")]
    NoParentWindow,

    /// The window is neither a nest nor hosted by one.
    #[error("window is not in a nest")]
    NotInNest,

    /// The window does not host nested windows.
    #[error("window is not a nest")]
    NotANest,

    /// The window is not nested.
    #[error("window is not nested")]
    NotNested,

    /// The nested window's parent is not itself nested.
    #[error("nested window has no nested parent")]
    NoNestedParent,

    /// No widget is currently under the pointer.
    #[error("no widget has been entered")]
    WidgetNotEntered,

    /// The widget does not hold keyboard focus.
    #[error("widget is not focused")]
    WidgetNotFocused,

    /// The window handle is stale or was never issued.
    #[error("window not found")]
    WindowNotFound,

    /// The backend could not create a native surface.
    #[error("failed to create native surface: {0}")]
    SurfaceCreation(String),

    /// The requested behaviour has no implementation yet.
    #[error("not yet implemented: {0}")]
    NotYetImplemented(&'static str),
}

impl From<NativeSurfaceError> for WindowError {
    fn from(err: NativeSurfaceError) -> Self {
        match err {
            NativeSurfaceError::CreationFailed(msg) => Self::SurfaceCreation(msg),
        }
    }
}

/// Result type for window operations.
pub type WindowResult<T> = Result<T, WindowError>;
