//! Window management: lifecycle, nesting, modality, focus and dismissal.
//!
//! All windows of an application live in one [`WindowSystem`]. Windows are
//! addressed by [`WindowId`] handles; the system owns the window state, the
//! registry of live windows ([`WindowManager`]) and the native backend
//! ([`RenderingEngine`]).
//!
//! # Creating windows
//!
//! ```
//! use casement::window::{WindowConfig, WindowStyle, WindowSystem, WindowSystemConfig};
//!
//! let (mut system, _engine) = WindowSystem::headless(WindowSystemConfig::new("Demo"));
//! let main = system.create_window(WindowConfig::new("Main")).unwrap();
//! let menu = system
//!     .create_window(
//!         WindowConfig::child_of(main)
//!             .with_style(WindowStyle::POPUP | WindowStyle::DISMISS_ON_OWNER_CLICK),
//!     )
//!     .unwrap();
//!
//! assert!(system.is_owner_of(main, menu));
//!
//! // A click anywhere in the main window closes the menu.
//! system.dismiss_children(main, None).unwrap();
//! assert!(system.get(menu).unwrap().is_closed());
//! ```
//!
//! # Nesting
//!
//! When nesting is forced, or a window's top level ancestor is fullscreen,
//! child windows do not get native surfaces of their own. They render into
//! the top level window's surface, which becomes a nest.

mod config;
mod dismissal;
mod error;
mod focus;
pub mod headless;
mod modality;
pub mod native;
mod nest;
mod placement;
mod render;
mod style;
mod surface;
mod system;
mod widget;
#[allow(clippy::module_inception)]
mod window;
mod window_config;
mod window_manager;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{DEFAULT_APP_NAME, DEFAULT_TITLED_MINIMUM_SIZE, WindowSystemConfig};
pub use error::{WindowError, WindowResult};
pub use headless::{HeadlessEngine, HeadlessSurface, NativeEvent};
pub use native::{
    NativeSurface, NativeSurfaceError, NativeSurfaceId, NativeWindow, RenderingEngine,
    SurfaceCloseOutcome, SurfaceKind, SurfaceRequest, SurfaceType,
};
pub use nest::{Nest, NestedWindow};
pub use placement::{
    DEFAULT_WINDOW_SIZE, VideoMode, WindowPlacement, WindowState, corrected_popup_rect,
};
pub use render::{
    ACTIVE_RENDERING_PRIORITY, DROP_SHADOW_COLOR, DROP_SHADOW_OFFSET, GraphicsContext,
    INACTIVE_RENDERING_PRIORITY,
};
pub use style::{
    DecorationStyle, DismissalType, FrameStyle, ScrollbarStyle, StyleAspect, WindowStyle,
};
pub use surface::{OwnedSurface, SurfaceBinding};
pub use system::{NESTED_BORDER, WindowSystem};
pub use widget::{
    ClickedWidget, FocusPolicy, FocusReason, ScrollingDisposition, SizePolicy, StandardLayout,
    WidgetId, WidgetPart, WidgetTree,
};
pub use window::{TITLE_BAR_HEIGHT, TitleBar, Window, WindowId};
pub use window_config::{WindowConfig, WindowType};
pub use window_manager::{DEFAULT_DESKTOP, DesktopWindowManager, WindowManager};
