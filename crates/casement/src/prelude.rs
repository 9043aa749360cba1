//! Common imports for working with Casement.
//!
//! ```
//! use casement::prelude::*;
//! ```

pub use casement_core::{Point, Rect, Signal, Size};

pub use crate::window::{
    ClickedWidget, FocusPolicy, FocusReason, VideoMode, WidgetId, WidgetTree, WindowConfig,
    WindowError, WindowId, WindowPlacement, WindowResult, WindowStyle, WindowSystem,
    WindowSystemConfig, WindowType,
};
