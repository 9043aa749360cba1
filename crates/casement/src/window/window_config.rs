//! Per-window creation options.

use casement_core::{Point, Size};

use super::placement::{VideoMode, WindowPlacement, WindowState};
use super::style::{FrameStyle, ScrollbarStyle, WindowStyle};
use super::window::WindowId;

/// Common kinds of window, each mapping to a preset [`WindowStyle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WindowType {
    #[default]
    Normal,
    /// Modal dialog.
    Dialog,
    /// Borderless window closed by a click on its owner.
    Popup,
    /// Popup menu: closed by an owner click, never activated.
    Menu,
    /// Small decorated helper window.
    Tool,
}

impl WindowType {
    /// Style a window of this type is created with.
    pub fn default_style(&self) -> WindowStyle {
        match self {
            WindowType::Normal => WindowStyle::DEFAULT,
            WindowType::Dialog => {
                WindowStyle::DIALOG
                    | WindowStyle::TITLE_BAR
                    | WindowStyle::CLOSE
                    | WindowStyle::MODAL
                    | WindowStyle::INITIALLY_RENDERABLE
            }
            WindowType::Popup => {
                WindowStyle::POPUP
                    | WindowStyle::NO_DECORATION
                    | WindowStyle::DISMISS_ON_OWNER_CLICK
                    | WindowStyle::INITIALLY_RENDERABLE
            }
            WindowType::Menu => {
                WindowStyle::MENU
                    | WindowStyle::POPUP
                    | WindowStyle::NO_DECORATION
                    | WindowStyle::DISMISS_ON_OWNER_CLICK
                    | WindowStyle::NO_ACTIVATE
                    | WindowStyle::INITIALLY_RENDERABLE
            }
            WindowType::Tool => {
                WindowStyle::TOOL
                    | WindowStyle::TITLE_BAR
                    | WindowStyle::CLOSE
                    | WindowStyle::RESIZE
                    | WindowStyle::INITIALLY_RENDERABLE
            }
        }
    }
}

/// Options for creating one window.
///
/// # Example
///
/// ```
/// use casement::window::{WindowConfig, WindowStyle, WindowType};
///
/// let config = WindowConfig::new("Find")
///     .with_type(WindowType::Dialog)
///     .with_style_flags(WindowStyle::NO_ACTIVATE);
/// assert_eq!(config.title(), Some("Find"));
/// assert!(config.style().has(WindowStyle::MODAL | WindowStyle::NO_ACTIVATE));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    /// Title text; the application name when unset.
    title: Option<String>,
    /// Owner of the new window.
    parent: Option<WindowId>,
    placement: WindowPlacement,
    style: WindowStyle,
    frame_style: FrameStyle,
    scrollbar_style: ScrollbarStyle,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: None,
            parent: None,
            placement: WindowPlacement::default(),
            style: WindowStyle::DEFAULT,
            frame_style: FrameStyle::default(),
            scrollbar_style: ScrollbarStyle::default(),
        }
    }
}

impl WindowConfig {
    /// Create a configuration with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Create an untitled configuration owned by `parent`.
    pub fn child_of(parent: WindowId) -> Self {
        Self {
            parent: Some(parent),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_parent(mut self, parent: WindowId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Replace the style with the preset for `window_type`.
    pub fn with_type(mut self, window_type: WindowType) -> Self {
        self.style = window_type.default_style();
        self
    }

    pub fn with_style(mut self, style: WindowStyle) -> Self {
        self.style = style;
        self
    }

    /// Add flags to the current style.
    pub fn with_style_flags(mut self, flags: WindowStyle) -> Self {
        self.style |= flags;
        self
    }

    pub fn with_placement(mut self, placement: WindowPlacement) -> Self {
        self.placement = placement;
        self
    }

    pub fn with_position(mut self, position: Point) -> Self {
        self.placement = self.placement.with_position(position);
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.placement = self.placement.with_size(size);
        self
    }

    pub fn with_state(mut self, state: WindowState) -> Self {
        self.placement = self.placement.with_state(state);
        self
    }

    /// Request a fullscreen window.
    pub fn with_video_mode(mut self, mode: VideoMode) -> Self {
        self.placement = self.placement.with_video_mode(mode);
        self
    }

    pub fn with_frame_style(mut self, frame_style: FrameStyle) -> Self {
        self.frame_style = frame_style;
        self
    }

    pub fn with_scrollbar_style(mut self, scrollbar_style: ScrollbarStyle) -> Self {
        self.scrollbar_style = scrollbar_style;
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn parent(&self) -> Option<WindowId> {
        self.parent
    }

    pub fn placement(&self) -> &WindowPlacement {
        &self.placement
    }

    pub fn style(&self) -> WindowStyle {
        self.style
    }

    pub fn frame_style(&self) -> FrameStyle {
        self.frame_style
    }

    pub fn scrollbar_style(&self) -> ScrollbarStyle {
        self.scrollbar_style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_config_defaults() {
        let config = WindowConfig::default();
        assert_eq!(config.title(), None);
        assert_eq!(config.parent(), None);
        assert_eq!(config.style(), WindowStyle::DEFAULT);
        assert_eq!(config.frame_style(), FrameStyle::WindowFrame);
        assert_eq!(config.scrollbar_style(), ScrollbarStyle::Normal);
        assert!(!config.placement().position_specified());
    }

    #[test]
    fn test_window_config_builder() {
        let config = WindowConfig::new("Editor")
            .with_position(Point::new(40.0, 30.0))
            .with_size(Size::new(1024.0, 768.0))
            .with_frame_style(FrameStyle::NoFrame)
            .with_style_flags(WindowStyle::MAIN);
        assert_eq!(config.title(), Some("Editor"));
        assert!(config.placement().position_specified());
        assert_eq!(config.placement().normal_geometry().size, Size::new(1024.0, 768.0));
        assert!(config.style().has(WindowStyle::MAIN | WindowStyle::TITLE_BAR));
        assert_eq!(config.frame_style(), FrameStyle::NoFrame);
    }

    #[test]
    fn test_window_type_presets() {
        let popup = WindowType::Popup.default_style();
        assert!(popup.has(WindowStyle::DISMISS_ON_OWNER_CLICK));
        assert!(!popup.has(WindowStyle::TITLE_BAR));

        let menu = WindowConfig::default().with_type(WindowType::Menu);
        assert!(menu.style().has(WindowStyle::NO_ACTIVATE));

        let dialog = WindowType::Dialog.default_style();
        assert!(dialog.has(WindowStyle::MODAL | WindowStyle::DIALOG));
    }
}
