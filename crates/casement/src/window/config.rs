//! Application-wide window system configuration.

use casement_core::{Padding, Size};

use super::placement::VideoMode;

/// Default application name, used as the title of untitled windows.
pub const DEFAULT_APP_NAME: &str = "casement";

/// Minimum size of windows that have a title bar.
pub const DEFAULT_TITLED_MINIMUM_SIZE: Size = Size::new(200.0, 200.0);

/// Configuration of a [`WindowSystem`](super::WindowSystem).
///
/// # Example
///
/// ```
/// use casement::window::WindowSystemConfig;
///
/// let config = WindowSystemConfig::new("Atlas").with_force_nesting(true);
/// assert_eq!(config.app_name(), "Atlas");
/// assert!(config.force_nesting());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSystemConfig {
    app_name: String,
    /// Nest every window in its top level window's surface.
    force_nesting: bool,
    /// Set when the display itself runs fullscreen in this mode.
    fullscreen_display: Option<VideoMode>,
    /// Minimum client size of resizable windows.
    window_padding: Padding,
    titled_minimum_size: Size,
}

impl Default for WindowSystemConfig {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            force_nesting: false,
            fullscreen_display: None,
            window_padding: Padding::uniform(4.0),
            titled_minimum_size: DEFAULT_TITLED_MINIMUM_SIZE,
        }
    }
}

impl WindowSystemConfig {
    /// Create a configuration for the named application.
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            ..Self::default()
        }
    }

    pub fn with_force_nesting(mut self, force: bool) -> Self {
        self.force_nesting = force;
        self
    }

    /// Run the display fullscreen: parentless windows take over the display.
    pub fn with_fullscreen_display(mut self, mode: VideoMode) -> Self {
        self.fullscreen_display = Some(mode);
        self
    }

    pub fn with_window_padding(mut self, padding: Padding) -> Self {
        self.window_padding = padding;
        self
    }

    pub fn with_titled_minimum_size(mut self, size: Size) -> Self {
        self.titled_minimum_size = size;
        self
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn force_nesting(&self) -> bool {
        self.force_nesting
    }

    pub fn fullscreen_display(&self) -> Option<VideoMode> {
        self.fullscreen_display
    }

    pub fn window_padding(&self) -> Padding {
        self.window_padding
    }

    pub fn titled_minimum_size(&self) -> Size {
        self.titled_minimum_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = WindowSystemConfig::default();
        assert_eq!(config.app_name(), DEFAULT_APP_NAME);
        assert!(!config.force_nesting());
        assert_eq!(config.fullscreen_display(), None);
        assert_eq!(config.titled_minimum_size(), Size::new(200.0, 200.0));
    }

    #[test]
    fn test_config_builder() {
        let config = WindowSystemConfig::new("Atlas")
            .with_fullscreen_display(VideoMode::new(1280, 720, 32))
            .with_window_padding(Padding::uniform(8.0))
            .with_titled_minimum_size(Size::new(320.0, 240.0));
        assert_eq!(config.fullscreen_display(), Some(VideoMode::new(1280, 720, 32)));
        assert_eq!(config.window_padding().size(), Size::new(16.0, 16.0));
        assert_eq!(config.titled_minimum_size(), Size::new(320.0, 240.0));
    }
}
