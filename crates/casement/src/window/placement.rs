//! Window placement: where a window goes and in what state.

use casement_core::{Point, Rect, Size};

/// Size of a window created without an explicit geometry.
pub const DEFAULT_WINDOW_SIZE: Size = Size::new(800.0, 600.0);

/// A display mode used for fullscreen windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VideoMode {
    pub width: u32,
    pub height: u32,
    pub bits_per_pixel: u32,
}

impl VideoMode {
    /// Create a new video mode.
    pub const fn new(width: u32, height: u32, bits_per_pixel: u32) -> Self {
        Self {
            width,
            height,
            bits_per_pixel,
        }
    }

    /// Size of the mode in pixels.
    pub fn size(&self) -> Size {
        Size::new(self.width as f32, self.height as f32)
    }
}

/// State a window is placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WindowState {
    #[default]
    Normal,
    Iconized,
    Maximized,
}

/// Placement of a window: normal geometry, state and optional video mode.
///
/// Placements are opaque value objects: they are handed to window creation
/// and read back from a window, never serialized here.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowPlacement {
    state: WindowState,
    normal_geometry: Rect,
    position_specified: bool,
    video_mode: Option<VideoMode>,
}

impl Default for WindowPlacement {
    fn default() -> Self {
        Self {
            state: WindowState::Normal,
            normal_geometry: Rect::from_size(DEFAULT_WINDOW_SIZE),
            position_specified: false,
            video_mode: None,
        }
    }
}

impl WindowPlacement {
    /// Default placement: normal state, default size, unspecified position.
    pub fn new() -> Self {
        Self::default()
    }

    /// Placement with an explicit normal geometry.
    pub fn from_rect(geometry: Rect) -> Self {
        Self::new().with_geometry(geometry)
    }

    /// Set the position; marks the position as specified.
    pub fn with_position(mut self, position: Point) -> Self {
        self.normal_geometry.origin = position;
        self.position_specified = true;
        self
    }

    /// Set the normal size.
    pub fn with_size(mut self, size: Size) -> Self {
        self.normal_geometry.size = size;
        self
    }

    /// Set the whole normal geometry; marks the position as specified.
    pub fn with_geometry(mut self, geometry: Rect) -> Self {
        self.normal_geometry = geometry;
        self.position_specified = true;
        self
    }

    /// Set the state.
    pub fn with_state(mut self, state: WindowState) -> Self {
        self.state = state;
        self
    }

    /// Request a fullscreen window in the given video mode.
    pub fn with_video_mode(mut self, mode: VideoMode) -> Self {
        self.video_mode = Some(mode);
        self
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    pub fn normal_geometry(&self) -> Rect {
        self.normal_geometry
    }

    pub fn position_specified(&self) -> bool {
        self.position_specified
    }

    pub fn video_mode(&self) -> Option<VideoMode> {
        self.video_mode
    }
}

impl From<VideoMode> for WindowPlacement {
    fn from(mode: VideoMode) -> Self {
        Self::from_rect(Rect::from_size(mode.size())).with_video_mode(mode)
    }
}

/// Move `rect` back onto `desktop`, then clamp its extents to the desktop.
///
/// The popup is first shifted right/down if it starts before the desktop
/// and left/up if it ends after it. Whatever still overhangs after that is
/// cut off.
pub fn corrected_popup_rect(desktop: Rect, rect: Rect) -> Rect {
    let mut result = rect;
    if result.left() < desktop.left() {
        result.origin.x += desktop.left() - result.left();
    }
    if result.top() < desktop.top() {
        result.origin.y += desktop.top() - result.top();
    }
    if result.right() > desktop.right() {
        result.origin.x += desktop.right() - result.right();
    }
    if result.bottom() > desktop.bottom() {
        result.origin.y += desktop.bottom() - result.bottom();
    }
    result.origin.x = result.origin.x.max(desktop.left());
    result.origin.y = result.origin.y.max(desktop.top());
    if result.right() > desktop.right() {
        result.size.width += desktop.right() - result.right();
    }
    if result.bottom() > desktop.bottom() {
        result.size.height += desktop.bottom() - result.bottom();
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_defaults() {
        let placement = WindowPlacement::new();
        assert_eq!(placement.state(), WindowState::Normal);
        assert_eq!(placement.normal_geometry().size, DEFAULT_WINDOW_SIZE);
        assert!(!placement.position_specified());
        assert!(placement.video_mode().is_none());
    }

    #[test]
    fn test_placement_builder() {
        let placement = WindowPlacement::new()
            .with_size(Size::new(320.0, 240.0))
            .with_position(Point::new(10.0, 20.0))
            .with_state(WindowState::Maximized);
        assert!(placement.position_specified());
        assert_eq!(placement.normal_geometry(), Rect::new(10.0, 20.0, 320.0, 240.0));
        assert_eq!(placement.state(), WindowState::Maximized);

        let fullscreen = WindowPlacement::from(VideoMode::new(1920, 1080, 32));
        assert_eq!(fullscreen.video_mode(), Some(VideoMode::new(1920, 1080, 32)));
        assert_eq!(fullscreen.normal_geometry().size, Size::new(1920.0, 1080.0));
    }

    #[test]
    fn test_corrected_popup_rect_shifts_onto_desktop() {
        let desktop = Rect::new(0.0, 0.0, 1000.0, 800.0);

        let overhanging = Rect::new(900.0, 750.0, 200.0, 100.0);
        assert_eq!(
            corrected_popup_rect(desktop, overhanging),
            Rect::new(800.0, 700.0, 200.0, 100.0)
        );

        let before = Rect::new(-50.0, -20.0, 100.0, 100.0);
        assert_eq!(
            corrected_popup_rect(desktop, before),
            Rect::new(0.0, 0.0, 100.0, 100.0)
        );

        let inside = Rect::new(10.0, 10.0, 100.0, 100.0);
        assert_eq!(corrected_popup_rect(desktop, inside), inside);
    }

    #[test]
    fn test_corrected_popup_rect_clamps_oversized() {
        let desktop = Rect::new(0.0, 0.0, 1000.0, 800.0);
        let huge = Rect::new(100.0, 100.0, 1500.0, 900.0);
        assert_eq!(
            corrected_popup_rect(desktop, huge),
            Rect::new(0.0, 0.0, 1000.0, 800.0)
        );
    }
}
