//! Window style flags and the styles derived from them.
//!
//! [`WindowStyle`] is the bitmask every window is created with. It decides
//! how the window is decorated, whether it nests, how it takes part in
//! modality and whether an outside click dismisses it.

use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

/// Window style flags.
///
/// Flags can be combined with `|`:
///
/// ```
/// use casement::window::WindowStyle;
///
/// let style = WindowStyle::POPUP | WindowStyle::DISMISS_ON_OWNER_CLICK;
/// assert!(style.has(WindowStyle::POPUP));
/// assert!(!style.has(WindowStyle::MODAL));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WindowStyle(u32);

impl WindowStyle {
    /// No flags.
    pub const NONE: WindowStyle = WindowStyle(0);
    /// No decoration at all.
    pub const NO_DECORATION: WindowStyle = WindowStyle(1 << 0);
    /// Window has a title bar.
    pub const TITLE_BAR: WindowStyle = WindowStyle(1 << 1);
    /// Window has a minimize box.
    pub const MINIMIZE_BOX: WindowStyle = WindowStyle(1 << 2);
    /// Window has a maximize box.
    pub const MAXIMIZE_BOX: WindowStyle = WindowStyle(1 << 3);
    /// Window has a close box.
    pub const CLOSE: WindowStyle = WindowStyle(1 << 4);
    /// Window can be resized.
    pub const RESIZE: WindowStyle = WindowStyle(1 << 5);
    /// Dialog window.
    pub const DIALOG: WindowStyle = WindowStyle(1 << 6);
    /// Popup window.
    pub const POPUP: WindowStyle = WindowStyle(1 << 7);
    /// Menu window.
    pub const MENU: WindowStyle = WindowStyle(1 << 8);
    /// Tool window.
    pub const TOOL: WindowStyle = WindowStyle(1 << 9);
    /// Window renders inside its nest's surface.
    pub const NESTED: WindowStyle = WindowStyle(1 << 10);
    /// Window covers a whole display.
    pub const FULLSCREEN: WindowStyle = WindowStyle(1 << 11);
    /// Blocks its owners while open.
    pub const MODAL: WindowStyle = WindowStyle(1 << 12);
    /// Blocks every other window while open.
    pub const APPLICATION_MODAL: WindowStyle = WindowStyle(1 << 13);
    /// Dismissal of children only happens while the owner has focus.
    pub const REQUIRES_OWNER_FOCUS: WindowStyle = WindowStyle(1 << 14);
    /// Closed when a widget of an owner window is clicked.
    pub const DISMISS_ON_OWNER_CLICK: WindowStyle = WindowStyle(1 << 15);
    /// Closed when a widget of the parent window is clicked.
    pub const DISMISS_ON_PARENT_CLICK: WindowStyle = WindowStyle(1 << 16);
    /// Hidden when a widget of an owner window is clicked.
    pub const HIDE_ON_OWNER_CLICK: WindowStyle = WindowStyle(1 << 17);
    /// Hidden when a widget of the parent window is clicked.
    pub const HIDE_ON_PARENT_CLICK: WindowStyle = WindowStyle(1 << 18);
    /// Never activates its parent or itself implicitly.
    pub const NO_ACTIVATE: WindowStyle = WindowStyle(1 << 19);
    /// Hidden after initialisation.
    pub const INITIALLY_HIDDEN: WindowStyle = WindowStyle(1 << 20);
    /// Centred on its parent after initialisation.
    pub const INITIALLY_CENTERED: WindowStyle = WindowStyle(1 << 21);
    /// Ready to render as soon as it is created.
    pub const INITIALLY_RENDERABLE: WindowStyle = WindowStyle(1 << 22);
    /// Paints a drop shadow (nested windows only).
    pub const DROP_SHADOW: WindowStyle = WindowStyle(1 << 23);
    /// Window may close while the event loop is not running.
    pub const WEAK: WindowStyle = WindowStyle(1 << 24);
    /// Application main window.
    pub const MAIN: WindowStyle = WindowStyle(1 << 25);

    /// Default style: a decorated, resizable, renderable top level window.
    pub const DEFAULT: WindowStyle = WindowStyle(
        Self::TITLE_BAR.0
            | Self::MINIMIZE_BOX.0
            | Self::MAXIMIZE_BOX.0
            | Self::CLOSE.0
            | Self::RESIZE.0
            | Self::INITIALLY_RENDERABLE.0,
    );

    /// Check if every flag in `flag` is set.
    #[inline]
    pub fn has(&self, flag: WindowStyle) -> bool {
        (self.0 & flag.0) == flag.0
    }

    /// Check if any flag in `flags` is set.
    #[inline]
    pub fn has_any(&self, flags: WindowStyle) -> bool {
        (self.0 & flags.0) != 0
    }

    /// Return a copy with the flags in `flags` cleared.
    #[inline]
    pub fn without(self, flags: WindowStyle) -> WindowStyle {
        self & !flags
    }

    /// Raw bit representation.
    pub fn bits(&self) -> u32 {
        self.0
    }
}

impl BitOr for WindowStyle {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        WindowStyle(self.0 | rhs.0)
    }
}

impl BitOrAssign for WindowStyle {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for WindowStyle {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        WindowStyle(self.0 & rhs.0)
    }
}

impl Not for WindowStyle {
    type Output = Self;

    fn not(self) -> Self::Output {
        WindowStyle(!self.0)
    }
}

/// Frame drawn around a window's client area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FrameStyle {
    NoFrame,
    SolidFrame,
    #[default]
    WindowFrame,
}

/// Scrollbar presentation for a window's client area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScrollbarStyle {
    None,
    #[default]
    Normal,
    Menu,
    Scroller,
}

/// Decoration applied to a window, derived from its [`WindowStyle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DecorationStyle(u16);

impl DecorationStyle {
    pub const NONE: DecorationStyle = DecorationStyle(0);
    pub const WINDOW: DecorationStyle = DecorationStyle(1 << 0);
    pub const DIALOG: DecorationStyle = DecorationStyle(1 << 1);
    pub const TOOL: DecorationStyle = DecorationStyle(1 << 2);
    pub const POPUP: DecorationStyle = DecorationStyle(1 << 3);
    pub const MENU: DecorationStyle = DecorationStyle(1 << 4);
    pub const NESTED: DecorationStyle = DecorationStyle(1 << 5);
    pub const RESIZABLE: DecorationStyle = DecorationStyle(1 << 6);
    pub const DOCK_AREAS: DecorationStyle = DecorationStyle(1 << 7);

    /// Check if every flag in `flag` is set.
    #[inline]
    pub fn has(&self, flag: DecorationStyle) -> bool {
        (self.0 & flag.0) == flag.0
    }
}

impl BitOr for DecorationStyle {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        DecorationStyle(self.0 | rhs.0)
    }
}

impl BitOrAssign for DecorationStyle {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl From<WindowStyle> for DecorationStyle {
    fn from(style: WindowStyle) -> Self {
        let mut result = if style.has(WindowStyle::NO_DECORATION) {
            DecorationStyle::NONE
        } else if style.has(WindowStyle::DIALOG) {
            DecorationStyle::DIALOG
        } else {
            DecorationStyle::WINDOW
        };
        let extras = [
            (WindowStyle::TOOL, DecorationStyle::TOOL),
            (WindowStyle::POPUP, DecorationStyle::POPUP),
            (WindowStyle::MENU, DecorationStyle::MENU),
            (WindowStyle::NESTED, DecorationStyle::NESTED),
            (WindowStyle::RESIZE, DecorationStyle::RESIZABLE),
            (WindowStyle::MAIN, DecorationStyle::DOCK_AREAS),
        ];
        for (window_flag, decoration) in extras {
            if style.has(window_flag) {
                result |= decoration;
            }
        }
        result
    }
}

/// The part of the application style that changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StyleAspect(u8);

impl StyleAspect {
    pub const GEOMETRY: StyleAspect = StyleAspect(1 << 0);
    pub const FONT: StyleAspect = StyleAspect(1 << 1);
    pub const COLOR: StyleAspect = StyleAspect(1 << 2);
    pub const STYLE: StyleAspect = StyleAspect(
        Self::GEOMETRY.0 | Self::FONT.0 | Self::COLOR.0,
    );

    /// Check if every flag in `aspect` is set.
    #[inline]
    pub fn has(&self, aspect: StyleAspect) -> bool {
        (self.0 & aspect.0) == aspect.0
    }
}

impl BitOr for StyleAspect {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        StyleAspect(self.0 | rhs.0)
    }
}

/// How a window reacts to an outside click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DismissalType {
    CannotDismiss,
    CloseOnDismissal,
    HideOnDismissal,
}

impl From<WindowStyle> for DismissalType {
    fn from(style: WindowStyle) -> Self {
        if style.has_any(WindowStyle::DISMISS_ON_OWNER_CLICK | WindowStyle::DISMISS_ON_PARENT_CLICK) {
            DismissalType::CloseOnDismissal
        } else if style.has_any(WindowStyle::HIDE_ON_OWNER_CLICK | WindowStyle::HIDE_ON_PARENT_CLICK) {
            DismissalType::HideOnDismissal
        } else {
            DismissalType::CannotDismiss
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_flags() {
        let style = WindowStyle::DEFAULT | WindowStyle::MODAL;
        assert!(style.has(WindowStyle::TITLE_BAR));
        assert!(style.has(WindowStyle::MODAL));
        assert!(!style.has(WindowStyle::NESTED));
        assert!(style.has(WindowStyle::RESIZE | WindowStyle::CLOSE));
        assert!(!style.has(WindowStyle::RESIZE | WindowStyle::NESTED));
        assert!(style.has_any(WindowStyle::RESIZE | WindowStyle::NESTED));

        let stripped = style.without(WindowStyle::RESIZE | WindowStyle::MINIMIZE_BOX);
        assert!(!stripped.has(WindowStyle::RESIZE));
        assert!(!stripped.has(WindowStyle::MINIMIZE_BOX));
        assert!(stripped.has(WindowStyle::MAXIMIZE_BOX));
    }

    #[test]
    fn test_decoration_from_style() {
        assert_eq!(
            DecorationStyle::from(WindowStyle::NO_DECORATION),
            DecorationStyle::NONE
        );
        let dialog = DecorationStyle::from(WindowStyle::DIALOG | WindowStyle::RESIZE);
        assert!(dialog.has(DecorationStyle::DIALOG));
        assert!(dialog.has(DecorationStyle::RESIZABLE));
        assert!(!dialog.has(DecorationStyle::WINDOW));

        let main = DecorationStyle::from(WindowStyle::MAIN | WindowStyle::TOOL);
        assert!(main.has(DecorationStyle::WINDOW | DecorationStyle::TOOL | DecorationStyle::DOCK_AREAS));
    }

    #[test]
    fn test_dismissal_type_from_style() {
        assert_eq!(
            DismissalType::from(WindowStyle::DEFAULT),
            DismissalType::CannotDismiss
        );
        assert_eq!(
            DismissalType::from(WindowStyle::DISMISS_ON_PARENT_CLICK),
            DismissalType::CloseOnDismissal
        );
        assert_eq!(
            DismissalType::from(WindowStyle::HIDE_ON_OWNER_CLICK),
            DismissalType::HideOnDismissal
        );
        // Close wins over hide when both are requested.
        assert_eq!(
            DismissalType::from(WindowStyle::DISMISS_ON_OWNER_CLICK | WindowStyle::HIDE_ON_OWNER_CLICK),
            DismissalType::CloseOnDismissal
        );
    }
}
