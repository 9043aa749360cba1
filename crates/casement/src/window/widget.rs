//! The window core's view of the widget tree.
//!
//! Windows do not own widgets. Focus and pointer routing reach the tree
//! through [`WidgetTree`], which callers pass in for the duration of one
//! operation. Widgets are named by generational [`WidgetId`]s, so a
//! widget removed during a callback simply stops being `contains`-ed.

use std::ops::{BitOr, BitOrAssign};

use casement_core::{Point, Rect};
use slotmap::new_key_type;

use super::window::WindowId;

new_key_type! {
    /// Handle of a widget in the application's widget tree.
    pub struct WidgetId;
}

/// Result of hit-testing a point against a widget or window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetPart {
    Nowhere,
    Client,
    NonClient,
    TitleBar,
    Border,
    /// Area that drags the whole window.
    Grab,
}

/// Why a widget gained or lost focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusReason {
    ClickClient,
    ClickNonClient,
    Tab,
    Backtab,
    Shortcut,
    Other,
}

/// How a widget accepts focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FocusPolicy(u8);

impl FocusPolicy {
    pub const NO_FOCUS: FocusPolicy = FocusPolicy(0);
    pub const TAB_FOCUS: FocusPolicy = FocusPolicy(1 << 0);
    pub const CLICK_FOCUS: FocusPolicy = FocusPolicy(1 << 1);
    pub const WHEEL_FOCUS: FocusPolicy = FocusPolicy(1 << 2);
    /// Clicks on the non-client area never move focus to this widget.
    pub const IGNORE_NON_CLIENT: FocusPolicy = FocusPolicy(1 << 3);
    pub const STRONG_FOCUS: FocusPolicy = FocusPolicy(Self::TAB_FOCUS.0 | Self::CLICK_FOCUS.0);

    #[inline]
    pub fn has(&self, flag: FocusPolicy) -> bool {
        (self.0 & flag.0) == flag.0
    }

    /// Whether a widget with this policy takes focus for `reason`.
    pub fn accepts(&self, reason: FocusReason) -> bool {
        match reason {
            FocusReason::ClickClient | FocusReason::ClickNonClient => {
                self.has(Self::CLICK_FOCUS)
            }
            FocusReason::Tab | FocusReason::Backtab => self.has(Self::TAB_FOCUS),
            FocusReason::Shortcut | FocusReason::Other => {
                self.has(Self::TAB_FOCUS) || self.has(Self::CLICK_FOCUS)
            }
        }
    }
}

impl BitOr for FocusPolicy {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        FocusPolicy(self.0 | rhs.0)
    }
}

impl BitOrAssign for FocusPolicy {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// How a window's size reacts to layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizePolicy {
    Fixed,
    Minimum,
    Expanding,
    /// Size is whatever the user or the application last set.
    Manual,
}

/// Standard sub-layouts of a window, looked up by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardLayout {
    Default,
    TitleBar,
    Menu,
    Toolbar,
    Dock,
    StatusBar,
}

/// Whether a child widget scrolls with the client area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollingDisposition {
    ScrollChildWidget,
    DontScrollChildWidget,
}

/// A widget that was clicked, together with the window it lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClickedWidget {
    pub widget: WidgetId,
    pub root: WindowId,
}

/// Access to the widget tree for focus and pointer routing.
///
/// Positions handed to `hit_test` and `client_rect` are widget-local;
/// `origin` maps a widget into its window's coordinates.
pub trait WidgetTree {
    /// Whether `widget` is still part of the tree.
    fn contains(&self, widget: WidgetId) -> bool;

    fn parent(&self, widget: WidgetId) -> Option<WidgetId>;

    /// Strict ancestry: a widget is not its own descendant.
    fn is_descendant_of(&self, widget: WidgetId, ancestor: WidgetId) -> bool {
        let mut current = self.parent(widget);
        while let Some(w) = current {
            if w == ancestor {
                return true;
            }
            current = self.parent(w);
        }
        false
    }

    /// Origin of `widget` in window coordinates.
    fn origin(&self, widget: WidgetId) -> Point;

    /// Client rectangle of `widget`, widget-local.
    fn client_rect(&self, widget: WidgetId) -> Rect;

    fn hit_test(&self, widget: WidgetId, position: Point) -> WidgetPart;

    /// Topmost widget of `window` under `position` (window coordinates).
    fn widget_at(&self, window: WindowId, position: Point) -> Option<WidgetId>;

    fn is_enabled(&self, widget: WidgetId) -> bool;

    fn focus_policy(&self, widget: WidgetId) -> FocusPolicy;

    fn can_set_focus(&self, widget: WidgetId, reason: FocusReason) -> bool {
        self.focus_policy(widget).accepts(reason)
    }

    fn mouse_entered(&mut self, widget: WidgetId, position: Point);

    fn mouse_left(&mut self, widget: WidgetId);

    fn focus_gained(&mut self, widget: WidgetId, reason: FocusReason);

    fn focus_lost(&mut self, widget: WidgetId, reason: FocusReason);

    /// Ask for the window's widgets to be laid out again.
    fn request_layout(&mut self, _window: WindowId) {}
}
