//! The window aggregate.
//!
//! A [`Window`] is plain state: style, placement, title, enable count,
//! focus and pointer targets, and its [`SurfaceBinding`]. Everything that
//! needs other windows, the registry or the backend lives on
//! [`WindowSystem`](super::WindowSystem).

use std::collections::HashMap;

use casement_core::{Rect, Signal, Size};
use slotmap::new_key_type;

use super::placement::WindowPlacement;
use super::style::{DecorationStyle, DismissalType, FrameStyle, ScrollbarStyle, WindowStyle};
use super::surface::SurfaceBinding;
use super::widget::{ClickedWidget, SizePolicy, StandardLayout, WidgetId};

new_key_type! {
    /// Handle of a window in a [`WindowSystem`](super::WindowSystem).
    ///
    /// Handles of destroyed windows stay safe to use: lookups fail and
    /// ancestor walks stop at them.
    pub struct WindowId;
}

/// Height of the title bar drawn for windows with [`WindowStyle::TITLE_BAR`].
pub const TITLE_BAR_HEIGHT: f32 = 32.0;

/// Title bar of a decorated window.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleBar {
    title: String,
}

impl TitleBar {
    pub(crate) fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
        }
    }

    /// Title currently displayed.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub(crate) fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }
}

/// A top level or nested window.
///
/// # Signals
///
/// - `closed()`: emitted once, after the window finished closing
/// - `dismissing_children(Option<ClickedWidget>)`: emitted before the
///   window dismisses the windows it owns
pub struct Window {
    pub(crate) id: WindowId,
    pub(crate) parent: Option<WindowId>,
    pub(crate) binding: SurfaceBinding,
    pub(crate) placement: WindowPlacement,
    pub(crate) style: WindowStyle,
    pub(crate) frame_style: FrameStyle,
    pub(crate) scrollbar_style: ScrollbarStyle,
    pub(crate) decoration_style: DecorationStyle,
    pub(crate) title_text: String,
    pub(crate) title_bar: Option<TitleBar>,
    pub(crate) is_closed: bool,
    pub(crate) ready_to_render: bool,
    pub(crate) counted_enable: i32,
    /// Enabled state of windows without a native window of their own.
    pub(crate) enabled: bool,
    pub(crate) visible: bool,
    /// Set while this window's modality pass is in effect.
    pub(crate) blocking: bool,
    /// Set once close or destroy has released the window's modality.
    pub(crate) modality_released: bool,
    pub(crate) entered_widget: Option<WidgetId>,
    pub(crate) focused_widget: Option<WidgetId>,
    pub(crate) dismissing: bool,
    pub(crate) client: Option<WidgetId>,
    pub(crate) layouts: HashMap<StandardLayout, Vec<WidgetId>>,
    pub(crate) size_policy: Option<SizePolicy>,
    pub(crate) fixed_size: Option<Size>,
    pub(crate) minimum_size: Option<Size>,
    pub(crate) style_subscribed: bool,
    /// Region awaiting a repaint, in window coordinates.
    pub(crate) update_region: Option<Rect>,
    /// Signal emitted once the window has closed.
    pub closed: Signal<()>,
    /// Signal emitted before owned windows are dismissed.
    pub dismissing_children: Signal<Option<ClickedWidget>>,
}

impl Window {
    pub fn id(&self) -> WindowId {
        self.id
    }

    /// Owner of this window, if it was created with one.
    ///
    /// The handle may dangle; [`WindowSystem::parent_window`] checks it.
    ///
    /// [`WindowSystem::parent_window`]: super::WindowSystem::parent_window
    pub fn parent(&self) -> Option<WindowId> {
        self.parent
    }

    pub fn binding(&self) -> &SurfaceBinding {
        &self.binding
    }

    pub fn style(&self) -> WindowStyle {
        self.style
    }

    pub fn set_style(&mut self, style: WindowStyle) {
        self.style = style;
    }

    pub fn frame_style(&self) -> FrameStyle {
        self.frame_style
    }

    pub fn scrollbar_style(&self) -> ScrollbarStyle {
        self.scrollbar_style
    }

    pub fn decoration_style(&self) -> DecorationStyle {
        self.decoration_style
    }

    pub fn placement(&self) -> &WindowPlacement {
        &self.placement
    }

    pub fn set_placement(&mut self, placement: WindowPlacement) {
        self.placement = placement;
    }

    pub fn title_text(&self) -> &str {
        &self.title_text
    }

    pub fn title_bar(&self) -> Option<&TitleBar> {
        self.title_bar.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.is_closed
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Owns a native surface.
    pub fn is_surface(&self) -> bool {
        self.binding.is_surface()
    }

    /// Hosts nested windows.
    pub fn is_nest(&self) -> bool {
        self.binding.is_nest()
    }

    /// Renders inside a nest's surface.
    pub fn is_nested(&self) -> bool {
        self.binding.is_nested()
    }

    pub fn is_weak(&self) -> bool {
        self.style.has(WindowStyle::WEAK)
    }

    pub fn is_strong(&self) -> bool {
        !self.is_weak()
    }

    pub fn requires_owner_focus(&self) -> bool {
        self.style.has(WindowStyle::REQUIRES_OWNER_FOCUS)
    }

    pub fn dismissal_type(&self) -> DismissalType {
        DismissalType::from(self.style)
    }

    /// Already closed or hidden, depending on how it is dismissed.
    pub fn dismissed(&self) -> bool {
        match self.dismissal_type() {
            DismissalType::CloseOnDismissal => self.is_closed,
            DismissalType::HideOnDismissal => !self.visible,
            DismissalType::CannotDismiss => false,
        }
    }

    pub fn is_dismissing_children(&self) -> bool {
        self.dismissing
    }

    /// Current value of the enable counter; enabled while non-negative.
    pub fn counted_enable(&self) -> i32 {
        self.counted_enable
    }

    /// Region scheduled for repaint, if any.
    pub fn update_region(&self) -> Option<Rect> {
        self.update_region
    }

    pub fn ready_to_render(&self) -> bool {
        self.ready_to_render
    }

    pub fn has_entered_widget(&self) -> bool {
        self.entered_widget.is_some()
    }

    pub fn has_focused_widget(&self) -> bool {
        self.focused_widget.is_some()
    }

    pub fn client_widget(&self) -> Option<WidgetId> {
        self.client
    }

    pub fn set_client(&mut self, client: WidgetId) {
        self.client = Some(client);
    }

    pub fn has_layout(&self, layout: StandardLayout) -> bool {
        self.layouts.contains_key(&layout)
    }

    /// Widgets placed in the standard layout `layout`.
    pub fn layout(&self, layout: StandardLayout) -> &[WidgetId] {
        self.layouts.get(&layout).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn add_to_layout(&mut self, layout: StandardLayout, widget: WidgetId) {
        self.layouts.entry(layout).or_default().push(widget);
    }

    pub fn set_size_policy(&mut self, policy: SizePolicy) {
        self.size_policy = Some(policy);
    }

    pub fn set_fixed_size(&mut self, size: Size) {
        self.fixed_size = Some(size);
    }

    pub fn set_minimum_size(&mut self, size: Size) {
        self.minimum_size = Some(size);
    }

    /// Size policy: explicit, else fixed when a fixed size is set, else manual.
    pub fn size_policy(&self) -> SizePolicy {
        match (self.size_policy, self.fixed_size) {
            (Some(policy), _) => policy,
            (None, Some(_)) => SizePolicy::Fixed,
            (None, None) => SizePolicy::Manual,
        }
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.id)
            .field("parent", &self.parent)
            .field("title", &self.title_text)
            .field("style", &self.style)
            .field("binding", &self.binding)
            .field("closed", &self.is_closed)
            .field("counted_enable", &self.counted_enable)
            .finish()
    }
}

static_assertions::assert_impl_all!(Window: Send);
