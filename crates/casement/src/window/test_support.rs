//! In-memory widget tree used by unit tests.

use casement_core::{Point, Rect};
use slotmap::SlotMap;

use super::widget::{FocusPolicy, FocusReason, WidgetId, WidgetPart, WidgetTree};
use super::window::WindowId;

/// Notification recorded by [`FakeTree`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TreeEvent {
    Entered(WidgetId),
    Left(WidgetId),
    FocusGained(WidgetId, FocusReason),
    FocusLost(WidgetId, FocusReason),
    Layout(WindowId),
}

pub struct FakeWidget {
    pub window: WindowId,
    pub parent: Option<WidgetId>,
    /// Rectangle in window coordinates.
    pub rect: Rect,
    /// Client area, widget-local.
    pub client: Rect,
    pub enabled: bool,
    pub policy: FocusPolicy,
}

/// A flat widget tree: widgets are rectangles in window coordinates and
/// later widgets sit on top of earlier ones.
#[derive(Default)]
pub struct FakeTree {
    pub widgets: SlotMap<WidgetId, FakeWidget>,
    order: Vec<WidgetId>,
    pub events: Vec<TreeEvent>,
    /// Widget removed from the tree the next time it is told the mouse left.
    pub remove_on_leave: Option<WidgetId>,
}

impl FakeTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a widget whose client area is its whole rectangle.
    pub fn add(
        &mut self,
        window: WindowId,
        parent: Option<WidgetId>,
        rect: Rect,
        policy: FocusPolicy,
    ) -> WidgetId {
        self.add_with_client(window, parent, rect, Rect::from_size(rect.size), policy)
    }

    pub fn add_with_client(
        &mut self,
        window: WindowId,
        parent: Option<WidgetId>,
        rect: Rect,
        client: Rect,
        policy: FocusPolicy,
    ) -> WidgetId {
        let id = self.widgets.insert(FakeWidget {
            window,
            parent,
            rect,
            client,
            enabled: true,
            policy,
        });
        self.order.push(id);
        id
    }

    pub fn remove(&mut self, widget: WidgetId) {
        self.widgets.remove(widget);
        self.order.retain(|w| *w != widget);
    }

    pub fn take_events(&mut self) -> Vec<TreeEvent> {
        std::mem::take(&mut self.events)
    }
}

impl WidgetTree for FakeTree {
    fn contains(&self, widget: WidgetId) -> bool {
        self.widgets.contains_key(widget)
    }

    fn parent(&self, widget: WidgetId) -> Option<WidgetId> {
        self.widgets.get(widget).and_then(|w| w.parent)
    }

    fn origin(&self, widget: WidgetId) -> Point {
        self.widgets
            .get(widget)
            .map(|w| w.rect.top_left())
            .unwrap_or_default()
    }

    fn client_rect(&self, widget: WidgetId) -> Rect {
        self.widgets.get(widget).map(|w| w.client).unwrap_or_default()
    }

    fn hit_test(&self, widget: WidgetId, position: Point) -> WidgetPart {
        let Some(w) = self.widgets.get(widget) else {
            return WidgetPart::Nowhere;
        };
        if w.client.contains(position) {
            WidgetPart::Client
        } else if Rect::from_size(w.rect.size).contains(position) {
            WidgetPart::NonClient
        } else {
            WidgetPart::Nowhere
        }
    }

    fn widget_at(&self, window: WindowId, position: Point) -> Option<WidgetId> {
        self.order.iter().rev().copied().find(|id| {
            self.widgets
                .get(*id)
                .is_some_and(|w| w.window == window && w.rect.contains(position))
        })
    }

    fn is_enabled(&self, widget: WidgetId) -> bool {
        self.widgets.get(widget).is_some_and(|w| w.enabled)
    }

    fn focus_policy(&self, widget: WidgetId) -> FocusPolicy {
        self.widgets
            .get(widget)
            .map(|w| w.policy)
            .unwrap_or(FocusPolicy::NO_FOCUS)
    }

    fn mouse_entered(&mut self, widget: WidgetId, _position: Point) {
        self.events.push(TreeEvent::Entered(widget));
    }

    fn mouse_left(&mut self, widget: WidgetId) {
        self.events.push(TreeEvent::Left(widget));
        if let Some(doomed) = self.remove_on_leave.take() {
            self.remove(doomed);
        }
    }

    fn focus_gained(&mut self, widget: WidgetId, reason: FocusReason) {
        self.events.push(TreeEvent::FocusGained(widget, reason));
    }

    fn focus_lost(&mut self, widget: WidgetId, reason: FocusReason) {
        self.events.push(TreeEvent::FocusLost(widget, reason));
    }

    fn request_layout(&mut self, window: WindowId) {
        self.events.push(TreeEvent::Layout(window));
    }
}
