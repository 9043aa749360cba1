//! Focus and pointer routing.
//!
//! Each window remembers the widget under the pointer (the *entered*
//! widget) and the widget holding keyboard focus. Both are plain
//! [`WidgetId`]s; the tree is consulted, and notified, through a
//! [`WidgetTree`] passed to each call.
//!
//! Tree callbacks may remove widgets. Stored ids are re-checked with
//! [`WidgetTree::contains`] after every callback before they are used.

use casement_core::Point;
use casement_core::logging::targets;

use super::error::{WindowError, WindowResult};
use super::system::WindowSystem;
use super::widget::{FocusPolicy, FocusReason, WidgetId, WidgetPart, WidgetTree};
use super::window::WindowId;

impl WindowSystem {
    // =========================================================================
    // Pointer
    // =========================================================================

    /// Widget currently under the pointer.
    pub fn entered_widget(&self, id: WindowId) -> WindowResult<WidgetId> {
        self.window(id)?
            .entered_widget
            .ok_or(WindowError::WidgetNotEntered)
    }

    /// The pointer moved into or within the window.
    ///
    /// The capturing widget wins over whatever is under the pointer. When
    /// the target changes, the old widget is told the mouse left before
    /// the new one is told it entered.
    pub fn mouse_entered<T: WidgetTree + ?Sized>(
        &mut self,
        id: WindowId,
        position: Point,
        tree: &mut T,
    ) -> WindowResult<()> {
        let old = self.window(id)?.entered_widget;
        let under = match self.capturing_widget(id) {
            Some(capturing) => Some(capturing),
            None => tree.widget_at(id, position),
        };
        if under == old {
            return Ok(());
        }

        self.window_mut(id)?.entered_widget = under;
        if let Some(old) = old.filter(|w| tree.contains(*w)) {
            tree.mouse_left(old);
        }
        let Some(new) = under else {
            return Ok(());
        };
        // The old widget's handler may have removed the new one.
        let window = self.window_mut(id)?;
        if window.entered_widget != Some(new) {
            return Ok(());
        }
        if !tree.contains(new) {
            window.entered_widget = None;
            return Ok(());
        }
        tracing::trace!(target: targets::FOCUS, window = ?id, widget = ?new, "mouse entered");
        tree.mouse_entered(new, position);
        Ok(())
    }

    /// The pointer left the window.
    pub fn mouse_left<T: WidgetTree + ?Sized>(
        &mut self,
        id: WindowId,
        tree: &mut T,
    ) -> WindowResult<()> {
        if let Some(old) = self.window_mut(id)?.entered_widget.take() {
            if tree.contains(old) {
                tree.mouse_left(old);
            }
        }
        Ok(())
    }

    /// Re-resolve the entered widget once layout has moved widgets around.
    pub fn layout_items_completed<T: WidgetTree + ?Sized>(
        &mut self,
        id: WindowId,
        tree: &mut T,
    ) -> WindowResult<()> {
        let Some(entered) = self.window(id)?.entered_widget else {
            return Ok(());
        };
        let position = self.mouse_position(id);
        let under = match self.capturing_widget(id) {
            Some(capturing) => Some(capturing),
            None => tree.widget_at(id, position),
        };
        if under != Some(entered) {
            self.mouse_entered(id, position, tree)?;
        }
        Ok(())
    }

    // =========================================================================
    // Capture
    // =========================================================================

    /// Route all pointer input on the window's surface to `widget`.
    pub fn set_capture(&mut self, id: WindowId, widget: WidgetId) -> WindowResult<()> {
        let owner = self.surface_owner(id)?;
        if let Some(surface) = self.window_mut(owner)?.binding.owned_mut() {
            surface.set_capture(widget);
        }
        Ok(())
    }

    /// Release the capture if `widget` holds it.
    pub fn release_capture(&mut self, id: WindowId, widget: WidgetId) -> WindowResult<bool> {
        let owner = self.surface_owner(id)?;
        Ok(self
            .window_mut(owner)?
            .binding
            .owned_mut()
            .is_some_and(|surface| surface.release_capture(widget)))
    }

    /// Widget capturing pointer input on the window's surface.
    pub fn capturing_widget(&self, id: WindowId) -> Option<WidgetId> {
        let owner = self.surface_owner(id).ok()?;
        self.get(owner)?
            .binding
            .owned()
            .filter(|surface| surface.is_alive())?
            .capturing_widget()
    }

    // =========================================================================
    // Keyboard focus
    // =========================================================================

    /// Widget holding keyboard focus.
    pub fn focused_widget(&self, id: WindowId) -> WindowResult<WidgetId> {
        self.window(id)?
            .focused_widget
            .ok_or(WindowError::WidgetNotFocused)
    }

    /// Give `widget` keyboard focus.
    ///
    /// The previously focused widget loses focus before `widget` gains it,
    /// both with `reason`. Focusing the focused widget does nothing.
    pub fn set_focused_widget<T: WidgetTree + ?Sized>(
        &mut self,
        id: WindowId,
        widget: WidgetId,
        reason: FocusReason,
        tree: &mut T,
    ) -> WindowResult<()> {
        let window = self.window_mut(id)?;
        if window.focused_widget == Some(widget) {
            return Ok(());
        }
        let previous = window.focused_widget.replace(widget);
        tracing::debug!(
            target: targets::FOCUS,
            window = ?id,
            ?previous,
            ?widget,
            ?reason,
            "focus changed"
        );
        if let Some(previous) = previous.filter(|w| tree.contains(*w)) {
            tree.focus_lost(previous, reason);
        }
        if self.window(id)?.focused_widget == Some(widget) && tree.contains(widget) {
            tree.focus_gained(widget, reason);
        }
        Ok(())
    }

    /// Take focus away from `widget`, which must hold it.
    pub fn release_focused_widget<T: WidgetTree + ?Sized>(
        &mut self,
        id: WindowId,
        widget: WidgetId,
        tree: &mut T,
    ) -> WindowResult<()> {
        let window = self.window_mut(id)?;
        if window.focused_widget != Some(widget) {
            return Err(WindowError::WidgetNotFocused);
        }
        window.focused_widget = None;
        tracing::debug!(target: targets::FOCUS, window = ?id, ?widget, "focus released");
        if tree.contains(widget) {
            tree.focus_lost(widget, FocusReason::Other);
        }
        Ok(())
    }

    /// Move focus in response to a click at `click_position` (window
    /// coordinates) on `candidate`.
    ///
    /// A click inside the focused widget's client area keeps focus where it
    /// is when that widget descends from the candidate. Otherwise the
    /// candidate takes focus if it is enabled and accepts it, unless the
    /// click hit its non-client area while one of its children holds focus
    /// or its policy ignores non-client clicks. A candidate that cannot
    /// take focus passes the click on to its parent.
    pub fn update_click_focus<T: WidgetTree + ?Sized>(
        &mut self,
        id: WindowId,
        candidate: WidgetId,
        click_position: Point,
        tree: &mut T,
    ) -> WindowResult<()> {
        let mut candidate = candidate;
        loop {
            let focused = self.window(id)?.focused_widget;
            let focused_child = focused.filter(|f| tree.is_descendant_of(*f, candidate));
            if let Some(child) = focused_child {
                let local = click_position - tree.origin(child);
                if tree.client_rect(child).contains(local) {
                    return Ok(());
                }
            }
            let child_has_focus = focused_child.is_some();

            let local = click_position - tree.origin(candidate);
            let in_client_area = tree.hit_test(candidate, local) == WidgetPart::Client;
            let reason = if in_client_area {
                FocusReason::ClickClient
            } else {
                FocusReason::ClickNonClient
            };

            if tree.is_enabled(candidate) && tree.can_set_focus(candidate, reason) {
                let ignores_non_client = tree
                    .focus_policy(candidate)
                    .has(FocusPolicy::IGNORE_NON_CLIENT);
                if in_client_area || (!ignores_non_client && !child_has_focus) {
                    self.set_focused_widget(id, candidate, reason, tree)?;
                }
                return Ok(());
            }

            match tree.parent(candidate) {
                Some(parent) if !child_has_focus => candidate = parent,
                _ => return Ok(()),
            }
        }
    }

    // =========================================================================
    // Tree changes
    // =========================================================================

    /// A widget was added to the window.
    pub fn widget_added<T: WidgetTree + ?Sized>(
        &mut self,
        id: WindowId,
        _widget: WidgetId,
        tree: &mut T,
    ) -> WindowResult<()> {
        self.window(id)?;
        tree.request_layout(id);
        Ok(())
    }

    /// A widget was removed from the window.
    ///
    /// Forgets the widget as entered or focused widget and releases any
    /// capture it held, then asks for layout.
    pub fn widget_removed<T: WidgetTree + ?Sized>(
        &mut self,
        id: WindowId,
        widget: WidgetId,
        tree: &mut T,
    ) -> WindowResult<()> {
        let window = self.window_mut(id)?;
        if window.entered_widget == Some(widget) {
            window.entered_widget = None;
        }
        if window.focused_widget == Some(widget) {
            window.focused_widget = None;
        }
        if self.capturing_widget(id) == Some(widget) {
            self.release_capture(id, widget)?;
        }
        tree.request_layout(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use casement_core::Rect;

    use super::*;
    use crate::window::test_support::{FakeTree, TreeEvent};
    use crate::window::{WindowConfig, WindowSystemConfig};

    fn setup() -> (WindowSystem, WindowId, FakeTree) {
        let (mut system, _) = WindowSystem::headless(WindowSystemConfig::default());
        let window = system.create_window(WindowConfig::new("focus")).unwrap();
        (system, window, FakeTree::new())
    }

    #[test]
    fn test_focus_transfer_order() {
        let (mut system, window, mut tree) = setup();
        let x = tree.add(window, None, Rect::new(0.0, 0.0, 50.0, 50.0), FocusPolicy::STRONG_FOCUS);
        let y = tree.add(window, None, Rect::new(60.0, 0.0, 50.0, 50.0), FocusPolicy::STRONG_FOCUS);

        system.set_focused_widget(window, y, FocusReason::Other, &mut tree).unwrap();
        tree.take_events();

        system.set_focused_widget(window, x, FocusReason::Tab, &mut tree).unwrap();
        assert_eq!(
            tree.take_events(),
            vec![
                TreeEvent::FocusLost(y, FocusReason::Tab),
                TreeEvent::FocusGained(x, FocusReason::Tab),
            ]
        );
        assert_eq!(system.focused_widget(window), Ok(x));

        // Refocusing is silent.
        system.set_focused_widget(window, x, FocusReason::Tab, &mut tree).unwrap();
        assert!(tree.take_events().is_empty());
    }

    #[test]
    fn test_release_unfocused_widget_fails() {
        let (mut system, window, mut tree) = setup();
        let x = tree.add(window, None, Rect::new(0.0, 0.0, 50.0, 50.0), FocusPolicy::STRONG_FOCUS);
        let z = tree.add(window, None, Rect::new(60.0, 0.0, 50.0, 50.0), FocusPolicy::STRONG_FOCUS);
        system.set_focused_widget(window, x, FocusReason::Other, &mut tree).unwrap();
        tree.take_events();

        assert_eq!(
            system.release_focused_widget(window, z, &mut tree),
            Err(WindowError::WidgetNotFocused)
        );
        assert_eq!(system.focused_widget(window), Ok(x));
        assert!(tree.take_events().is_empty());

        system.release_focused_widget(window, x, &mut tree).unwrap();
        assert_eq!(tree.take_events(), vec![TreeEvent::FocusLost(x, FocusReason::Other)]);
        assert_eq!(system.focused_widget(window), Err(WindowError::WidgetNotFocused));
    }

    #[test]
    fn test_click_inside_focused_child_keeps_focus() {
        let (mut system, window, mut tree) = setup();
        let panel = tree.add(window, None, Rect::new(0.0, 0.0, 200.0, 200.0), FocusPolicy::STRONG_FOCUS);
        let edit = tree.add(
            window,
            Some(panel),
            Rect::new(10.0, 10.0, 100.0, 20.0),
            FocusPolicy::STRONG_FOCUS,
        );
        system.set_focused_widget(window, edit, FocusReason::Other, &mut tree).unwrap();

        system
            .update_click_focus(window, panel, Point::new(20.0, 15.0), &mut tree)
            .unwrap();
        assert_eq!(system.focused_widget(window), Ok(edit));

        // Outside the child the panel takes focus.
        system
            .update_click_focus(window, panel, Point::new(150.0, 150.0), &mut tree)
            .unwrap();
        assert_eq!(system.focused_widget(window), Ok(panel));
    }

    #[test]
    fn test_click_focus_climbs_to_focusable_parent() {
        let (mut system, window, mut tree) = setup();
        let panel = tree.add(window, None, Rect::new(0.0, 0.0, 200.0, 200.0), FocusPolicy::CLICK_FOCUS);
        let label = tree.add(window, Some(panel), Rect::new(10.0, 10.0, 50.0, 20.0), FocusPolicy::NO_FOCUS);

        system
            .update_click_focus(window, label, Point::new(15.0, 15.0), &mut tree)
            .unwrap();
        assert_eq!(system.focused_widget(window), Ok(panel));
        assert_eq!(
            tree.take_events(),
            vec![TreeEvent::FocusGained(panel, FocusReason::ClickClient)]
        );
    }

    #[test]
    fn test_non_client_click_does_not_steal_from_child() {
        let (mut system, window, mut tree) = setup();
        // Client area excludes a 20px header.
        let frame = tree.add_with_client(
            window,
            None,
            Rect::new(0.0, 0.0, 200.0, 200.0),
            Rect::new(0.0, 20.0, 200.0, 180.0),
            FocusPolicy::STRONG_FOCUS,
        );
        let edit = tree.add(window, Some(frame), Rect::new(10.0, 40.0, 100.0, 20.0), FocusPolicy::STRONG_FOCUS);
        system.set_focused_widget(window, edit, FocusReason::Other, &mut tree).unwrap();

        system
            .update_click_focus(window, frame, Point::new(5.0, 5.0), &mut tree)
            .unwrap();
        assert_eq!(system.focused_widget(window), Ok(edit));

        // Without a focused child the header click focuses the frame.
        system.release_focused_widget(window, edit, &mut tree).unwrap();
        system
            .update_click_focus(window, frame, Point::new(5.0, 5.0), &mut tree)
            .unwrap();
        assert_eq!(system.focused_widget(window), Ok(frame));
    }

    #[test]
    fn test_ignore_non_client_policy() {
        let (mut system, window, mut tree) = setup();
        let frame = tree.add_with_client(
            window,
            None,
            Rect::new(0.0, 0.0, 200.0, 200.0),
            Rect::new(0.0, 20.0, 200.0, 180.0),
            FocusPolicy::STRONG_FOCUS | FocusPolicy::IGNORE_NON_CLIENT,
        );
        system
            .update_click_focus(window, frame, Point::new(5.0, 5.0), &mut tree)
            .unwrap();
        assert!(!system.get(window).unwrap().has_focused_widget());

        system
            .update_click_focus(window, frame, Point::new(5.0, 50.0), &mut tree)
            .unwrap();
        assert_eq!(system.focused_widget(window), Ok(frame));
    }

    #[test]
    fn test_mouse_enter_and_leave() {
        let (mut system, window, mut tree) = setup();
        let a = tree.add(window, None, Rect::new(0.0, 0.0, 50.0, 50.0), FocusPolicy::NO_FOCUS);
        let b = tree.add(window, None, Rect::new(60.0, 0.0, 50.0, 50.0), FocusPolicy::NO_FOCUS);

        assert_eq!(system.entered_widget(window), Err(WindowError::WidgetNotEntered));
        system.mouse_entered(window, Point::new(10.0, 10.0), &mut tree).unwrap();
        system.mouse_entered(window, Point::new(20.0, 10.0), &mut tree).unwrap();
        system.mouse_entered(window, Point::new(70.0, 10.0), &mut tree).unwrap();
        assert_eq!(
            tree.take_events(),
            vec![TreeEvent::Entered(a), TreeEvent::Left(a), TreeEvent::Entered(b)]
        );
        assert_eq!(system.entered_widget(window), Ok(b));

        system.mouse_left(window, &mut tree).unwrap();
        assert_eq!(tree.take_events(), vec![TreeEvent::Left(b)]);
        assert!(!system.get(window).unwrap().has_entered_widget());
    }

    #[test]
    fn test_mouse_entered_survives_removal_during_leave() {
        let (mut system, window, mut tree) = setup();
        let a = tree.add(window, None, Rect::new(0.0, 0.0, 50.0, 50.0), FocusPolicy::NO_FOCUS);
        let b = tree.add(window, None, Rect::new(60.0, 0.0, 50.0, 50.0), FocusPolicy::NO_FOCUS);
        system.mouse_entered(window, Point::new(10.0, 10.0), &mut tree).unwrap();
        tree.take_events();

        tree.remove_on_leave = Some(b);
        system.mouse_entered(window, Point::new(70.0, 10.0), &mut tree).unwrap();
        assert_eq!(tree.take_events(), vec![TreeEvent::Left(a)]);
        assert!(!system.get(window).unwrap().has_entered_widget());
    }

    #[test]
    fn test_capture_overrides_hit_test() {
        let (mut system, window, mut tree) = setup();
        let a = tree.add(window, None, Rect::new(0.0, 0.0, 50.0, 50.0), FocusPolicy::NO_FOCUS);
        let b = tree.add(window, None, Rect::new(60.0, 0.0, 50.0, 50.0), FocusPolicy::NO_FOCUS);

        system.set_capture(window, a).unwrap();
        system.mouse_entered(window, Point::new(70.0, 10.0), &mut tree).unwrap();
        assert_eq!(system.entered_widget(window), Ok(a));

        assert!(!system.release_capture(window, b).unwrap());
        assert!(system.release_capture(window, a).unwrap());
        system.mouse_entered(window, Point::new(70.0, 10.0), &mut tree).unwrap();
        assert_eq!(system.entered_widget(window), Ok(b));
    }

    #[test]
    fn test_widget_removed_clears_state() {
        let (mut system, window, mut tree) = setup();
        let a = tree.add(window, None, Rect::new(0.0, 0.0, 50.0, 50.0), FocusPolicy::STRONG_FOCUS);
        system.mouse_entered(window, Point::new(10.0, 10.0), &mut tree).unwrap();
        system.set_focused_widget(window, a, FocusReason::Other, &mut tree).unwrap();
        system.set_capture(window, a).unwrap();
        tree.take_events();

        tree.remove(a);
        system.widget_removed(window, a, &mut tree).unwrap();
        assert!(!system.get(window).unwrap().has_entered_widget());
        assert!(!system.get(window).unwrap().has_focused_widget());
        assert_eq!(system.capturing_widget(window), None);
        assert_eq!(tree.take_events(), vec![TreeEvent::Layout(window)]);
    }

    #[test]
    fn test_layout_items_completed_re_resolves_entered() {
        let (mut system, window, mut tree) = setup();
        let a = tree.add(window, None, Rect::new(0.0, 0.0, 50.0, 50.0), FocusPolicy::NO_FOCUS);
        let origin = system.window_position(window).unwrap();
        system
            .window_manager_mut()
            .set_mouse_position(origin + Point::new(10.0, 10.0));
        system.mouse_entered(window, Point::new(10.0, 10.0), &mut tree).unwrap();
        tree.take_events();

        // Layout moved the widget away from the pointer.
        tree.widgets[a].rect = Rect::new(100.0, 100.0, 50.0, 50.0);
        system.layout_items_completed(window, &mut tree).unwrap();
        assert_eq!(tree.take_events(), vec![TreeEvent::Left(a)]);
        assert!(!system.get(window).unwrap().has_entered_widget());
    }
}
