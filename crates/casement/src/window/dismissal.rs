//! Dismissal of owned windows on outside clicks.
//!
//! Popups, menus and similar windows declare through their style whether a
//! click on an owner (or on the direct parent) closes or hides them. The
//! window that was clicked runs [`WindowSystem::dismiss_children`] over the
//! registry.

use casement_core::logging::targets;
use casement_core::PerfSpan;

use super::error::WindowResult;
use super::style::{DismissalType, WindowStyle};
use super::system::WindowSystem;
use super::widget::ClickedWidget;
use super::window::WindowId;

impl WindowSystem {
    /// Whether a click on `clicked` dismisses window `id`.
    ///
    /// `None` stands for a synthetic dismissal of everything dismissible.
    pub fn can_dismiss(&self, id: WindowId, clicked: Option<ClickedWidget>) -> WindowResult<bool> {
        let window = self.window(id)?;
        let (owner_flag, parent_flag) = match window.dismissal_type() {
            DismissalType::CannotDismiss => return Ok(false),
            DismissalType::CloseOnDismissal => (
                WindowStyle::DISMISS_ON_OWNER_CLICK,
                WindowStyle::DISMISS_ON_PARENT_CLICK,
            ),
            DismissalType::HideOnDismissal => (
                WindowStyle::HIDE_ON_OWNER_CLICK,
                WindowStyle::HIDE_ON_PARENT_CLICK,
            ),
        };
        let Some(clicked) = clicked else {
            return Ok(true);
        };
        let style = window.style();
        Ok((style.has(owner_flag) && self.is_owner_of(clicked.root, id))
            || (style.has(parent_flag) && self.is_parent_of(clicked.root, id)))
    }

    /// Close or hide the window according to its dismissal type.
    ///
    /// A keyboard grab held by the window is released first.
    pub fn dismiss(&mut self, id: WindowId) -> WindowResult<()> {
        let dismissal = self.window(id)?.dismissal_type();
        if self.ungrab_keyboard(id) {
            tracing::debug!(target: targets::DISMISSAL, window = ?id, "keyboard grab released");
        }
        match dismissal {
            DismissalType::CloseOnDismissal => self.close(id)?,
            DismissalType::HideOnDismissal => {
                self.show(id, false)?;
            }
            DismissalType::CannotDismiss => {}
        }
        tracing::debug!(target: targets::DISMISSAL, window = ?id, ?dismissal, "window dismissed");
        Ok(())
    }

    /// Dismiss every window owned by `id` that a click on `clicked` should
    /// dismiss.
    ///
    /// Emits `dismissing_children` first. Windows with
    /// [`WindowStyle::REQUIRES_OWNER_FOCUS`] never dismiss their children
    /// this way.
    pub fn dismiss_children(
        &mut self,
        id: WindowId,
        clicked: Option<ClickedWidget>,
    ) -> WindowResult<()> {
        let _span = PerfSpan::new("dismiss_children");

        let window = self.window_mut(id)?;
        window.dismissing_children.emit(clicked);
        if window.requires_owner_focus() {
            return Ok(());
        }
        window.dismissing = true;
        let result = self.dismiss_owned(id, clicked);
        if let Some(window) = self.get_mut(id) {
            window.dismissing = false;
        }
        result
    }

    fn dismiss_owned(&mut self, id: WindowId, clicked: Option<ClickedWidget>) -> WindowResult<()> {
        // Closing shrinks the registry, so scanning restarts from the front
        // after a close. Hiding leaves the registry as is.
        let mut index = 0;
        while index < self.window_manager().window_count() {
            let Some(other) = self.window_manager().window(index) else {
                break;
            };
            let Some(window) = self.get(other) else {
                index += 1;
                continue;
            };
            let dismissal = window.dismissal_type();
            if !window.dismissed()
                && self.is_owner_of(id, other)
                && self.can_dismiss(other, clicked)?
            {
                if dismissal == DismissalType::CloseOnDismissal {
                    index = 0;
                } else {
                    index += 1;
                }
                self.dismiss(other)?;
            } else {
                index += 1;
            }
        }
        Ok(())
    }
}
