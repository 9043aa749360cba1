//! Modality and the counted enable mechanism.
//!
//! Each window carries an enable counter. A window is enabled while the
//! counter is non-negative. Modal windows decrement the counters of the
//! windows they block when they open and increment them again when they
//! go away, so blocks from several modal windows stack.

use casement_core::logging::targets;

use super::error::WindowResult;
use super::style::WindowStyle;
use super::system::WindowSystem;
use super::window::WindowId;

impl WindowSystem {
    /// Adjust every window blocked by `id` by one step.
    ///
    /// Application modal windows block every other registered window; modal
    /// windows block their owners. When enabling, an owner sharing the
    /// window's surface is activated unless the window is `NO_ACTIVATE`.
    pub fn update_modality(&mut self, id: WindowId, enable_ancestors: bool) -> WindowResult<()> {
        let style = self.window(id)?.style;
        let application_modal = style.has(WindowStyle::APPLICATION_MODAL);
        let modal = style.has(WindowStyle::MODAL);

        if application_modal || modal {
            for index in 0..self.window_manager().window_count() {
                let Some(other) = self.window_manager().window(index) else {
                    break;
                };
                if other == id {
                    continue;
                }
                if application_modal || self.is_owner_of(other, id) {
                    self.counted_window_enable(other, enable_ancestors)?;
                }
            }
            tracing::debug!(
                target: targets::MODALITY,
                window = ?id,
                enable = enable_ancestors,
                application_modal,
                "modality updated"
            );
        }

        if enable_ancestors {
            self.activate_surface_parent(id, style)?;
        }
        Ok(())
    }

    fn activate_surface_parent(&mut self, id: WindowId, style: WindowStyle) -> WindowResult<()> {
        if self.has_parent_window(id, true) && !style.has(WindowStyle::NO_ACTIVATE) {
            let parent = self.parent_window(id)?;
            self.activate(parent)?;
        }
        Ok(())
    }

    /// Step the window's enable counter and push the result to the window.
    ///
    /// Windows with a native window of their own are enabled natively;
    /// nests and nested windows keep the state locally.
    pub fn counted_window_enable(&mut self, id: WindowId, enable: bool) -> WindowResult<()> {
        let window = self.window_mut(id)?;
        if enable {
            window.counted_enable += 1;
        } else {
            window.counted_enable -= 1;
        }
        let enabled = window.counted_enable >= 0;
        let local = !window.is_surface() || window.is_nest();
        if local {
            window.enabled = enabled;
        } else if let Ok(native) = self.native_window_mut(id) {
            native.enable(enabled);
        }
        tracing::trace!(target: targets::MODALITY, window = ?id, enabled, "counted enable");
        Ok(())
    }

    /// Whether the window accepts input.
    pub fn window_enabled(&self, id: WindowId) -> bool {
        let Some(window) = self.get(id) else {
            return false;
        };
        if window.is_surface() && !window.is_nest() {
            self.native_window(id).is_ok_and(|native| native.is_enabled())
        } else {
            window.enabled
        }
    }

    /// Enable or disable a modal window together with what it blocks.
    pub fn modal_enable(&mut self, id: WindowId, enable: bool) -> WindowResult<()> {
        self.counted_window_enable(id, enable)?;
        self.update_modality(id, enable)?;
        if enable && !self.window(id)?.style.has(WindowStyle::NO_ACTIVATE) {
            self.activate(id)?;
        }
        Ok(())
    }

    /// Teardown half of the modality pass, run once per window by whichever
    /// of close or destroy comes first.
    ///
    /// Lifts the block put in place at init and activates an owner sharing
    /// the window's surface. Windows that never blocked anything still hand
    /// activation back to that owner.
    pub(crate) fn release_modality(&mut self, id: WindowId) -> WindowResult<()> {
        let window = self.window_mut(id)?;
        if window.modality_released {
            return Ok(());
        }
        window.modality_released = true;
        let style = window.style;
        if std::mem::take(&mut window.blocking) {
            self.update_modality(id, true)
        } else {
            self.activate_surface_parent(id, style)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::headless::NativeEvent;
    use crate::window::{WindowConfig, WindowSystemConfig};

    fn system() -> WindowSystem {
        WindowSystem::headless(WindowSystemConfig::default()).0
    }

    #[test]
    fn test_counted_enable_balances() {
        let mut system = system();
        let window = system.create_window(WindowConfig::new("main")).unwrap();
        assert!(system.window_enabled(window));

        let steps = [false, false, true, false, true, true];
        for enable in steps {
            system.counted_window_enable(window, enable).unwrap();
        }
        assert_eq!(system.get(window).unwrap().counted_enable(), 0);
        assert!(system.window_enabled(window));

        system.counted_window_enable(window, false).unwrap();
        assert!(!system.window_enabled(window));
        system.counted_window_enable(window, true).unwrap();
        assert!(system.window_enabled(window));
    }

    #[test]
    fn test_modal_blocks_owner_only() {
        let mut system = system();
        let owner = system.create_window(WindowConfig::new("owner")).unwrap();
        let bystander = system.create_window(WindowConfig::new("other")).unwrap();
        let dialog = system
            .create_window(
                WindowConfig::new("dialog")
                    .with_parent(owner)
                    .with_style_flags(WindowStyle::MODAL),
            )
            .unwrap();

        assert!(!system.window_enabled(owner));
        assert!(system.window_enabled(bystander));
        assert!(system.window_enabled(dialog));

        system.close(dialog).unwrap();
        assert!(system.window_enabled(owner));
    }

    #[test]
    fn test_application_modal_blocks_everyone() {
        let mut system = system();
        let first = system.create_window(WindowConfig::new("first")).unwrap();
        let second = system.create_window(WindowConfig::new("second")).unwrap();
        let modal = system
            .create_window(
                WindowConfig::new("modal").with_style_flags(WindowStyle::APPLICATION_MODAL),
            )
            .unwrap();

        assert!(!system.window_enabled(first));
        assert!(!system.window_enabled(second));
        assert!(system.window_enabled(modal));

        system.destroy_window(modal).unwrap();
        assert!(system.window_enabled(first));
        assert!(system.window_enabled(second));
        assert_eq!(system.get(first).unwrap().counted_enable(), 0);
    }

    #[test]
    fn test_stacked_modals() {
        let mut system = system();
        let owner = system.create_window(WindowConfig::new("owner")).unwrap();
        let modal = WindowStyle::DEFAULT | WindowStyle::MODAL;
        let first = system
            .create_window(WindowConfig::child_of(owner).with_style(modal))
            .unwrap();
        let second = system
            .create_window(WindowConfig::child_of(first).with_style(modal))
            .unwrap();

        assert_eq!(system.get(owner).unwrap().counted_enable(), -2);
        assert!(!system.window_enabled(first));

        system.close(second).unwrap();
        assert!(!system.window_enabled(owner));
        assert!(system.window_enabled(first));

        system.close(first).unwrap();
        assert!(system.window_enabled(owner));
    }

    #[test]
    fn test_destroying_nested_window_activates_its_nest() {
        let config = WindowSystemConfig::default().with_force_nesting(true);
        let (mut system, engine) = WindowSystem::headless(config);
        let root = system.create_window(WindowConfig::new("root")).unwrap();
        let child = system.create_window(WindowConfig::child_of(root)).unwrap();
        let root_surface = system.native_surface(root).unwrap().id();
        assert_eq!(engine.active_surface(), None);

        system.destroy_window(child).unwrap();
        assert_eq!(engine.active_surface(), Some(root_surface));
        assert!(system.is_active(root));
    }

    #[test]
    fn test_teardown_activates_owner_once() {
        let config = WindowSystemConfig::default().with_force_nesting(true);
        let (mut system, engine) = WindowSystem::headless(config);
        let root = system.create_window(WindowConfig::new("root")).unwrap();
        let child = system.create_window(WindowConfig::child_of(root)).unwrap();
        let root_surface = system.native_surface(root).unwrap().id();

        system.close(child).unwrap();
        system.destroy_window(child).unwrap();
        let activations = engine
            .events_for(root_surface)
            .into_iter()
            .filter(|event| *event == NativeEvent::Activate)
            .count();
        assert_eq!(activations, 1);
    }

    #[test]
    fn test_no_activate_window_leaves_owner_alone() {
        let config = WindowSystemConfig::default().with_force_nesting(true);
        let (mut system, engine) = WindowSystem::headless(config);
        let root = system.create_window(WindowConfig::new("root")).unwrap();
        let child = system
            .create_window(WindowConfig::child_of(root).with_style_flags(WindowStyle::NO_ACTIVATE))
            .unwrap();

        system.destroy_window(child).unwrap();
        assert_eq!(engine.active_surface(), None);
    }
}
