//! The window system context.
//!
//! [`WindowSystem`] owns every window, the registry of live windows and the
//! native backend. There is one per application; it is passed explicitly to
//! whatever needs it.

use std::collections::HashMap;

use casement_core::logging::targets;
use casement_core::{Padding, PerfSpan, Point, Rect, Signal, Size};
use slotmap::SlotMap;

use super::config::WindowSystemConfig;
use super::error::{WindowError, WindowResult};
use super::headless::HeadlessEngine;
use super::nest::{Nest, NestedWindow};
use super::native::{
    NativeSurface, NativeSurfaceId, NativeWindow, RenderingEngine, SurfaceCloseOutcome,
    SurfaceKind, SurfaceRequest, SurfaceType,
};
use super::placement::{VideoMode, WindowPlacement, WindowState, corrected_popup_rect};
use super::style::{DecorationStyle, FrameStyle, StyleAspect, WindowStyle};
use super::surface::{OwnedSurface, SurfaceBinding};
use super::widget::{ScrollingDisposition, StandardLayout, WidgetId, WidgetPart};
use super::window::{TITLE_BAR_HEIGHT, TitleBar, Window, WindowId};
use super::window_config::WindowConfig;
use super::window_manager::{DesktopWindowManager, WindowManager};

/// Border assumed for windows that do not own a native window.
pub const NESTED_BORDER: Padding = Padding::uniform(4.0);

/// Surface arrangement decided while a window is being created.
enum PendingBinding {
    Owned { surface: OwnedSurface, nest: bool },
    Nested { nest: WindowId },
}

/// Owner of all windows of an application.
///
/// # Signals
///
/// - `style_changed(StyleAspect)`: emitted when the application style changed
/// - `layout_requested(WindowId)`: emitted when a nested window needs its
///   widgets laid out, since it has no native surface to size it
pub struct WindowSystem {
    config: WindowSystemConfig,
    windows: SlotMap<WindowId, Window>,
    window_manager: Box<dyn WindowManager>,
    engine: Box<dyn RenderingEngine>,
    keyboard_grab: Option<WindowId>,
    running: bool,
    /// Signal emitted when the application style changed.
    pub style_changed: Signal<StyleAspect>,
    /// Signal emitted when a nested window needs layout.
    pub layout_requested: Signal<WindowId>,
}

impl WindowSystem {
    /// Create a window system from its collaborators.
    pub fn new(
        config: WindowSystemConfig,
        window_manager: Box<dyn WindowManager>,
        engine: Box<dyn RenderingEngine>,
    ) -> Self {
        tracing::debug!(target: targets::WINDOW, app = config.app_name(), "window system created");
        Self {
            config,
            windows: SlotMap::with_key(),
            window_manager,
            engine,
            keyboard_grab: None,
            running: false,
            style_changed: Signal::new(),
            layout_requested: Signal::new(),
        }
    }

    /// Create a window system on the headless backend and an in-memory
    /// desktop. The returned engine shares the backend's event log.
    pub fn headless(config: WindowSystemConfig) -> (Self, HeadlessEngine) {
        let engine = HeadlessEngine::new();
        let system = Self::new(
            config,
            Box::new(DesktopWindowManager::new()),
            Box::new(engine.clone()),
        );
        (system, engine)
    }

    pub fn config(&self) -> &WindowSystemConfig {
        &self.config
    }

    pub fn window_manager(&self) -> &dyn WindowManager {
        self.window_manager.as_ref()
    }

    pub fn window_manager_mut(&mut self) -> &mut dyn WindowManager {
        self.window_manager.as_mut()
    }

    /// Tell the system whether the application event loop is running.
    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of windows that have not been destroyed.
    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.windows.contains_key(id)
    }

    pub fn window_ids(&self) -> impl Iterator<Item = WindowId> + '_ {
        self.windows.keys()
    }

    pub fn get(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(id)
    }

    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.get_mut(id)
    }

    /// Look up a window, failing with [`WindowError::WindowNotFound`].
    pub fn window(&self, id: WindowId) -> WindowResult<&Window> {
        self.windows.get(id).ok_or_else(|| {
            tracing::warn!(target: targets::WINDOW, ?id, "stale window handle");
            WindowError::WindowNotFound
        })
    }

    pub fn window_mut(&mut self, id: WindowId) -> WindowResult<&mut Window> {
        self.windows.get_mut(id).ok_or_else(|| {
            tracing::warn!(target: targets::WINDOW, ?id, "stale window handle");
            WindowError::WindowNotFound
        })
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Create and initialise a window.
    ///
    /// Fails without creating anything when the configuration breaks a
    /// nesting rule or the backend cannot create a surface.
    pub fn create_window(&mut self, config: WindowConfig) -> WindowResult<WindowId> {
        let _span = PerfSpan::new("create_window");

        let parent = config.parent();
        if let Some(parent) = parent {
            self.window(parent)?;
        }

        let mut style = config.style();
        if style.has(WindowStyle::NESTED) && parent.is_none() {
            return Err(WindowError::ParentlessWindowCannotNest);
        }
        if let Some(parent) = parent {
            let ancestor = self.ultimate_ancestor(parent);
            if self.config.force_nesting() || self.is_fullscreen(ancestor) {
                style |= WindowStyle::NESTED;
            }
        }

        let title = config
            .title()
            .map(str::to_string)
            .unwrap_or_else(|| self.config.app_name().to_string());
        let mut placement = config.placement().clone();
        let mut frame_style = config.frame_style();

        let pending = if let Some(mode) = placement.video_mode() {
            if style.has(WindowStyle::NESTED) {
                return Err(WindowError::FullscreenWindowCannotNest);
            }
            style = fullscreen_style(style);
            let surface = self.create_surface(SurfaceKind::Fullscreen(mode), None, &title, style)?;
            PendingBinding::Owned { surface, nest: false }
        } else if style.has(WindowStyle::NESTED) {
            let parent = parent.ok_or(WindowError::ParentlessWindowCannotNest)?;
            PendingBinding::Nested {
                nest: self.nest_for_new_window(parent)?,
            }
        } else {
            if parent.is_none() {
                if let Some(mode) = self.config.fullscreen_display() {
                    style = fullscreen_style(style);
                    placement = WindowPlacement::from(mode);
                }
            }
            match placement.state() {
                WindowState::Normal => {}
                WindowState::Iconized => {
                    return Err(WindowError::NotYetImplemented("iconized initial placement"));
                }
                WindowState::Maximized => {
                    return Err(WindowError::NotYetImplemented("maximized initial placement"));
                }
            }
            let kind = match placement.video_mode() {
                Some(mode) => SurfaceKind::Fullscreen(mode),
                None => SurfaceKind::Windowed {
                    position: placement.normal_geometry().top_left(),
                    size: placement.normal_geometry().size,
                },
            };
            let native_parent = match parent {
                Some(parent) => self
                    .surface_owner(parent)
                    .and_then(|owner| self.native_surface(owner))
                    .map(|surface| surface.id())
                    .ok(),
                None => None,
            };
            let surface = self.create_surface(kind, native_parent, &title, style)?;
            PendingBinding::Owned { surface, nest: false }
        };

        // Fullscreen roots and, when nesting is forced, top level windows
        // host nested windows.
        let pending = match pending {
            PendingBinding::Owned { surface, .. } => {
                let fullscreen = surface
                    .native()
                    .as_native_window()
                    .is_some_and(|native| native.is_fullscreen());
                if fullscreen {
                    frame_style = FrameStyle::NoFrame;
                }
                let nest = fullscreen || (self.config.force_nesting() && parent.is_none());
                PendingBinding::Owned { surface, nest }
            }
            nested => nested,
        };

        let registry_rect = match &pending {
            PendingBinding::Owned { surface, .. } => Rect::from_origin_size(
                match placement.video_mode() {
                    Some(_) => Point::ZERO,
                    None => placement.normal_geometry().top_left(),
                },
                surface.native().surface_size(),
            ),
            PendingBinding::Nested { .. } => placement.normal_geometry(),
        };

        let id = self.windows.insert_with_key(|id| {
            let binding = match pending {
                PendingBinding::Owned {
                    surface,
                    nest: false,
                } => SurfaceBinding::Standalone(surface),
                PendingBinding::Owned {
                    surface,
                    nest: true,
                } => SurfaceBinding::NestRoot {
                    surface,
                    nest: Nest::new(),
                },
                PendingBinding::Nested { nest } => {
                    SurfaceBinding::Nested(NestedWindow::new(id, nest))
                }
            };
            Window {
                id,
                parent,
                binding,
                placement,
                style,
                frame_style,
                scrollbar_style: config.scrollbar_style(),
                decoration_style: DecorationStyle::from(style),
                title_text: title,
                title_bar: None,
                is_closed: false,
                ready_to_render: style.has(WindowStyle::INITIALLY_RENDERABLE),
                counted_enable: 0,
                enabled: true,
                visible: true,
                blocking: false,
                modality_released: false,
                entered_widget: None,
                focused_widget: None,
                dismissing: false,
                client: None,
                layouts: HashMap::new(),
                size_policy: None,
                fixed_size: None,
                minimum_size: None,
                style_subscribed: false,
                update_region: None,
                closed: Signal::new(),
                dismissing_children: Signal::new(),
            }
        });

        self.window_manager.add_window(id, registry_rect);
        self.init(id)?;

        tracing::info!(
            target: targets::WINDOW,
            ?id,
            ?parent,
            nested = self.get(id).is_some_and(Window::is_nested),
            nest = self.get(id).is_some_and(Window::is_nest),
            "window created"
        );
        Ok(id)
    }

    fn create_surface(
        &mut self,
        kind: SurfaceKind,
        parent: Option<NativeSurfaceId>,
        title: &str,
        style: WindowStyle,
    ) -> WindowResult<OwnedSurface> {
        let request = SurfaceRequest {
            kind,
            parent,
            title: title.to_string(),
            style,
        };
        let native = self.engine.create_window(&request)?;
        tracing::debug!(target: targets::NATIVE, id = %native.id(), ?kind, "native surface created");
        Ok(OwnedSurface::new(native))
    }

    /// Nest a new nested child of `parent` renders into.
    ///
    /// A stand-alone parent becomes a nest on demand; a nested parent hands
    /// over its own nest.
    fn nest_for_new_window(&mut self, parent: WindowId) -> WindowResult<WindowId> {
        if self.window(parent)?.is_nested() {
            return self.nest(parent);
        }
        let window = self.window_mut(parent)?;
        if !window.is_nest() {
            let placeholder = SurfaceBinding::Nested(NestedWindow::new(parent, parent));
            let binding = std::mem::replace(&mut window.binding, placeholder);
            window.binding = binding.into_nest_root();
            // Nest roots keep their enabled state locally.
            window.enabled = window.counted_enable >= 0;
            tracing::debug!(target: targets::NEST, window = ?parent, "stand-alone window became a nest");
        }
        Ok(parent)
    }

    fn init(&mut self, id: WindowId) -> WindowResult<()> {
        let style = self.window(id)?.style;

        if style.has(WindowStyle::INITIALLY_HIDDEN) {
            self.show(id, false)?;
        }

        if let Some(nest) = self.window(id)?.binding.nested().map(NestedWindow::nested_root) {
            if let Some(nest_window) = self.windows.get_mut(nest).and_then(|w| w.binding.nest_mut()) {
                nest_window.add(id);
                tracing::debug!(target: targets::NEST, window = ?id, ?nest, "nested window registered");
            }
        }

        self.update_modality(id, false)?;
        let window = self.window_mut(id)?;
        window.blocking = style.has_any(WindowStyle::MODAL | WindowStyle::APPLICATION_MODAL);

        if style.has(WindowStyle::TITLE_BAR) {
            window.title_bar = Some(TitleBar::new(&window.title_text));
        }
        window.style_subscribed = true;

        match self.native_surface(id).map(|surface| surface.surface_size()) {
            Ok(size) => self.window_manager.resize_window(id, size),
            Err(_) if self.window(id)?.is_nested() => self.layout_requested.emit(id),
            Err(_) => {}
        }

        let placement = self.window(id)?.placement.clone();
        if placement.video_mode().is_none() && placement.state() == WindowState::Normal {
            if placement.position_specified() {
                self.move_window(id, placement.normal_geometry().top_left())?;
            } else if style.has(WindowStyle::INITIALLY_CENTERED) && !style.has(WindowStyle::DIALOG) {
                self.center_on_parent(id, false)?;
            }
        }

        if let Ok(native) = self.native_window_mut(id) {
            native.initialisation_complete();
        }
        Ok(())
    }

    /// Close a window. Closing twice is a no-op.
    ///
    /// Detaches the window's widgets, lifts its modality, removes it from
    /// the registry and closes its surface. `closed` fires once, unless
    /// closing the surface destroyed the window.
    pub fn close(&mut self, id: WindowId) -> WindowResult<()> {
        let _span = PerfSpan::new("close_window");

        let window = self.window_mut(id)?;
        if window.is_closed {
            return Ok(());
        }
        window.layouts.clear();
        window.client = None;
        window.entered_widget = None;
        window.focused_widget = None;

        self.release_modality(id)?;
        if self.window_manager.has_window(id) {
            self.window_manager.remove_window(id);
        }
        if self.keyboard_grab == Some(id) {
            self.keyboard_grab = None;
        }

        let outcome = self
            .windows
            .get_mut(id)
            .and_then(|w| w.binding.owned_mut())
            .filter(|surface| surface.is_alive())
            .map(|surface| surface.native_mut().close());
        if outcome == Some(SurfaceCloseOutcome::DestroyOwner) {
            tracing::debug!(target: targets::WINDOW, ?id, "surface close destroyed its window");
            self.finish_destroy(id);
            return Ok(());
        }

        let Some(window) = self.windows.get_mut(id) else {
            return Ok(());
        };
        window.is_closed = true;
        tracing::info!(target: targets::WINDOW, ?id, "window closed");
        window.closed.emit(());
        Ok(())
    }

    /// Destroy a window: lift its modality, deregister and close it, then
    /// drop it. Its handle dangles afterwards.
    pub fn destroy_window(&mut self, id: WindowId) -> WindowResult<()> {
        let _span = PerfSpan::new("destroy_window");

        self.window(id)?;
        self.release_modality(id)?;
        if self.window_manager.has_window(id) {
            self.window_manager.remove_window(id);
        }
        self.close(id)?;
        self.finish_destroy(id);
        Ok(())
    }

    fn finish_destroy(&mut self, id: WindowId) {
        if self.release_modality(id).is_err() {
            return;
        }
        if self.window_manager.has_window(id) {
            self.window_manager.remove_window(id);
        }
        if self.keyboard_grab == Some(id) {
            self.keyboard_grab = None;
        }
        let Some(window) = self.windows.remove(id) else {
            return;
        };
        if let SurfaceBinding::Nested(nested) = window.binding {
            let nest = nested.nested_root();
            if let Some(nest_window) = self.windows.get_mut(nest).and_then(|w| w.binding.nest_mut()) {
                nest_window.remove(id);
                tracing::debug!(target: targets::NEST, window = ?id, ?nest, "nested window deregistered");
            }
        }
        tracing::info!(target: targets::WINDOW, ?id, "window destroyed");
    }

    /// Whether the window may close now.
    ///
    /// Strong windows only close while the event loop runs.
    pub fn can_close(&self, id: WindowId) -> WindowResult<bool> {
        let window = self.window(id)?;
        Ok(!(window.is_strong() && !self.running))
    }

    // =========================================================================
    // Relationships
    // =========================================================================

    /// The window's owner, if it is still alive.
    pub fn parent_window(&self, id: WindowId) -> WindowResult<WindowId> {
        match self.window(id)?.parent {
            Some(parent) if self.windows.contains_key(parent) => Ok(parent),
            _ => Err(WindowError::NoParentWindow),
        }
    }

    /// Whether the window has a live owner; with `same_surface`, one that
    /// renders into the same surface.
    pub fn has_parent_window(&self, id: WindowId, same_surface: bool) -> bool {
        let Ok(parent) = self.parent_window(id) else {
            return false;
        };
        if !same_surface {
            return true;
        }
        match (self.surface_owner(id), self.surface_owner(parent)) {
            (Ok(ours), Ok(theirs)) => ours == theirs,
            _ => false,
        }
    }

    pub fn is_parent_of(&self, parent: WindowId, child: WindowId) -> bool {
        self.parent_window(child).is_ok_and(|p| p == parent)
    }

    /// Whether `owner` is a strict ancestor of `child` in the ownership chain.
    pub fn is_owner_of(&self, owner: WindowId, child: WindowId) -> bool {
        if owner == child {
            return false;
        }
        let mut current = child;
        while let Ok(parent) = self.parent_window(current) {
            if parent == owner {
                return true;
            }
            current = parent;
        }
        false
    }

    /// Top of the window's ownership chain.
    pub fn ultimate_ancestor(&self, id: WindowId) -> WindowId {
        let mut current = id;
        while let Ok(parent) = self.parent_window(current) {
            current = parent;
        }
        current
    }

    /// The nest this window belongs to: itself if it is one.
    pub fn nest(&self, id: WindowId) -> WindowResult<WindowId> {
        let window = self.window(id)?;
        if window.is_nest() {
            return Ok(id);
        }
        if let Some(nested) = window.binding.nested() {
            let root = nested.nested_root();
            return if self.windows.get(root).is_some_and(Window::is_nest) {
                Ok(root)
            } else {
                Err(WindowError::NotInNest)
            };
        }
        let mut current = id;
        while self.has_parent_window(current, true) {
            current = self.parent_window(current)?;
            if self.windows.get(current).is_some_and(Window::is_nest) {
                return Ok(current);
            }
        }
        Err(WindowError::NotInNest)
    }

    pub fn as_nest(&self, id: WindowId) -> WindowResult<&Nest> {
        self.window(id)?.binding.nest().ok_or(WindowError::NotANest)
    }

    pub fn as_nested(&self, id: WindowId) -> WindowResult<&NestedWindow> {
        self.window(id)?.binding.nested().ok_or(WindowError::NotNested)
    }

    /// Nearest owner of a nested window that is itself nested.
    pub fn nested_parent(&self, id: WindowId) -> WindowResult<WindowId> {
        self.as_nested(id)?;
        match self.parent_window(id) {
            Ok(parent) if self.windows.get(parent).is_some_and(Window::is_nested) => Ok(parent),
            _ => Err(WindowError::NoNestedParent),
        }
    }

    // =========================================================================
    // Surfaces
    // =========================================================================

    pub fn is_surface(&self, id: WindowId) -> bool {
        self.windows.get(id).is_some_and(Window::is_surface)
    }

    /// Owns a surface or renders into an ancestor's.
    pub fn has_surface(&self, id: WindowId) -> bool {
        self.surface_owner(id).is_ok()
    }

    /// Window owning the surface this window renders into.
    pub fn surface_owner(&self, id: WindowId) -> WindowResult<WindowId> {
        match &self.window(id)?.binding {
            SurfaceBinding::Standalone(_) | SurfaceBinding::NestRoot { .. } => Ok(id),
            SurfaceBinding::Nested(nested) => {
                let root = nested.nested_root();
                if self.windows.get(root).is_some_and(Window::is_surface) {
                    Ok(root)
                } else {
                    Err(WindowError::NoSurface)
                }
            }
        }
    }

    /// Owns a surface the backend has not destroyed.
    pub fn has_native_surface(&self, id: WindowId) -> bool {
        self.windows
            .get(id)
            .and_then(|w| w.binding.owned())
            .is_some_and(OwnedSurface::is_alive)
    }

    pub fn native_surface(&self, id: WindowId) -> WindowResult<&dyn NativeSurface> {
        match self.window(id)?.binding.owned() {
            Some(surface) if surface.is_alive() => Ok(surface.native()),
            _ => Err(WindowError::NoNativeSurface),
        }
    }

    pub fn native_surface_mut(&mut self, id: WindowId) -> WindowResult<&mut dyn NativeSurface> {
        match self.window_mut(id)?.binding.owned_mut() {
            Some(surface) if surface.is_alive() => Ok(surface.native_mut()),
            _ => Err(WindowError::NoNativeSurface),
        }
    }

    pub fn has_native_window(&self, id: WindowId) -> bool {
        self.native_window(id).is_ok()
    }

    pub fn native_window(&self, id: WindowId) -> WindowResult<&dyn NativeWindow> {
        let surface = self.native_surface(id)?;
        if surface.surface_type() != SurfaceType::Window {
            return Err(WindowError::NoNativeWindow);
        }
        surface.as_native_window().ok_or(WindowError::NoNativeWindow)
    }

    pub fn native_window_mut(&mut self, id: WindowId) -> WindowResult<&mut dyn NativeWindow> {
        let surface = self.native_surface_mut(id)?;
        if surface.surface_type() != SurfaceType::Window {
            return Err(WindowError::NoNativeWindow);
        }
        surface.as_native_window_mut().ok_or(WindowError::NoNativeWindow)
    }

    // =========================================================================
    // Native window state
    // =========================================================================

    /// Show or hide the window. Returns whether visibility changed.
    pub fn show(&mut self, id: WindowId, visible: bool) -> WindowResult<bool> {
        let window = self.window_mut(id)?;
        if window.visible == visible {
            return Ok(false);
        }
        window.visible = visible;
        if let Ok(native) = self.native_window_mut(id) {
            if visible {
                native.show();
            } else {
                native.hide();
            }
        }
        tracing::debug!(target: targets::WINDOW, ?id, visible, "visibility changed");
        Ok(true)
    }

    pub fn is_visible(&self, id: WindowId) -> bool {
        self.windows.get(id).is_some_and(Window::is_visible)
    }

    /// Activate the window, showing it first if hidden.
    pub fn activate(&mut self, id: WindowId) -> WindowResult<()> {
        if !self.window(id)?.visible {
            self.show(id, true)?;
        }
        if let Ok(native) = self.native_window_mut(id) {
            native.activate();
        }
        Ok(())
    }

    pub fn is_active(&self, id: WindowId) -> bool {
        self.native_window(id).is_ok_and(|native| native.is_active())
    }

    pub fn iconize(&mut self, id: WindowId) -> WindowResult<()> {
        if let Ok(native) = self.native_window_mut(id) {
            native.iconize();
        }
        Ok(())
    }

    pub fn is_iconic(&self, id: WindowId) -> bool {
        self.native_window(id).is_ok_and(|native| native.is_iconic())
    }

    pub fn maximize(&mut self, id: WindowId) -> WindowResult<()> {
        if let Ok(native) = self.native_window_mut(id) {
            native.maximize();
        }
        Ok(())
    }

    pub fn is_maximized(&self, id: WindowId) -> bool {
        self.native_window(id).is_ok_and(|native| native.is_maximized())
    }

    pub fn restore(&mut self, id: WindowId) -> WindowResult<()> {
        if let Ok(native) = self.native_window_mut(id) {
            native.restore();
        }
        Ok(())
    }

    pub fn is_restored(&self, id: WindowId) -> bool {
        self.native_window(id).is_ok_and(|native| native.is_restored())
    }

    /// Switch the window's native window to fullscreen.
    pub fn enter_fullscreen(&mut self, id: WindowId, mode: VideoMode) -> WindowResult<()> {
        self.native_window_mut(id)?.enter_fullscreen(mode);
        Ok(())
    }

    pub fn is_fullscreen(&self, id: WindowId) -> bool {
        self.native_window(id).is_ok_and(|native| native.is_fullscreen())
    }

    pub fn set_title_text(&mut self, id: WindowId, title: &str) -> WindowResult<()> {
        let window = self.window_mut(id)?;
        if window.title_text == title {
            return Ok(());
        }
        window.title_text = title.to_string();
        if let Some(title_bar) = window.title_bar.as_mut() {
            title_bar.set_title(title);
        }
        if let Ok(native) = self.native_window_mut(id) {
            native.set_title_text(title);
        }
        Ok(())
    }

    /// Native frame for surface owners, a fixed border otherwise.
    pub fn border(&self, id: WindowId) -> WindowResult<Padding> {
        if self.window(id)?.is_surface() {
            Ok(self.native_window(id)?.border_thickness())
        } else {
            Ok(NESTED_BORDER)
        }
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    pub fn move_window(&mut self, id: WindowId, position: Point) -> WindowResult<()> {
        self.window(id)?;
        self.window_manager.move_window(id, position);
        Ok(())
    }

    /// Resize the window and schedule a full repaint.
    pub fn resize_window(&mut self, id: WindowId, size: Size) -> WindowResult<()> {
        self.window(id)?;
        self.window_manager.resize_window(id, size);
        self.update(id, None)?;
        Ok(())
    }

    pub fn window_rect(&self, id: WindowId) -> Rect {
        self.window_manager.window_rect(id)
    }

    pub fn window_position(&self, id: WindowId) -> WindowResult<Point> {
        self.window(id)?;
        Ok(self.window_manager.window_rect(id).top_left())
    }

    /// Pointer position relative to the window.
    pub fn mouse_position(&self, id: WindowId) -> Point {
        self.window_manager.mouse_position(id)
    }

    /// Centre the window on the desktop.
    pub fn center(&mut self, id: WindowId, set_minimum_size: bool) -> WindowResult<()> {
        if set_minimum_size {
            let size = self.minimum_size(id)?;
            self.resize_window(id, size)?;
        }
        let desktop = self.window_manager.desktop_rect(id);
        let ours = self.window_manager.window_rect(id);
        self.move_window(id, Point::from((desktop.size - ours.size) / 2.0))
    }

    /// Centre the window on its owner, kept on the desktop. Windows without
    /// an owner are centred on the desktop.
    pub fn center_on_parent(&mut self, id: WindowId, set_minimum_size: bool) -> WindowResult<()> {
        let Ok(parent) = self.parent_window(id) else {
            return self.center(id, set_minimum_size);
        };
        if set_minimum_size {
            let size = self.minimum_size(id)?;
            self.resize_window(id, size)?;
        }
        let desktop = self.window_manager.desktop_rect(id);
        let parent_rect = self.window_manager.window_rect(parent);
        let ours = self.window_manager.window_rect(id);
        let mut position = Point::from((parent_rect.size - ours.size) / 2.0) + parent_rect.top_left();
        position.x = position.x.max(0.0);
        position.y = position.y.max(0.0);
        if position.x + ours.width() > desktop.right() {
            position.x = desktop.right() - ours.width();
        }
        if position.y + ours.height() > desktop.bottom() {
            position.y = desktop.bottom() - ours.height();
        }
        self.move_window(id, position.ceil())
    }

    /// The window's rectangle corrected to lie on the desktop.
    pub fn corrected_popup_rect(&self, id: WindowId) -> Rect {
        corrected_popup_rect(
            self.window_manager.desktop_rect(id),
            self.window_manager.window_rect(id),
        )
    }

    /// Move and resize a popup so that it lies on the desktop.
    pub fn correct_popup_rect(&mut self, id: WindowId) -> WindowResult<()> {
        let corrected = self.corrected_popup_rect(id);
        self.move_window(id, corrected.top_left())?;
        self.resize_window(id, corrected.size)
    }

    pub fn placement(&self, id: WindowId) -> WindowResult<&WindowPlacement> {
        Ok(&self.window(id)?.placement)
    }

    pub fn set_placement(&mut self, id: WindowId, placement: WindowPlacement) -> WindowResult<()> {
        self.window_mut(id)?.placement = placement;
        Ok(())
    }

    /// Explicit minimum size, else one derived from the window's style.
    pub fn minimum_size(&self, id: WindowId) -> WindowResult<Size> {
        let window = self.window(id)?;
        if let Some(size) = window.minimum_size {
            return Ok(size);
        }
        if !window.style.has(WindowStyle::DIALOG) && window.style.has(WindowStyle::TITLE_BAR) {
            return Ok(self.config.titled_minimum_size());
        }
        Ok(self.layout_minimum_size(window))
    }

    fn layout_minimum_size(&self, window: &Window) -> Size {
        if window.style.has(WindowStyle::RESIZE) {
            self.config.window_padding().size()
        } else {
            Size::ZERO
        }
    }

    /// Hit-test a point in window coordinates. The client area reports
    /// [`WidgetPart::Grab`] so that it drags the window by default.
    pub fn hit_test(&self, id: WindowId, position: Point) -> WindowResult<WidgetPart> {
        let part = match self.base_hit_test(id, position)? {
            WidgetPart::Client => WidgetPart::Grab,
            part => part,
        };
        Ok(part)
    }

    fn base_hit_test(&self, id: WindowId, position: Point) -> WindowResult<WidgetPart> {
        let bounds = Rect::from_size(self.window_manager.window_rect(id).size);
        if !bounds.contains(position) {
            return Ok(WidgetPart::Nowhere);
        }
        let title_bar = self.widget_part_rect(id, WidgetPart::TitleBar)?;
        if title_bar.contains(position) {
            return Ok(WidgetPart::TitleBar);
        }
        let border = self.border(id).unwrap_or(NESTED_BORDER);
        let client = Rect::new(
            border.left,
            border.top,
            bounds.width() - border.left - border.right,
            bounds.height() - border.top - border.bottom,
        );
        if client.contains(position) {
            Ok(WidgetPart::Client)
        } else {
            Ok(WidgetPart::Border)
        }
    }

    /// Rectangle of a window part in window coordinates; empty if absent.
    pub fn widget_part_rect(&self, id: WindowId, part: WidgetPart) -> WindowResult<Rect> {
        let window = self.window(id)?;
        match part {
            WidgetPart::TitleBar if window.title_bar.is_some() => {
                let border = self.border(id).unwrap_or(NESTED_BORDER);
                let width = self.window_manager.window_rect(id).width();
                Ok(Rect::new(
                    border.left,
                    border.top,
                    (width - border.left - border.right).max(0.0),
                    TITLE_BAR_HEIGHT,
                ))
            }
            _ => Ok(Rect::ZERO),
        }
    }

    /// Children of the title bar and status bar layouts never scroll.
    pub fn scrolling_disposition(
        &self,
        id: WindowId,
        child: WidgetId,
    ) -> WindowResult<ScrollingDisposition> {
        let window = self.window(id)?;
        let fixed = [StandardLayout::TitleBar, StandardLayout::StatusBar]
            .into_iter()
            .any(|layout| window.layout(layout).contains(&child));
        Ok(if fixed {
            ScrollingDisposition::DontScrollChildWidget
        } else {
            ScrollingDisposition::ScrollChildWidget
        })
    }

    // =========================================================================
    // Keyboard grab and style
    // =========================================================================

    pub fn grab_keyboard(&mut self, id: WindowId) -> WindowResult<()> {
        self.window(id)?;
        self.keyboard_grab = Some(id);
        Ok(())
    }

    /// Release the grab if `id` holds it.
    pub fn ungrab_keyboard(&mut self, id: WindowId) -> bool {
        if self.keyboard_grab == Some(id) {
            self.keyboard_grab = None;
            true
        } else {
            false
        }
    }

    pub fn is_keyboard_grabbed_by(&self, id: WindowId) -> bool {
        self.keyboard_grab == Some(id)
    }

    pub fn keyboard_grabber(&self) -> Option<WindowId> {
        self.keyboard_grab.filter(|id| self.windows.contains_key(*id))
    }

    /// Notify windows that the application style changed.
    ///
    /// Colour changes invalidate every subscribed window's whole surface.
    pub fn current_style_changed(&mut self, aspect: StyleAspect) {
        self.style_changed.emit(aspect);
        if !aspect.has(StyleAspect::COLOR) {
            return;
        }
        for window in self.windows.values_mut() {
            if !window.style_subscribed {
                continue;
            }
            if let Some(surface) = window.binding.owned_mut().filter(|s| s.is_alive()) {
                let size = surface.native().surface_size();
                surface.native_mut().invalidate(Rect::from_size(size));
            }
        }
    }
}

impl std::fmt::Debug for WindowSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowSystem")
            .field("config", &self.config)
            .field("windows", &self.windows.len())
            .field("registered", &self.window_manager.window_count())
            .field("keyboard_grab", &self.keyboard_grab)
            .field("running", &self.running)
            .finish()
    }
}

/// Style of a window that takes over a display.
fn fullscreen_style(style: WindowStyle) -> WindowStyle {
    (style | WindowStyle::FULLSCREEN)
        .without(WindowStyle::RESIZE | WindowStyle::MINIMIZE_BOX | WindowStyle::MAXIMIZE_BOX)
}

static_assertions::assert_impl_all!(WindowSystem: Send);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::headless::{HEADLESS_BORDER, NativeEvent};

    fn centered_child(size: Size) -> WindowConfig {
        WindowConfig::new("child")
            .with_style(WindowStyle::DEFAULT | WindowStyle::INITIALLY_CENTERED)
            .with_size(size)
    }

    #[test]
    fn test_center_on_parent() {
        let (mut system, _) = WindowSystem::headless(WindowSystemConfig::default());
        let main = system
            .create_window(WindowConfig::new("main").with_position(Point::new(100.0, 100.0)))
            .unwrap();
        let child = system
            .create_window(centered_child(Size::new(200.0, 100.0)).with_parent(main))
            .unwrap();

        assert_eq!(system.window_position(child), Ok(Point::new(400.0, 350.0)));
    }

    #[test]
    fn test_center_on_parent_stays_on_desktop() {
        let (mut system, _) = WindowSystem::headless(WindowSystemConfig::default());
        let main = system
            .create_window(WindowConfig::new("main").with_position(Point::new(1700.0, 900.0)))
            .unwrap();
        let child = system
            .create_window(centered_child(Size::new(200.0, 100.0)).with_parent(main))
            .unwrap();

        assert_eq!(system.window_position(child), Ok(Point::new(1720.0, 980.0)));
    }

    #[test]
    fn test_hit_test_parts() {
        let (mut system, _) = WindowSystem::headless(WindowSystemConfig::default());
        let window = system.create_window(WindowConfig::new("main")).unwrap();

        assert_eq!(system.hit_test(window, Point::new(10.0, 10.0)), Ok(WidgetPart::TitleBar));
        assert_eq!(system.hit_test(window, Point::new(400.0, 300.0)), Ok(WidgetPart::Grab));
        assert_eq!(system.hit_test(window, Point::new(0.5, 300.0)), Ok(WidgetPart::Border));
        assert_eq!(system.hit_test(window, Point::new(900.0, 10.0)), Ok(WidgetPart::Nowhere));
        assert_eq!(
            system.widget_part_rect(window, WidgetPart::TitleBar),
            Ok(Rect::new(1.0, 1.0, 798.0, TITLE_BAR_HEIGHT))
        );
    }

    #[test]
    fn test_minimum_size_by_style() {
        let (mut system, _) = WindowSystem::headless(WindowSystemConfig::default());
        let titled = system.create_window(WindowConfig::new("titled")).unwrap();
        let tool = system
            .create_window(WindowConfig::new("tool").with_style(WindowStyle::TOOL | WindowStyle::RESIZE))
            .unwrap();
        let bare = system
            .create_window(WindowConfig::new("bare").with_style(WindowStyle::NO_DECORATION))
            .unwrap();

        assert_eq!(system.minimum_size(titled), Ok(Size::new(200.0, 200.0)));
        assert_eq!(system.minimum_size(tool), Ok(Size::new(8.0, 8.0)));
        assert_eq!(system.minimum_size(bare), Ok(Size::ZERO));

        system.window_mut(bare).unwrap().set_minimum_size(Size::new(50.0, 40.0));
        assert_eq!(system.minimum_size(bare), Ok(Size::new(50.0, 40.0)));
    }

    #[test]
    fn test_strong_windows_close_only_while_running() {
        let (mut system, _) = WindowSystem::headless(WindowSystemConfig::default());
        let strong = system.create_window(WindowConfig::new("strong")).unwrap();
        let weak = system
            .create_window(WindowConfig::new("weak").with_style_flags(WindowStyle::WEAK))
            .unwrap();

        assert_eq!(system.can_close(strong), Ok(false));
        assert_eq!(system.can_close(weak), Ok(true));
        system.set_running(true);
        assert_eq!(system.can_close(strong), Ok(true));
    }

    #[test]
    fn test_initial_iconized_placement_is_not_implemented() {
        let (mut system, engine) = WindowSystem::headless(WindowSystemConfig::default());
        let result = system.create_window(WindowConfig::new("icon").with_state(WindowState::Iconized));

        assert!(matches!(result, Err(WindowError::NotYetImplemented(_))));
        assert_eq!(engine.surfaces_created(), 0);
    }

    #[test]
    fn test_fullscreen_display_makes_top_level_windows_fullscreen() {
        let mode = VideoMode::new(1280, 720, 32);
        let config = WindowSystemConfig::default().with_fullscreen_display(mode);
        let (mut system, engine) = WindowSystem::headless(config);
        let root = system.create_window(WindowConfig::new("root")).unwrap();

        assert!(system.is_fullscreen(root));
        assert!(system.window(root).unwrap().is_nest());
        assert!(system.window(root).unwrap().style().has(WindowStyle::FULLSCREEN));
        assert_eq!(system.window(root).unwrap().frame_style(), FrameStyle::NoFrame);
        assert!(matches!(
            engine.events().first(),
            Some((_, NativeEvent::Created(SurfaceRequest { kind: SurfaceKind::Fullscreen(m), .. }))) if *m == mode
        ));
    }

    #[test]
    fn test_child_surface_is_parented_to_owner_surface() {
        let (mut system, engine) = WindowSystem::headless(WindowSystemConfig::default());
        let main = system.create_window(WindowConfig::new("main")).unwrap();
        let main_surface = system.native_surface(main).unwrap().id();
        let child = system.create_window(WindowConfig::child_of(main)).unwrap();
        let child_surface = system.native_surface(child).unwrap().id();

        let created = engine.events_for(child_surface);
        assert!(matches!(
            created.first(),
            Some(NativeEvent::Created(request)) if request.parent == Some(main_surface)
        ));
    }

    #[test]
    fn test_close_releases_keyboard_grab() {
        let (mut system, _) = WindowSystem::headless(WindowSystemConfig::default());
        let window = system.create_window(WindowConfig::new("main")).unwrap();
        system.grab_keyboard(window).unwrap();
        assert_eq!(system.keyboard_grabber(), Some(window));

        system.close(window).unwrap();
        assert_eq!(system.keyboard_grabber(), None);
    }

    #[test]
    fn test_nested_relationships() {
        let config = WindowSystemConfig::default().with_force_nesting(true);
        let (mut system, _) = WindowSystem::headless(config);
        let root = system.create_window(WindowConfig::new("root")).unwrap();
        let menu = system.create_window(WindowConfig::child_of(root)).unwrap();
        let submenu = system.create_window(WindowConfig::child_of(menu)).unwrap();

        assert_eq!(system.nested_parent(submenu), Ok(menu));
        assert_eq!(system.nested_parent(menu), Err(WindowError::NoNestedParent));
        assert_eq!(system.nested_parent(root), Err(WindowError::NotNested));
        assert_eq!(system.nest(submenu), Ok(root));
        assert_eq!(system.border(root), Ok(HEADLESS_BORDER));
        assert_eq!(system.border(menu), Ok(NESTED_BORDER));
        assert!(system.has_parent_window(submenu, true));

        system.destroy_window(submenu).unwrap();
        assert!(!system.contains(submenu));
        assert!(!system.as_nest(root).unwrap().contains(submenu));
        assert_eq!(system.as_nest(root).unwrap().nested_window_count(), 1);
    }

    #[test]
    fn test_color_change_invalidates_subscribed_surfaces() {
        let (mut system, engine) = WindowSystem::headless(WindowSystemConfig::default());
        let window = system.create_window(WindowConfig::new("main")).unwrap();
        let surface = system.native_surface(window).unwrap().id();
        engine.clear_events();

        system.current_style_changed(StyleAspect::FONT);
        assert!(engine.events_for(surface).is_empty());

        system.current_style_changed(StyleAspect::COLOR);
        assert_eq!(
            engine.events_for(surface),
            vec![NativeEvent::Invalidate(Rect::new(0.0, 0.0, 800.0, 600.0))]
        );
    }

    #[test]
    fn test_nested_windows_request_layout() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let config = WindowSystemConfig::default().with_force_nesting(true);
        let (mut system, _) = WindowSystem::headless(config);
        let requests = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&requests);
        system.layout_requested.connect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let root = system.create_window(WindowConfig::new("root")).unwrap();
        assert_eq!(requests.load(Ordering::SeqCst), 0);

        system.create_window(WindowConfig::child_of(root)).unwrap();
        assert_eq!(requests.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_nested_style_turns_stand_alone_parent_into_nest() {
        let (mut system, _) = WindowSystem::headless(WindowSystemConfig::default());
        let main = system.create_window(WindowConfig::new("main")).unwrap();
        assert!(!system.window(main).unwrap().is_nest());

        let first = system
            .create_window(WindowConfig::child_of(main).with_style_flags(WindowStyle::NESTED))
            .unwrap();
        let second = system
            .create_window(WindowConfig::child_of(first).with_style_flags(WindowStyle::NESTED))
            .unwrap();

        assert!(system.window(main).unwrap().is_nest());
        assert!(system.is_surface(main));
        assert_eq!(system.nest(second), Ok(main));
        assert_eq!(system.as_nest(main).unwrap().nested_window_count(), 2);
        assert!(system.window_enabled(main));
    }
}
