//! A headless backend that records native calls instead of making them.
//!
//! [`HeadlessEngine`] creates [`HeadlessSurface`]s that keep their state in
//! memory and append every call to a shared event log. Cloned engines share
//! the log, so a test can keep one handle while the [`WindowSystem`] owns
//! another.
//!
//! [`WindowSystem`]: super::WindowSystem

use std::collections::HashMap;
use std::sync::Arc;

use casement_core::logging::targets;
use casement_core::{Liveness, LivenessObserver, Padding, Rect, Size};
use parking_lot::Mutex;

use super::native::{
    NativeSurface, NativeSurfaceError, NativeSurfaceId, NativeWindow, RenderingEngine,
    SurfaceCloseOutcome, SurfaceKind, SurfaceRequest, SurfaceType,
};
use super::placement::VideoMode;

/// Border reported by headless windows.
pub const HEADLESS_BORDER: Padding = Padding::uniform(1.0);

/// Frame rate reported by headless windows.
pub const HEADLESS_FPS: f64 = 60.0;

/// A native call recorded by the headless backend.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeEvent {
    Created(SurfaceRequest),
    Show,
    Hide,
    Activate,
    Iconize,
    Maximize,
    Restore,
    EnterFullscreen(VideoMode),
    Enable(bool),
    SetTitle(String),
    Invalidate(Rect),
    PauseRendering,
    ResumeRendering,
    InitialisationComplete,
    Close,
}

#[derive(Default)]
struct HeadlessState {
    next_id: u64,
    events: Vec<(NativeSurfaceId, NativeEvent)>,
    liveness: HashMap<NativeSurfaceId, Liveness>,
    active: Option<NativeSurfaceId>,
    fail_next_creation: Option<String>,
    destroy_owner_on_close: bool,
}

impl HeadlessState {
    fn record(&mut self, id: NativeSurfaceId, event: NativeEvent) {
        tracing::trace!(target: targets::NATIVE, %id, ?event, "headless call");
        self.events.push((id, event));
    }
}

/// Rendering engine for tests and tools that run without a display.
#[derive(Clone, Default)]
pub struct HeadlessEngine {
    state: Arc<Mutex<HeadlessState>>,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded call, in order.
    pub fn events(&self) -> Vec<(NativeSurfaceId, NativeEvent)> {
        self.state.lock().events.clone()
    }

    /// Recorded calls for one surface.
    pub fn events_for(&self, id: NativeSurfaceId) -> Vec<NativeEvent> {
        self.state
            .lock()
            .events
            .iter()
            .filter(|(surface, _)| *surface == id)
            .map(|(_, event)| event.clone())
            .collect()
    }

    pub fn clear_events(&self) {
        self.state.lock().events.clear();
    }

    /// Number of surfaces created so far.
    pub fn surfaces_created(&self) -> usize {
        self.state
            .lock()
            .events
            .iter()
            .filter(|(_, event)| matches!(event, NativeEvent::Created(_)))
            .count()
    }

    /// The surface that was activated last.
    pub fn active_surface(&self) -> Option<NativeSurfaceId> {
        self.state.lock().active
    }

    /// Make the next surface creation fail with `reason`.
    pub fn fail_next_creation(&self, reason: impl Into<String>) {
        self.state.lock().fail_next_creation = Some(reason.into());
    }

    /// Make closing a surface tear down its owning window.
    pub fn set_destroy_owner_on_close(&self, destroy: bool) {
        self.state.lock().destroy_owner_on_close = destroy;
    }

    /// Destroy a surface as if the platform had done it.
    pub fn destroy_surface(&self, id: NativeSurfaceId) {
        if let Some(liveness) = self.state.lock().liveness.get(&id) {
            liveness.mark_destroyed();
        }
    }
}

impl std::fmt::Debug for HeadlessEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("HeadlessEngine")
            .field("surfaces", &state.liveness.len())
            .field("events", &state.events.len())
            .finish()
    }
}

impl RenderingEngine for HeadlessEngine {
    fn create_window(
        &mut self,
        request: &SurfaceRequest,
    ) -> Result<Box<dyn NativeSurface>, NativeSurfaceError> {
        let mut state = self.state.lock();
        if let Some(reason) = state.fail_next_creation.take() {
            return Err(NativeSurfaceError::CreationFailed(reason));
        }
        state.next_id += 1;
        let id = NativeSurfaceId(state.next_id);
        let liveness = Liveness::new();
        let observer = liveness.observer();
        state.liveness.insert(id, liveness);
        state.record(id, NativeEvent::Created(request.clone()));

        let (size, fullscreen) = match request.kind {
            SurfaceKind::Windowed { size, .. } => (size, false),
            SurfaceKind::Fullscreen(mode) => (mode.size(), true),
        };
        Ok(Box::new(HeadlessSurface {
            id,
            state: Arc::clone(&self.state),
            liveness: observer,
            size,
            title: request.title.clone(),
            visible: true,
            enabled: true,
            iconic: false,
            maximized: false,
            fullscreen,
            paused: 0,
        }))
    }
}

/// A surface created by [`HeadlessEngine`].
pub struct HeadlessSurface {
    id: NativeSurfaceId,
    state: Arc<Mutex<HeadlessState>>,
    liveness: LivenessObserver,
    size: Size,
    title: String,
    visible: bool,
    enabled: bool,
    iconic: bool,
    maximized: bool,
    fullscreen: bool,
    paused: u32,
}

impl HeadlessSurface {
    fn record(&self, event: NativeEvent) {
        self.state.lock().record(self.id, event);
    }

    /// Number of outstanding rendering pauses.
    pub fn pause_depth(&self) -> u32 {
        self.paused
    }
}

impl NativeSurface for HeadlessSurface {
    fn id(&self) -> NativeSurfaceId {
        self.id
    }

    fn surface_type(&self) -> SurfaceType {
        SurfaceType::Window
    }

    fn liveness(&self) -> LivenessObserver {
        self.liveness.clone()
    }

    fn surface_size(&self) -> Size {
        self.size
    }

    fn invalidate(&mut self, rect: Rect) {
        self.record(NativeEvent::Invalidate(rect));
    }

    fn pause_rendering(&mut self) {
        self.paused += 1;
        self.record(NativeEvent::PauseRendering);
    }

    fn resume_rendering(&mut self) {
        self.paused = self.paused.saturating_sub(1);
        self.record(NativeEvent::ResumeRendering);
    }

    fn close(&mut self) -> SurfaceCloseOutcome {
        let mut state = self.state.lock();
        state.record(self.id, NativeEvent::Close);
        if state.active == Some(self.id) {
            state.active = None;
        }
        if let Some(liveness) = state.liveness.remove(&self.id) {
            liveness.mark_destroyed();
        }
        if state.destroy_owner_on_close {
            SurfaceCloseOutcome::DestroyOwner
        } else {
            SurfaceCloseOutcome::Closed
        }
    }

    fn as_native_window(&self) -> Option<&dyn NativeWindow> {
        Some(self)
    }

    fn as_native_window_mut(&mut self) -> Option<&mut dyn NativeWindow> {
        Some(self)
    }
}

impl NativeWindow for HeadlessSurface {
    fn show(&mut self) {
        self.visible = true;
        self.record(NativeEvent::Show);
    }

    fn hide(&mut self) {
        self.visible = false;
        self.record(NativeEvent::Hide);
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn activate(&mut self) {
        let mut state = self.state.lock();
        state.active = Some(self.id);
        state.record(self.id, NativeEvent::Activate);
    }

    fn is_active(&self) -> bool {
        self.state.lock().active == Some(self.id)
    }

    fn iconize(&mut self) {
        self.iconic = true;
        self.maximized = false;
        self.record(NativeEvent::Iconize);
    }

    fn is_iconic(&self) -> bool {
        self.iconic
    }

    fn maximize(&mut self) {
        self.maximized = true;
        self.iconic = false;
        self.record(NativeEvent::Maximize);
    }

    fn is_maximized(&self) -> bool {
        self.maximized
    }

    fn restore(&mut self) {
        self.iconic = false;
        self.maximized = false;
        self.fullscreen = false;
        self.record(NativeEvent::Restore);
    }

    fn is_restored(&self) -> bool {
        !self.iconic && !self.maximized && !self.fullscreen
    }

    fn enter_fullscreen(&mut self, mode: VideoMode) {
        self.fullscreen = true;
        self.size = mode.size();
        self.record(NativeEvent::EnterFullscreen(mode));
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn enable(&mut self, enable: bool) {
        self.enabled = enable;
        self.record(NativeEvent::Enable(enable));
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_title_text(&mut self, title: &str) {
        self.title = title.to_string();
        self.record(NativeEvent::SetTitle(self.title.clone()));
    }

    fn title_text(&self) -> &str {
        &self.title
    }

    fn fps(&self) -> f64 {
        if self.paused > 0 { 0.0 } else { HEADLESS_FPS }
    }

    fn potential_fps(&self) -> f64 {
        HEADLESS_FPS
    }

    fn border_thickness(&self) -> Padding {
        HEADLESS_BORDER
    }

    fn initialisation_complete(&mut self) {
        self.record(NativeEvent::InitialisationComplete);
    }
}

static_assertions::assert_impl_all!(HeadlessEngine: Send, Sync);
static_assertions::assert_impl_all!(HeadlessSurface: Send);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::WindowStyle;
    use casement_core::Point;

    fn request() -> SurfaceRequest {
        SurfaceRequest {
            kind: SurfaceKind::Windowed {
                position: Point::new(10.0, 10.0),
                size: Size::new(640.0, 480.0),
            },
            parent: None,
            title: "Headless".into(),
            style: WindowStyle::DEFAULT,
        }
    }

    #[test]
    fn test_create_and_record() {
        let mut engine = HeadlessEngine::new();
        let observer = engine.clone();
        let mut surface = engine.create_window(&request()).unwrap();
        assert_eq!(surface.surface_size(), Size::new(640.0, 480.0));
        assert!(surface.liveness().is_alive());

        let window = surface.as_native_window_mut().unwrap();
        window.set_title_text("Renamed");
        window.enable(false);
        assert_eq!(window.title_text(), "Renamed");
        assert!(!window.is_enabled());

        let events = observer.events_for(surface.id());
        assert!(matches!(events[0], NativeEvent::Created(_)));
        assert_eq!(events[1], NativeEvent::SetTitle("Renamed".into()));
        assert_eq!(events[2], NativeEvent::Enable(false));
        assert_eq!(observer.surfaces_created(), 1);
    }

    #[test]
    fn test_destroy_surface_kills_liveness() {
        let mut engine = HeadlessEngine::new();
        let surface = engine.create_window(&request()).unwrap();
        let liveness = surface.liveness();
        engine.destroy_surface(surface.id());
        assert!(!liveness.is_alive());
    }

    #[test]
    fn test_close_outcome_and_failure() {
        let mut engine = HeadlessEngine::new();
        let mut surface = engine.create_window(&request()).unwrap();
        assert_eq!(surface.close(), SurfaceCloseOutcome::Closed);
        assert!(!surface.liveness().is_alive());

        engine.set_destroy_owner_on_close(true);
        let mut surface = engine.create_window(&request()).unwrap();
        assert_eq!(surface.close(), SurfaceCloseOutcome::DestroyOwner);

        engine.fail_next_creation("no display");
        assert!(engine.create_window(&request()).is_err());
        assert!(engine.create_window(&request()).is_ok());
    }

    #[test]
    fn test_activation_is_exclusive() {
        let mut engine = HeadlessEngine::new();
        let mut first = engine.create_window(&request()).unwrap();
        let mut second = engine.create_window(&request()).unwrap();
        first.as_native_window_mut().unwrap().activate();
        second.as_native_window_mut().unwrap().activate();
        assert!(!first.as_native_window().unwrap().is_active());
        assert!(second.as_native_window().unwrap().is_active());
        assert_eq!(engine.active_surface(), Some(second.id()));
    }
}
