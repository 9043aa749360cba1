//! Logging facilities for Casement.
//!
//! Casement uses the `tracing` crate for instrumentation. The library never
//! installs a subscriber; applications (and tests) install their own:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("casement::modality=trace")
//!     .init();
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Window lifecycle (construction, init, close, destruction).
    pub const WINDOW: &str = "casement::window";
    /// Modality passes and counted enables.
    pub const MODALITY: &str = "casement::modality";
    /// Pointer and keyboard focus routing.
    pub const FOCUS: &str = "casement::focus";
    /// Popup and tool window dismissal.
    pub const DISMISSAL: &str = "casement::dismissal";
    /// Nest registration.
    pub const NEST: &str = "casement::nest";
    /// Window manager registry.
    pub const REGISTRY: &str = "casement::registry";
    /// Native backend calls.
    pub const NATIVE: &str = "casement::native";
    /// Signal emission.
    pub const SIGNAL: &str = "casement::signal";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Used to bracket lifecycle operations so nested events are attributed to
/// the operation that caused them.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Enter a new span for `operation`.
    pub fn new(operation: &'static str) -> Self {
        let span = tracing::debug_span!(target: "casement::perf", "perf", operation);
        Self {
            span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span_under_subscriber() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            let _span = PerfSpan::new("close");
            tracing::debug!(target: targets::WINDOW, window = 1, "closing");
        });
    }
}
