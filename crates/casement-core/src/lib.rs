//! Core systems for Casement.
//!
//! This crate provides the window-agnostic building blocks of the Casement
//! window core:
//!
//! - **Geometry**: [`Point`], [`Size`], [`Rect`], [`Padding`], [`Color`]
//! - **Signals**: synchronous, type-safe notifications ([`Signal`])
//! - **Liveness tokens**: safe "was this destroyed meanwhile?" checks
//!   ([`Liveness`], [`LivenessObserver`])
//! - **Logging**: `tracing` target names and [`PerfSpan`]
//!
//! # Signal Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use casement_core::Signal;
//!
//! let closed = Signal::<()>::new();
//! let count = Arc::new(AtomicUsize::new(0));
//! let counter = count.clone();
//! closed.connect(move |_| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! closed.emit(());
//! assert_eq!(count.load(Ordering::SeqCst), 1);
//! ```

pub mod liveness;
pub mod logging;
pub mod signal;
mod types;

pub use liveness::{Liveness, LivenessObserver};
pub use logging::PerfSpan;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use types::{Color, Padding, Point, Rect, Size};
