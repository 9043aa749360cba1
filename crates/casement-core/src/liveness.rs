//! Liveness tokens.
//!
//! A [`Liveness`] is owned by a resource whose destruction may happen as a
//! side effect of some other call (a native surface torn down by the OS, a
//! window destroyed while its surface closes). Anyone who needs to touch the
//! resource after such a call keeps a [`LivenessObserver`] and checks it
//! first, instead of holding a reference that might dangle.
//!
//! ```
//! use casement_core::Liveness;
//!
//! let liveness = Liveness::new();
//! let observer = liveness.observer();
//! assert!(observer.is_alive());
//!
//! drop(liveness);
//! assert!(!observer.is_alive());
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The owning side of a liveness token.
///
/// The resource is considered destroyed once [`Liveness::mark_destroyed`] is
/// called or the token is dropped, whichever comes first.
#[derive(Debug)]
pub struct Liveness {
    alive: Arc<AtomicBool>,
}

impl Liveness {
    /// Create a token for a live resource.
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Create an observer of this token.
    pub fn observer(&self) -> LivenessObserver {
        LivenessObserver {
            alive: Arc::clone(&self.alive),
        }
    }

    /// Whether the resource is still alive.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Mark the resource destroyed. Irreversible.
    pub fn mark_destroyed(&self) {
        self.alive.store(false, Ordering::Release);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Liveness {
    fn drop(&mut self) {
        self.mark_destroyed();
    }
}

/// The observing side of a liveness token.
#[derive(Debug, Clone)]
pub struct LivenessObserver {
    alive: Arc<AtomicBool>,
}

impl LivenessObserver {
    /// An observer that has never seen a live resource.
    pub fn destroyed() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether the observed resource is still alive.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}

static_assertions::assert_impl_all!(Liveness: Send, Sync);
static_assertions::assert_impl_all!(LivenessObserver: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_destroyed_is_seen_by_all_observers() {
        let liveness = Liveness::new();
        let a = liveness.observer();
        let b = a.clone();

        liveness.mark_destroyed();
        assert!(!liveness.is_alive());
        assert!(!a.is_alive());
        assert!(!b.is_alive());
    }

    #[test]
    fn test_destroyed_observer() {
        assert!(!LivenessObserver::destroyed().is_alive());
    }
}
