//! Casement: the window core of a GUI engine.
//!
//! Casement manages top level and nested windows: their lifecycle, how
//! they bind to native surfaces, modality, focus and pointer routing, and
//! the automatic dismissal of popups.
//!
//! # Quick Start
//!
//! ```
//! use casement::prelude::*;
//!
//! let (mut system, _engine) = WindowSystem::headless(WindowSystemConfig::new("Quick Start"));
//! let main = system.create_window(WindowConfig::new("Main")).unwrap();
//! let dialog = system
//!     .create_window(WindowConfig::child_of(main).with_type(WindowType::Dialog))
//!     .unwrap();
//!
//! // The dialog is modal: its owner is blocked until it closes.
//! assert!(!system.window_enabled(main));
//! system.close(dialog).unwrap();
//! assert!(system.window_enabled(main));
//! ```
//!
//! # Modules
//!
//! - [`window`]: windows, the window system and its collaborators
//! - [`prelude`]: common imports
//!
//! Geometry, signals, liveness tokens and logging come from
//! `casement-core` and are re-exported at the crate root.

pub use casement_core::*;

pub mod prelude;
pub mod window;
