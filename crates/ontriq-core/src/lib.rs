//! Ontriq Core - Site Preloader Engine
//!
//! This crate provides the splash-screen lifecycle for the Ontriq site:
//! - Visibility timer policy (minimum-dwell enforcement)
//! - Playback watcher over the splash video's lifecycle events
//! - Preloader lifecycle state machine with a one-shot completion callback
//! - Route chrome selection (full chrome vs. bare admin content)
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                    Ontriq Core                        │
//! ├───────────────────────────────────────────────────────┤
//! │                                                       │
//! │  ┌──────────────┐        ┌──────────────┐             │
//! │  │  Visibility  │        │   Playback   │             │
//! │  │ Timer Policy │        │   Watcher    │             │
//! │  └──────┬───────┘        └──────┬───────┘             │
//! │         │                       │                     │
//! │         └──────────┬────────────┘                     │
//! │                    │                                  │
//! │             ┌──────┴──────┐       ┌──────────────┐    │
//! │             │  Preloader  │       │ Route Chrome │    │
//! │             │  Lifecycle  │       │   Selector   │    │
//! │             └─────────────┘       └──────────────┘    │
//! └───────────────────────────────────────────────────────┘
//! ```

pub mod chrome;
pub mod error;
pub mod lifecycle;
pub mod media;
pub mod policy;
pub mod types;
pub mod watcher;

pub use chrome::{is_admin_path, ChromeLayout, ChromeSlot, ADMIN_LOGIN_PATH, ADMIN_PREFIX};
pub use error::{Error, Result};
pub use lifecycle::{FixedMotionPreference, MotionPreference, Preloader};
pub use media::{DetachedMediaSurface, MediaSurface};
pub use policy::{ExitDecision, VisibilityPolicy};
pub use types::*;
pub use watcher::PlaybackWatcher;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the preloader library with default configuration
pub fn init() {
    tracing::info!(version = VERSION, "Ontriq Core initialized");
}
