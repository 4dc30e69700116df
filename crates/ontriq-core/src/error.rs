//! Error types for Ontriq Core

use thiserror::Error;

/// Result type alias for preloader operations
pub type Result<T> = std::result::Result<T, Error>;

/// Preloader error types
#[derive(Error, Debug)]
pub enum Error {
    // Playback errors
    #[error("Autoplay blocked by platform policy")]
    AutoplayBlocked,

    #[error("Media resource unavailable: {0}")]
    MediaUnavailable(String),

    // Lifecycle errors
    #[error("Invalid preloader state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    // Environment errors
    #[error("Motion preference query failed: {0}")]
    MotionPreference(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Returns true if this error is recoverable.
    ///
    /// A blocked autoplay attempt is recoverable: the splash stays visible
    /// and a later manual activation (or the ceiling timer) takes over.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::AutoplayBlocked | Error::MotionPreference(_))
    }

    /// Returns the error code for logging
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::AutoplayBlocked => "AUTOPLAY_BLOCKED",
            Error::MediaUnavailable(_) => "MEDIA_UNAVAILABLE",
            Error::InvalidStateTransition { .. } => "INVALID_STATE",
            Error::MotionPreference(_) => "MOTION_PREFERENCE",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
        }
    }
}
