//! Core types for the Ontriq preloader

use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Unique identifier for one mounted preloader lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LifecycleId(pub Uuid);

impl LifecycleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LifecycleId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LifecycleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Preloader visibility states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PreloaderState {
    /// Splash is covering the page
    Visible,
    /// Fade-out in progress
    Exiting,
    /// Splash dismissed; terminal
    Hidden,
}

impl PreloaderState {
    /// Check if transition to target state is valid
    pub fn can_transition_to(&self, target: PreloaderState) -> bool {
        use PreloaderState::*;
        matches!((self, target), (Visible, Exiting) | (Exiting, Hidden))
    }
}

impl std::fmt::Display for PreloaderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreloaderState::Visible => write!(f, "visible"),
            PreloaderState::Exiting => write!(f, "exiting"),
            PreloaderState::Hidden => write!(f, "hidden"),
        }
    }
}

/// Playback watcher states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WatcherState {
    /// Mounted, waiting for the media to become playable
    Idle,
    /// A playback attempt has been issued
    Attempting,
    /// Playback confirmed started
    Started,
    /// Exit trigger emitted; terminal
    Triggered,
}

impl WatcherState {
    /// Check if transition to target state is valid.
    ///
    /// Any non-terminal state may jump straight to `Triggered` (error,
    /// ended, or ceiling timeout can fire before playback ever starts).
    pub fn can_transition_to(&self, target: WatcherState) -> bool {
        use WatcherState::*;
        matches!(
            (self, target),
            (Idle, Attempting)
                | (Attempting, Started)
                // Playback can be confirmed without an observed attempt
                // (host-side autoplay)
                | (Idle, Started)
                | (Idle, Triggered)
                | (Attempting, Triggered)
                | (Started, Triggered)
        )
    }
}

impl std::fmt::Display for WatcherState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WatcherState::Idle => write!(f, "idle"),
            WatcherState::Attempting => write!(f, "attempting"),
            WatcherState::Started => write!(f, "started"),
            WatcherState::Triggered => write!(f, "triggered"),
        }
    }
}

/// Events sufficient to justify dismissing the preloader.
///
/// Any trigger is enough; the first one to fire wins and later triggers
/// are ignored by the watcher's one-shot guard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "trigger", rename_all = "snake_case")]
pub enum ExitTrigger {
    /// The media resource reported its own end
    PlaybackEnded,
    /// Decode or load failure; treated like normal completion
    PlaybackError,
    /// Remaining duration dropped below the near-end threshold
    NearEnd { remaining: f64 },
    /// Absolute ceiling timer elapsed
    MaxTimeoutElapsed,
}

impl std::fmt::Display for ExitTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExitTrigger::PlaybackEnded => write!(f, "playback_ended"),
            ExitTrigger::PlaybackError => write!(f, "playback_error"),
            ExitTrigger::NearEnd { remaining } => write!(f, "near_end({remaining:.3}s)"),
            ExitTrigger::MaxTimeoutElapsed => write!(f, "max_timeout"),
        }
    }
}

/// Lifecycle events reported by the mounted media resource
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MediaEvent {
    /// Enough data buffered to begin playback
    CanPlay,
    /// Playback has actually started rendering frames
    Playing,
    /// Periodic progress report
    TimeUpdate { current_time: f64, duration: f64 },
    /// The resource reached its end
    Ended,
    /// Load or decode failure
    Error,
}

/// Media readiness, ordered from no data to fully buffered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReadyState {
    HaveNothing,
    HaveMetadata,
    HaveCurrentData,
    HaveFutureData,
    HaveEnoughData,
}

impl ReadyState {
    /// Enough buffered to issue a playback attempt without waiting for
    /// a can-play signal
    pub fn can_attempt_playback(&self) -> bool {
        *self >= ReadyState::HaveCurrentData
    }
}

/// Snapshot of the playback session owned by the watcher
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PlaybackSession {
    /// Playback has been confirmed started
    pub has_started: bool,
    /// Last reported position in seconds
    pub current_time: f64,
    /// Last reported duration in seconds (0.0 when unknown)
    pub duration: f64,
}

/// Preloader configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreloaderConfig {
    /// Minimum dwell time before any exit may begin (milliseconds)
    pub min_visible_ms: u64,
    /// Fixed fade duration between exiting and hidden (milliseconds)
    pub exit_fade_ms: u64,
    /// Remaining playback below which the exit starts early (seconds)
    pub near_end_threshold_secs: f64,
    /// Grace window before manual activation opens (milliseconds)
    pub autoplay_grace_ms: u64,
    /// Absolute ceiling on splash visibility (milliseconds)
    pub max_timeout_ms: u64,
    /// Path to the splash video asset
    pub video_src: String,
}

impl Default for PreloaderConfig {
    fn default() -> Self {
        Self {
            min_visible_ms: 450,
            exit_fade_ms: 150,
            near_end_threshold_secs: 0.06,
            autoplay_grace_ms: 2500,
            max_timeout_ms: 12_000,
            video_src: "/Logo_Animation_Generation_For_Ontriq.mp4".to_string(),
        }
    }
}

impl PreloaderConfig {
    pub fn min_visible(&self) -> Duration {
        Duration::from_millis(self.min_visible_ms)
    }

    pub fn exit_fade(&self) -> Duration {
        Duration::from_millis(self.exit_fade_ms)
    }

    pub fn autoplay_grace(&self) -> Duration {
        Duration::from_millis(self.autoplay_grace_ms)
    }

    pub fn max_timeout(&self) -> Duration {
        Duration::from_millis(self.max_timeout_ms)
    }
}
