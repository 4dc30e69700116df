//! Playback watcher
//!
//! Wraps one mounted media resource and derives a single exit signal from
//! its lifecycle events. Exactly one [`ExitTrigger`] is produced across the
//! watcher's lifetime; once `Triggered` every further input is ignored.
//!
//! State machine: `Idle -> Attempting -> Started -> Triggered`, where any
//! non-terminal state can jump straight to `Triggered` via an error, the
//! resource's own end, or the ceiling timeout.

use crate::{
    media::MediaSurface,
    types::{ExitTrigger, MediaEvent, PlaybackSession, PreloaderConfig, WatcherState},
};
use tracing::{debug, info, warn};

/// Watches a media resource and produces at most one exit trigger
#[derive(Debug)]
pub struct PlaybackWatcher {
    /// Current watcher state
    state: WatcherState,
    /// Playback session owned by this watcher
    session: PlaybackSession,
    /// Manual activation opened by the lapsed grace window
    manual_activation_open: bool,
    /// Remaining seconds below which the exit starts early
    near_end_threshold: f64,
}

impl PlaybackWatcher {
    /// Create a watcher for one mounted media resource
    pub fn new(config: &PreloaderConfig) -> Self {
        Self {
            state: WatcherState::Idle,
            session: PlaybackSession::default(),
            manual_activation_open: false,
            near_end_threshold: config.near_end_threshold_secs,
        }
    }

    /// Current state
    pub fn state(&self) -> WatcherState {
        self.state
    }

    /// Snapshot of the playback session
    pub fn session(&self) -> PlaybackSession {
        self.session
    }

    /// True once the grace window lapsed without playback starting.
    ///
    /// The host can render a manual play control; activation itself never
    /// emits a trigger.
    pub fn is_manually_activatable(&self) -> bool {
        self.manual_activation_open
    }

    /// Wire up the resource. If enough data is already buffered, issue the
    /// playback attempt immediately instead of waiting for a can-play
    /// signal.
    pub async fn mount(&mut self, surface: &dyn MediaSurface) {
        if surface.ready_state().can_attempt_playback() {
            self.attempt_playback(surface).await;
        }
    }

    /// Feed one media event; returns an exit trigger at most once
    pub async fn handle_event(
        &mut self,
        event: MediaEvent,
        surface: &dyn MediaSurface,
    ) -> Option<ExitTrigger> {
        if self.state == WatcherState::Triggered {
            return None;
        }

        match event {
            MediaEvent::CanPlay => {
                self.attempt_playback(surface).await;
                None
            }
            MediaEvent::Playing => {
                self.session.has_started = true;
                self.manual_activation_open = false;
                self.set_state(WatcherState::Started);
                None
            }
            MediaEvent::TimeUpdate {
                current_time,
                duration,
            } => self.handle_progress(current_time, duration),
            MediaEvent::Ended => self.trigger(ExitTrigger::PlaybackEnded),
            MediaEvent::Error => self.trigger(ExitTrigger::PlaybackError),
        }
    }

    /// The autoplay grace window lapsed without playback starting
    pub fn grace_elapsed(&mut self) {
        if self.state == WatcherState::Triggered || self.session.has_started {
            return;
        }
        debug!("autoplay grace lapsed; manual activation open");
        self.manual_activation_open = true;
    }

    /// The absolute ceiling timer elapsed; fires from any non-terminal
    /// state so the lifecycle always terminates
    pub fn ceiling_elapsed(&mut self) -> Option<ExitTrigger> {
        self.trigger(ExitTrigger::MaxTimeoutElapsed)
    }

    /// Manual (tap/click) playback attempt; a no-op once playback started
    /// or a trigger fired
    pub async fn activate(&mut self, surface: &dyn MediaSurface) {
        if self.state == WatcherState::Triggered || self.session.has_started {
            return;
        }
        self.attempt_playback(surface).await;
    }

    async fn attempt_playback(&mut self, surface: &dyn MediaSurface) {
        if self.state == WatcherState::Triggered || self.session.has_started {
            return;
        }
        if self.state == WatcherState::Idle {
            self.set_state(WatcherState::Attempting);
        }

        // A refused attempt leaves the splash visible; the ceiling timer
        // remains the safety net.
        if let Err(err) = surface.begin_playback().await {
            debug!(code = err.error_code(), "playback attempt refused");
        }
    }

    fn handle_progress(&mut self, current_time: f64, duration: f64) -> Option<ExitTrigger> {
        if !self.session.has_started {
            return None;
        }
        if !duration.is_finite() || duration <= 0.0 {
            return None;
        }

        self.session.current_time = current_time;
        self.session.duration = duration;

        // Exit slightly before the resource's own ended event, which can lag.
        let remaining = duration - current_time;
        if remaining <= self.near_end_threshold {
            self.trigger(ExitTrigger::NearEnd { remaining })
        } else {
            None
        }
    }

    fn trigger(&mut self, trigger: ExitTrigger) -> Option<ExitTrigger> {
        if self.state == WatcherState::Triggered {
            return None;
        }
        self.set_state(WatcherState::Triggered);
        info!(%trigger, "exit trigger emitted");
        Some(trigger)
    }

    fn set_state(&mut self, next: WatcherState) {
        if self.state == next {
            return;
        }
        if !self.state.can_transition_to(next) {
            warn!(from = %self.state, to = %next, "illegal watcher transition ignored");
            return;
        }
        debug!(from = %self.state, to = %next, "watcher transition");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{media::MediaSurface, types::ReadyState, Error, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Scriptable media surface recording playback attempts
    #[derive(Default)]
    struct StubSurface {
        blocked: AtomicBool,
        ready: AtomicBool,
        attempts: AtomicUsize,
    }

    impl StubSurface {
        fn blocked() -> Self {
            let s = Self::default();
            s.blocked.store(true, Ordering::SeqCst);
            s
        }

        fn ready() -> Self {
            let s = Self::default();
            s.ready.store(true, Ordering::SeqCst);
            s
        }

        fn attempts(&self) -> usize {
            self.attempts.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MediaSurface for StubSurface {
        async fn begin_playback(&self) -> Result<()> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            if self.blocked.load(Ordering::SeqCst) {
                Err(Error::AutoplayBlocked)
            } else {
                Ok(())
            }
        }

        fn ready_state(&self) -> ReadyState {
            if self.ready.load(Ordering::SeqCst) {
                ReadyState::HaveCurrentData
            } else {
                ReadyState::HaveNothing
            }
        }
    }

    #[tokio::test]
    async fn test_mount_attempts_when_buffered() {
        let surface = StubSurface::ready();
        let mut watcher = PlaybackWatcher::new(&PreloaderConfig::default());

        watcher.mount(&surface).await;
        assert_eq!(watcher.state(), WatcherState::Attempting);
        assert_eq!(surface.attempts(), 1);
    }

    #[tokio::test]
    async fn test_mount_waits_for_can_play() {
        let surface = StubSurface::default();
        let mut watcher = PlaybackWatcher::new(&PreloaderConfig::default());

        watcher.mount(&surface).await;
        assert_eq!(watcher.state(), WatcherState::Idle);
        assert_eq!(surface.attempts(), 0);

        let trigger = watcher.handle_event(MediaEvent::CanPlay, &surface).await;
        assert!(trigger.is_none());
        assert_eq!(watcher.state(), WatcherState::Attempting);
        assert_eq!(surface.attempts(), 1);
    }

    #[tokio::test]
    async fn test_blocked_autoplay_does_not_trigger() {
        let surface = StubSurface::blocked();
        let mut watcher = PlaybackWatcher::new(&PreloaderConfig::default());

        let trigger = watcher.handle_event(MediaEvent::CanPlay, &surface).await;
        assert!(trigger.is_none());
        assert_eq!(watcher.state(), WatcherState::Attempting);
        assert!(!watcher.session().has_started);
    }

    #[tokio::test]
    async fn test_near_end_triggers_once_started() {
        let surface = StubSurface::ready();
        let mut watcher = PlaybackWatcher::new(&PreloaderConfig::default());

        watcher.mount(&surface).await;
        watcher.handle_event(MediaEvent::Playing, &surface).await;
        assert_eq!(watcher.state(), WatcherState::Started);

        // Far from the end: no trigger
        let trigger = watcher
            .handle_event(
                MediaEvent::TimeUpdate {
                    current_time: 1.0,
                    duration: 4.0,
                },
                &surface,
            )
            .await;
        assert!(trigger.is_none());

        let trigger = watcher
            .handle_event(
                MediaEvent::TimeUpdate {
                    current_time: 3.95,
                    duration: 4.0,
                },
                &surface,
            )
            .await;
        assert!(matches!(trigger, Some(ExitTrigger::NearEnd { .. })));
        assert_eq!(watcher.state(), WatcherState::Triggered);
    }

    #[tokio::test]
    async fn test_progress_ignored_before_playback_starts() {
        let surface = StubSurface::default();
        let mut watcher = PlaybackWatcher::new(&PreloaderConfig::default());

        let trigger = watcher
            .handle_event(
                MediaEvent::TimeUpdate {
                    current_time: 0.0,
                    duration: 0.0,
                },
                &surface,
            )
            .await;
        assert!(trigger.is_none());

        // Non-finite or zero durations never trigger
        watcher.handle_event(MediaEvent::Playing, &surface).await;
        let trigger = watcher
            .handle_event(
                MediaEvent::TimeUpdate {
                    current_time: 5.0,
                    duration: f64::NAN,
                },
                &surface,
            )
            .await;
        assert!(trigger.is_none());
    }

    #[tokio::test]
    async fn test_ended_and_error_trigger_unconditionally() {
        let surface = StubSurface::default();

        let mut watcher = PlaybackWatcher::new(&PreloaderConfig::default());
        let trigger = watcher.handle_event(MediaEvent::Ended, &surface).await;
        assert_eq!(trigger, Some(ExitTrigger::PlaybackEnded));

        let mut watcher = PlaybackWatcher::new(&PreloaderConfig::default());
        let trigger = watcher.handle_event(MediaEvent::Error, &surface).await;
        assert_eq!(trigger, Some(ExitTrigger::PlaybackError));
    }

    #[tokio::test]
    async fn test_first_trigger_wins() {
        let surface = StubSurface::default();
        let mut watcher = PlaybackWatcher::new(&PreloaderConfig::default());

        let first = watcher.handle_event(MediaEvent::Error, &surface).await;
        assert_eq!(first, Some(ExitTrigger::PlaybackError));

        // Everything after the first trigger is a no-op
        assert!(watcher.handle_event(MediaEvent::Ended, &surface).await.is_none());
        assert!(watcher.ceiling_elapsed().is_none());
        assert_eq!(watcher.state(), WatcherState::Triggered);
    }

    #[tokio::test]
    async fn test_ceiling_fires_from_any_state() {
        let surface = StubSurface::ready();

        let mut idle = PlaybackWatcher::new(&PreloaderConfig::default());
        assert_eq!(idle.ceiling_elapsed(), Some(ExitTrigger::MaxTimeoutElapsed));

        let mut started = PlaybackWatcher::new(&PreloaderConfig::default());
        started.mount(&surface).await;
        started.handle_event(MediaEvent::Playing, &surface).await;
        assert_eq!(
            started.ceiling_elapsed(),
            Some(ExitTrigger::MaxTimeoutElapsed)
        );
    }

    #[tokio::test]
    async fn test_grace_opens_manual_activation() {
        let surface = StubSurface::blocked();
        let mut watcher = PlaybackWatcher::new(&PreloaderConfig::default());

        watcher.handle_event(MediaEvent::CanPlay, &surface).await;
        assert!(!watcher.is_manually_activatable());

        watcher.grace_elapsed();
        assert!(watcher.is_manually_activatable());

        // Manual activation retries playback but emits nothing
        watcher.activate(&surface).await;
        assert_eq!(surface.attempts(), 2);
        assert_eq!(watcher.state(), WatcherState::Attempting);

        // Once playing, the window closes
        watcher.handle_event(MediaEvent::Playing, &surface).await;
        assert!(!watcher.is_manually_activatable());
        watcher.grace_elapsed();
        assert!(!watcher.is_manually_activatable());
    }
}
