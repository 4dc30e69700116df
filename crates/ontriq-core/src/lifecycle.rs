//! Preloader lifecycle - orchestrator for the splash screen
//!
//! Composes the visibility timer policy and the playback watcher into the
//! `Visible -> Exiting -> Hidden` machine. Guarantees:
//! - the completion callback fires exactly once per lifecycle instance
//! - the exit sequence never starts before the minimum dwell is served
//! - the ceiling timer bounds visibility even if the media never loads
//! - unmounting cancels every pending timer, so a superseded instance can
//!   never invoke its callback late

use crate::{
    media::MediaSurface,
    policy::{ExitDecision, VisibilityPolicy},
    types::{ExitTrigger, LifecycleId, MediaEvent, PreloaderConfig, PreloaderState},
    Error, Result,
};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex as StdMutex,
};
use tokio::sync::{watch, Mutex, RwLock};
use tokio::time::Instant;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::watcher::PlaybackWatcher;

/// Environment signal for the user's motion preference.
///
/// Read once at mount. A failing query is treated as "no preference":
/// the splash fails safe toward being shown.
pub trait MotionPreference: Send + Sync {
    fn prefers_reduced_motion(&self) -> Result<bool>;
}

/// A fixed motion preference value
#[derive(Debug, Clone, Copy)]
pub struct FixedMotionPreference(pub bool);

impl MotionPreference for FixedMotionPreference {
    fn prefers_reduced_motion(&self) -> Result<bool> {
        Ok(self.0)
    }
}

/// Callback invoked exactly once when the splash is done
pub type CompletionCallback = Box<dyn FnOnce() + Send + 'static>;

/// One mounted preloader instance
pub struct Preloader {
    /// Unique lifecycle ID
    id: LifecycleId,
    /// Lifecycle configuration
    config: PreloaderConfig,
    /// Current visibility state
    state: RwLock<PreloaderState>,
    /// State change broadcaster
    state_tx: watch::Sender<PreloaderState>,
    /// Playback watcher for the mounted media resource
    watcher: Mutex<PlaybackWatcher>,
    /// The media resource itself
    surface: Arc<dyn MediaSurface>,
    /// Minimum-dwell policy
    policy: VisibilityPolicy,
    /// Timestamp of the committed visible state
    visible_since: Option<Instant>,
    /// One-shot guard: an exit sequence has been requested
    exit_requested: AtomicBool,
    /// One-shot guard: the completion callback has fired
    completed: AtomicBool,
    /// Completion callback, taken on first completion
    on_done: StdMutex<Option<CompletionCallback>>,
    /// Spawned timer tasks, aborted on unmount
    tasks: StdMutex<Vec<JoinHandle<()>>>,
}

impl Preloader {
    /// Mount a new preloader instance.
    ///
    /// When the environment prefers reduced motion the visible phase is
    /// skipped entirely: the instance is born `Hidden` and the completion
    /// callback fires before this returns. Otherwise the visible timestamp
    /// is recorded before the watcher is wired, the watcher issues its
    /// initial playback attempt, and the grace and ceiling timers start.
    pub async fn mount(
        config: PreloaderConfig,
        motion: &dyn MotionPreference,
        surface: Arc<dyn MediaSurface>,
        on_done: impl FnOnce() + Send + 'static,
    ) -> Arc<Self> {
        let skip = motion.prefers_reduced_motion().unwrap_or_else(|err| {
            debug!(code = err.error_code(), "motion preference query failed; showing splash");
            false
        });

        let initial = if skip {
            PreloaderState::Hidden
        } else {
            PreloaderState::Visible
        };
        let (state_tx, _) = watch::channel(initial);

        let preloader = Arc::new(Self {
            id: LifecycleId::new(),
            state: RwLock::new(initial),
            state_tx,
            watcher: Mutex::new(PlaybackWatcher::new(&config)),
            surface,
            policy: VisibilityPolicy::new(config.min_visible()),
            visible_since: if skip { None } else { Some(Instant::now()) },
            exit_requested: AtomicBool::new(skip),
            completed: AtomicBool::new(false),
            on_done: StdMutex::new(Some(Box::new(on_done))),
            tasks: StdMutex::new(Vec::new()),
            config,
        });

        if skip {
            info!(id = %preloader.id, "reduced motion; skipping splash");
            preloader.complete();
            return preloader;
        }

        info!(id = %preloader.id, "preloader visible");
        preloader.watcher.lock().await.mount(preloader.surface.as_ref()).await;

        // Grace window: opens manual activation, emits nothing.
        let grace = preloader.config.autoplay_grace();
        let this = Arc::clone(&preloader);
        preloader.push_task(tokio::spawn(async move {
            sleep(grace).await;
            this.watcher.lock().await.grace_elapsed();
        }));

        // Absolute ceiling: the lifecycle always terminates.
        let ceiling = preloader.config.max_timeout();
        let this = Arc::clone(&preloader);
        preloader.push_task(tokio::spawn(async move {
            sleep(ceiling).await;
            let trigger = this.watcher.lock().await.ceiling_elapsed();
            if let Some(trigger) = trigger {
                this.begin_exit(trigger);
            }
        }));

        preloader
    }

    /// Lifecycle ID
    pub fn id(&self) -> LifecycleId {
        self.id
    }

    /// Current state
    pub async fn state(&self) -> PreloaderState {
        *self.state.read().await
    }

    /// Subscribe to state changes
    pub fn subscribe_state(&self) -> watch::Receiver<PreloaderState> {
        self.state_tx.subscribe()
    }

    /// True while the splash still covers the page
    pub async fn is_visible(&self) -> bool {
        *self.state.read().await != PreloaderState::Hidden
    }

    /// True once the grace window lapsed without playback starting
    pub async fn is_manually_activatable(&self) -> bool {
        self.watcher.lock().await.is_manually_activatable()
    }

    /// Feed one media event from the host environment
    pub async fn handle_media_event(self: &Arc<Self>, event: MediaEvent) {
        let trigger = {
            let mut watcher = self.watcher.lock().await;
            watcher.handle_event(event, self.surface.as_ref()).await
        };
        if let Some(trigger) = trigger {
            self.begin_exit(trigger);
        }
    }

    /// Manual activation (tap/click anywhere on the splash)
    pub async fn activate(&self) {
        self.watcher
            .lock()
            .await
            .activate(self.surface.as_ref())
            .await;
    }

    /// Request the exit sequence.
    ///
    /// The one-shot flag is set before anything is scheduled, so repeated
    /// triggers (or repeated calls racing the minimum dwell) never queue
    /// duplicate exits.
    fn begin_exit(self: &Arc<Self>, trigger: ExitTrigger) {
        if self.exit_requested.swap(true, Ordering::SeqCst) {
            return;
        }
        info!(id = %self.id, %trigger, "exit requested");

        let this = Arc::clone(self);
        let handle = tokio::spawn(async move {
            this.run_exit_sequence().await;
        });
        self.push_task(handle);
    }

    /// Cancel all pending timers and detach this instance.
    ///
    /// After this returns no state change happens and the completion
    /// callback can no longer fire. Both one-shot guards are sealed, so
    /// media events delivered to a stale instance are no-ops too.
    pub fn unmount(&self) {
        self.exit_requested.store(true, Ordering::SeqCst);
        self.completed.store(true, Ordering::SeqCst);
        if let Ok(mut tasks) = self.tasks.lock() {
            for task in tasks.drain(..) {
                task.abort();
            }
        }
        debug!(id = %self.id, "preloader unmounted");
    }

    async fn run_exit_sequence(self: Arc<Self>) {
        // Defer until the minimum dwell is served.
        if let ExitDecision::RetryAfter(delay) = self.policy.decide(self.visible_since, Instant::now()) {
            debug!(id = %self.id, delay_ms = delay.as_millis() as u64, "deferring exit for minimum dwell");
            sleep(delay).await;
        }

        if self.set_state(PreloaderState::Exiting).await.is_err() {
            return;
        }
        sleep(self.config.exit_fade()).await;
        if self.set_state(PreloaderState::Hidden).await.is_err() {
            return;
        }
        self.complete();
    }

    /// Transition to new state
    async fn set_state(&self, new_state: PreloaderState) -> Result<()> {
        let mut state = self.state.write().await;
        let current = *state;

        if !current.can_transition_to(new_state) {
            return Err(Error::InvalidStateTransition {
                from: current.to_string(),
                to: new_state.to_string(),
            });
        }

        *state = new_state;
        drop(state);
        let _ = self.state_tx.send(new_state);

        info!(id = %self.id, from = %current, to = %new_state, "state transition");
        Ok(())
    }

    fn complete(&self) {
        if self.completed.swap(true, Ordering::SeqCst) {
            return;
        }
        let callback = self.on_done.lock().ok().and_then(|mut slot| slot.take());
        if let Some(callback) = callback {
            callback();
        }
        info!(id = %self.id, "preloader complete");
    }

    fn push_task(&self, handle: JoinHandle<()>) {
        if let Ok(mut tasks) = self.tasks.lock() {
            tasks.push(handle);
        }
    }
}

impl Drop for Preloader {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl std::fmt::Debug for Preloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preloader")
            .field("id", &self.id)
            .field("exit_requested", &self.exit_requested.load(Ordering::SeqCst))
            .field("completed", &self.completed.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
