//! Integration tests for Ontriq Core

use async_trait::async_trait;
use ontriq_core::{
    ChromeLayout, FixedMotionPreference, MediaEvent, MediaSurface, Preloader, PreloaderConfig,
    PreloaderState, ReadyState, Result,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::yield_now;
use tokio::time::advance;

struct PlayableSurface;

#[async_trait]
impl MediaSurface for PlayableSurface {
    async fn begin_playback(&self) -> Result<()> {
        Ok(())
    }

    fn ready_state(&self) -> ReadyState {
        ReadyState::HaveEnoughData
    }
}

fn counting_callback() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
    let count = Arc::new(AtomicUsize::new(0));
    let cloned = Arc::clone(&count);
    (count, move || {
        cloned.fetch_add(1, Ordering::SeqCst);
    })
}

/// Drain the tasks woken at the current paused-clock instant, including
/// any they spawn in turn, so assertions see the settled state.
async fn settle() {
    for _ in 0..4 {
        yield_now().await;
    }
}

async fn wait_for_hidden(preloader: &Arc<Preloader>) {
    let mut rx = preloader.subscribe_state();
    tokio::time::timeout(Duration::from_secs(60), async {
        loop {
            if *rx.borrow_and_update() == PreloaderState::Hidden {
                break;
            }
            rx.changed().await.expect("state channel closed");
        }
    })
    .await
    .expect("preloader never reached hidden");
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_config_defaults() {
    let config = PreloaderConfig::default();
    assert_eq!(config.min_visible_ms, 450);
    assert_eq!(config.exit_fade_ms, 150);
    assert_eq!(config.autoplay_grace_ms, 2500);
    assert_eq!(config.max_timeout_ms, 12_000);
    assert!(config.video_src.ends_with(".mp4"));
}

#[test]
fn test_preloader_state_transitions() {
    assert!(PreloaderState::Visible.can_transition_to(PreloaderState::Exiting));
    assert!(PreloaderState::Exiting.can_transition_to(PreloaderState::Hidden));
    assert!(!PreloaderState::Hidden.can_transition_to(PreloaderState::Visible));
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_full_playback_run_dismisses_splash() {
    let (count, on_done) = counting_callback();
    let preloader = Preloader::mount(
        PreloaderConfig::default(),
        &FixedMotionPreference(false),
        Arc::new(PlayableSurface),
        on_done,
    )
    .await;
    yield_now().await;

    assert_eq!(preloader.state().await, PreloaderState::Visible);

    preloader.handle_media_event(MediaEvent::Playing).await;
    advance(Duration::from_secs(2)).await;

    // Approaching the end of the splash video.
    preloader
        .handle_media_event(MediaEvent::TimeUpdate {
            current_time: 1.97,
            duration: 2.0,
        })
        .await;

    wait_for_hidden(&preloader).await;
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_instant_trigger_respects_minimum_dwell() {
    let (count, on_done) = counting_callback();
    let config = PreloaderConfig::default();
    let preloader = Preloader::mount(
        config.clone(),
        &FixedMotionPreference(false),
        Arc::new(PlayableSurface),
        on_done,
    )
    .await;
    yield_now().await;

    preloader.handle_media_event(MediaEvent::Error).await;
    yield_now().await;

    // Just short of the minimum dwell: still visible, not completed.
    advance(Duration::from_millis(config.min_visible_ms - 10)).await;
    assert_eq!(preloader.state().await, PreloaderState::Visible);
    assert_eq!(count.load(Ordering::SeqCst), 0);

    wait_for_hidden(&preloader).await;
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_reduced_motion_skips_visible_phase() {
    let (count, on_done) = counting_callback();
    let preloader = Preloader::mount(
        PreloaderConfig::default(),
        &FixedMotionPreference(true),
        Arc::new(PlayableSurface),
        on_done,
    )
    .await;

    assert_eq!(preloader.state().await, PreloaderState::Hidden);
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_completion_bounded_by_ceiling_plus_fade() {
    struct SilentSurface;

    #[async_trait]
    impl MediaSurface for SilentSurface {
        async fn begin_playback(&self) -> Result<()> {
            // Accepted but nothing ever plays.
            Ok(())
        }

        fn ready_state(&self) -> ReadyState {
            ReadyState::HaveNothing
        }
    }

    let (count, on_done) = counting_callback();
    let config = PreloaderConfig::default();
    let preloader = Preloader::mount(
        config.clone(),
        &FixedMotionPreference(false),
        Arc::new(SilentSurface),
        on_done,
    )
    .await;
    settle().await;

    advance(Duration::from_millis(config.max_timeout_ms - 1)).await;
    settle().await;
    assert_eq!(count.load(Ordering::SeqCst), 0);

    advance(Duration::from_millis(1)).await;
    settle().await;
    advance(Duration::from_millis(config.exit_fade_ms + 10)).await;
    settle().await;
    assert_eq!(preloader.state().await, PreloaderState::Hidden);
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_unmount_silences_stale_instance() {
    let (count, on_done) = counting_callback();
    let preloader = Preloader::mount(
        PreloaderConfig::default(),
        &FixedMotionPreference(false),
        Arc::new(PlayableSurface),
        on_done,
    )
    .await;
    yield_now().await;

    preloader.unmount();

    advance(Duration::from_secs(30)).await;
    yield_now().await;
    assert_eq!(preloader.state().await, PreloaderState::Visible);
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

// =============================================================================
// Chrome Tests
// =============================================================================

#[test]
fn test_chrome_layout_for_routes() {
    assert_eq!(ChromeLayout::for_path("/"), ChromeLayout::Full);
    assert_eq!(ChromeLayout::for_path("/services"), ChromeLayout::Full);
    assert_eq!(ChromeLayout::for_path("/admin"), ChromeLayout::Bare);
    assert_eq!(ChromeLayout::for_path("/admin/dashboard"), ChromeLayout::Bare);
}
