//! Media surface abstraction
//!
//! The preloader never talks to a concrete media element directly; the
//! host environment implements [`MediaSurface`] and forwards the element's
//! lifecycle events as [`MediaEvent`]s. This keeps the watcher and
//! lifecycle deterministic under test.

use crate::{types::ReadyState, Error, Result};
use async_trait::async_trait;

/// Capability handle over a mounted media resource.
///
/// `begin_playback` returning [`Error::AutoplayBlocked`] is a normal,
/// recoverable condition: the splash stays visible and waits for manual
/// activation or the ceiling timer.
#[async_trait]
pub trait MediaSurface: Send + Sync {
    /// Issue a playback attempt.
    async fn begin_playback(&self) -> Result<()>;

    /// Current buffering readiness of the resource.
    fn ready_state(&self) -> ReadyState;
}

/// A media surface with no backing resource.
///
/// Playback attempts always report the resource as unavailable. Useful for
/// hosts that want the splash chrome without a video (the ceiling timer
/// still dismisses it).
#[derive(Debug, Default)]
pub struct DetachedMediaSurface;

#[async_trait]
impl MediaSurface for DetachedMediaSurface {
    async fn begin_playback(&self) -> Result<()> {
        Err(Error::MediaUnavailable("no media attached".to_string()))
    }

    fn ready_state(&self) -> ReadyState {
        ReadyState::HaveNothing
    }
}
