//! Visibility timer policy
//!
//! Pure minimum-dwell logic: the splash must stay on screen for a short
//! minimum even when an exit trigger fires instantly (a cached zero-length
//! video can error in the same tick it mounts).

use std::time::Duration;
use tokio::time::Instant;

/// Outcome of a begin-exit request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitDecision {
    /// Minimum dwell served; start the exit sequence now
    Now,
    /// Dwell not yet served; retry after this delay
    RetryAfter(Duration),
}

/// Minimum-visible-time policy
#[derive(Debug, Clone, Copy)]
pub struct VisibilityPolicy {
    min_visible: Duration,
}

impl VisibilityPolicy {
    pub fn new(min_visible: Duration) -> Self {
        Self { min_visible }
    }

    /// Decide whether an exit may begin at `now`.
    ///
    /// A missing visible-since timestamp counts as the dwell already
    /// served: the splash was never committed to the screen, so there is
    /// nothing to protect.
    pub fn decide(&self, visible_since: Option<Instant>, now: Instant) -> ExitDecision {
        let Some(visible_since) = visible_since else {
            return ExitDecision::Now;
        };

        let elapsed = now.saturating_duration_since(visible_since);
        if elapsed >= self.min_visible {
            ExitDecision::Now
        } else {
            ExitDecision::RetryAfter(self.min_visible - elapsed)
        }
    }
}
