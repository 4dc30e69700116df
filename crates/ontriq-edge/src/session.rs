//! Session refresh collaborator
//!
//! The authentication provider owns cookie issuance and rotation. The gate
//! only gives it a chance to act on requests that will be served: it is
//! never consulted for canonical-host redirects, and the login redirect is
//! a fresh response carrying no refreshed cookies.

use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderValue};

/// Opaque session-refresh capability.
///
/// Implementations inspect the inbound request headers and return
/// `Set-Cookie` values to attach to the outgoing response.
#[async_trait]
pub trait SessionRefresh: Send + Sync {
    async fn refresh(&self, headers: &HeaderMap) -> Vec<HeaderValue>;
}

/// A refresher that never rotates anything
#[derive(Debug, Default)]
pub struct NoopSessionRefresh;

#[async_trait]
impl SessionRefresh for NoopSessionRefresh {
    async fn refresh(&self, _headers: &HeaderMap) -> Vec<HeaderValue> {
        Vec::new()
    }
}
