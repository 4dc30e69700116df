//! Edge gate middleware
//!
//! Runs before any content is served. Reads the inbound request, computes
//! a [`RequestDecision`], and either short-circuits with a redirect or
//! passes the request on with the session-refresh collaborator's cookies
//! appended to the response.

use crate::{
    cookies::{cookie_names, SessionCookiePolicy},
    gate::{decide, GateConfig, RequestDecision},
    matcher::gate_applies,
    session::SessionRefresh,
};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::debug;

/// Shared state for the edge gate middleware
pub struct EdgeState {
    pub gate: GateConfig,
    pub cookies: SessionCookiePolicy,
    pub refresher: Arc<dyn SessionRefresh>,
}

impl EdgeState {
    pub fn new(
        gate: GateConfig,
        cookies: SessionCookiePolicy,
        refresher: Arc<dyn SessionRefresh>,
    ) -> Self {
        Self {
            gate,
            cookies,
            refresher,
        }
    }

    /// Default gate and cookie contracts around the given refresher
    pub fn with_defaults(refresher: Arc<dyn SessionRefresh>) -> Self {
        Self::new(GateConfig::default(), SessionCookiePolicy::default(), refresher)
    }
}

impl std::fmt::Debug for EdgeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdgeState")
            .field("gate", &self.gate)
            .field("cookies", &self.cookies)
            .finish_non_exhaustive()
    }
}

/// Edge gate middleware, applied to every inbound request
pub async fn edge_gate(
    State(state): State<Arc<EdgeState>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if !gate_applies(&path) {
        return next.run(request).await;
    }

    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok());
    let query = request.uri().query();
    // Clients may split cookies across several Cookie headers.
    let names = request
        .headers()
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(cookie_names);

    let decision = decide(&state.gate, &state.cookies, host, &path, query, names);

    match decision {
        RequestDecision::RedirectCanonicalHost { location } => {
            debug!(%location, "redirecting to canonical host");
            redirect(StatusCode::PERMANENT_REDIRECT, &location)
        }
        RequestDecision::RedirectLogin { location } => {
            debug!(path = %path, "unauthenticated admin request; redirecting to login");
            redirect(StatusCode::TEMPORARY_REDIRECT, &location)
        }
        RequestDecision::PassThrough => {
            let set_cookies = state.refresher.refresh(request.headers()).await;
            let mut response = next.run(request).await;
            for value in set_cookies {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            response
        }
    }
}

fn redirect(status: StatusCode, location: &str) -> Response {
    let mut response = status.into_response();
    if let Ok(value) = HeaderValue::from_str(location) {
        response.headers_mut().insert(header::LOCATION, value);
    }
    response
}
