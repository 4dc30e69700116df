//! Edge request gate decisions
//!
//! A pure per-request function over `{host, path, query, cookie names}`.
//! The canonical-host redirect takes precedence over everything else; a
//! request is never both host-redirected and auth-checked. No input
//! combination raises: a malformed or missing host header simply never
//! matches the apex domain.

use crate::cookies::SessionCookiePolicy;
use ontriq_core::{is_admin_path, ADMIN_LOGIN_PATH};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Host canonicalization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Bare apex domain to redirect away from
    pub apex_host: String,
    /// Canonical host all traffic should land on
    pub canonical_host: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            apex_host: "ontriq.com".to_string(),
            canonical_host: "www.ontriq.com".to_string(),
        }
    }
}

/// Decision for one inbound request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestDecision {
    /// Serve the request unmodified
    PassThrough,
    /// Permanent redirect to the canonical host, same path and query
    RedirectCanonicalHost { location: String },
    /// Redirect to the admin login route with the original path preserved
    RedirectLogin { location: String },
}

/// Lowercase the host header and strip any port
pub fn normalize_host(host_header: Option<&str>) -> String {
    host_header
        .unwrap_or("")
        .split(':')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

/// Compute the gate decision for one request
pub fn decide<'a>(
    config: &GateConfig,
    cookies: &SessionCookiePolicy,
    host_header: Option<&str>,
    path: &str,
    query: Option<&str>,
    cookie_names: impl IntoIterator<Item = &'a str>,
) -> RequestDecision {
    // Canonical host first; an empty hostname never matches the apex.
    let hostname = normalize_host(host_header);
    if !hostname.is_empty() && hostname == config.apex_host {
        let mut location = format!("https://{}{}", config.canonical_host, path);
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            location.push('?');
            location.push_str(query);
        }
        return RequestDecision::RedirectCanonicalHost { location };
    }

    // Public admin login page.
    if path == ADMIN_LOGIN_PATH {
        return RequestDecision::PassThrough;
    }

    // Everything else under the admin prefix requires a session cookie.
    if is_admin_path(path) && !cookies.authenticates(cookie_names) {
        let next = form_urlencoded::Serializer::new(String::new())
            .append_pair("next", path)
            .finish();
        return RequestDecision::RedirectLogin {
            location: format!("{ADMIN_LOGIN_PATH}?{next}"),
        };
    }

    RequestDecision::PassThrough
}
