//! Session cookie provider adapter
//!
//! The authentication provider's contract is a cookie-name shape, not a
//! session format: either a fixed access-token cookie is present, or some
//! cookie carries the provider prefix and the auth-token marker in its
//! name. Isolating the predicate here keeps the provider swappable
//! without touching gate logic.

use serde::{Deserialize, Serialize};

/// Cookie-name contract for the authentication provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCookiePolicy {
    /// Fixed access-token cookie name
    pub access_cookie: String,
    /// Provider cookie-name prefix
    pub provider_prefix: String,
    /// Substring marking a cookie as an auth token
    pub auth_token_marker: String,
}

impl Default for SessionCookiePolicy {
    fn default() -> Self {
        Self {
            access_cookie: "sb-access-token".to_string(),
            provider_prefix: "sb-".to_string(),
            auth_token_marker: "auth-token".to_string(),
        }
    }
}

impl SessionCookiePolicy {
    /// True when any of the given cookie names satisfies the contract
    pub fn authenticates<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> bool {
        names.into_iter().any(|name| {
            name == self.access_cookie
                || (name.starts_with(&self.provider_prefix)
                    && name.contains(&self.auth_token_marker))
        })
    }
}

/// Parse cookie names out of a `Cookie` header value.
///
/// Values are irrelevant to the gate; malformed pairs yield whatever is
/// left of the first `=` (or the whole fragment), never an error.
pub fn cookie_names(header: &str) -> impl Iterator<Item = &str> {
    header.split(';').filter_map(|pair| {
        let pair = pair.trim();
        if pair.is_empty() {
            return None;
        }
        Some(pair.split_once('=').map_or(pair, |(name, _)| name.trim()))
    })
}
