//! Ontriq Edge - Request Gate
//!
//! Per-request logic executed before routing or content resolution:
//! - Canonical host enforcement (apex domain -> `www`, permanent redirect)
//! - Admin-space session checks against the provider cookie contract
//! - Request matching (static assets and well-known files bypass the gate)
//! - An opaque session-refresh collaborator hook
//!
//! Decisions are pure functions of the inbound request; the axum
//! middleware in [`middleware`] wires them onto every route.

pub mod cookies;
pub mod gate;
pub mod matcher;
pub mod middleware;
pub mod session;

pub use cookies::{cookie_names, SessionCookiePolicy};
pub use gate::{decide, normalize_host, GateConfig, RequestDecision};
pub use matcher::gate_applies;
pub use middleware::{edge_gate, EdgeState};
pub use session::{NoopSessionRefresh, SessionRefresh};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
