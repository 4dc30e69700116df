//! Server configuration for the Ontriq site
//!
//! Loads configuration from environment variables with sensible defaults.
//! All settings can be overridden via `ONTRIQ_*` environment variables.

use ontriq_edge::GateConfig;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to
    pub bind_addr: SocketAddr,
    /// Directory holding the built static site
    pub site_dir: PathBuf,
    /// Log level filter (e.g., `info`, `debug`, `warn`)
    pub log_level: String,
    /// Apex host override (defaults to the production apex)
    pub apex_host: Option<String>,
    /// Canonical host override (defaults to the production canonical host)
    pub canonical_host: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PORT` — port to bind on (binds to `0.0.0.0`)
    /// - `ONTRIQ_BIND_ADDR` — full bind address (overrides `PORT`, default: `127.0.0.1:8080`)
    /// - `ONTRIQ_SITE_DIR` — static site directory (default: `./site`)
    /// - `ONTRIQ_LOG_LEVEL` — log filter (default: `info`)
    /// - `ONTRIQ_APEX_HOST` — apex domain to redirect away from
    /// - `ONTRIQ_CANONICAL_HOST` — canonical host to redirect to
    #[must_use]
    pub fn from_env() -> Self {
        let bind_addr = if let Ok(addr) = std::env::var("ONTRIQ_BIND_ADDR") {
            addr.parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 8080)))
        } else if let Ok(port) = std::env::var("PORT") {
            port.parse::<u16>()
                .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 8080)))
        } else {
            SocketAddr::from(([127, 0, 0, 1], 8080))
        };

        Self {
            bind_addr,
            site_dir: std::env::var("ONTRIQ_SITE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./site")),
            log_level: std::env::var("ONTRIQ_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            apex_host: std::env::var("ONTRIQ_APEX_HOST").ok(),
            canonical_host: std::env::var("ONTRIQ_CANONICAL_HOST").ok(),
        }
    }

    /// Gate configuration with any host overrides applied
    pub fn gate_config(&self) -> GateConfig {
        let mut gate = GateConfig::default();
        if let Some(apex) = &self.apex_host {
            gate.apex_host = apex.clone();
        }
        if let Some(canonical) = &self.canonical_host {
            gate.canonical_host = canonical.clone();
        }
        gate
    }
}
