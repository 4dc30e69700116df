//! Ontriq site server entry point.
//!
//! Serves the built static site with the edge request gate layered on
//! every inbound request: canonical-host enforcement first, then admin
//! session checks, then content.

use std::sync::Arc;

use anyhow::Context;
use axum::middleware as axum_mw;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use ontriq_edge::{edge_gate, EdgeState, NoopSessionRefresh, SessionCookiePolicy};

mod config;

use config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env();

    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    info!(site_dir = %config.site_dir.display(), "Ontriq server starting");

    let state = Arc::new(EdgeState::new(
        config.gate_config(),
        SessionCookiePolicy::default(),
        Arc::new(NoopSessionRefresh),
    ));

    let app = Router::new()
        .fallback_service(ServeDir::new(&config.site_dir))
        .layer(axum_mw::from_fn_with_state(state, edge_gate))
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "Ontriq server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Ontriq server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
