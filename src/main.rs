use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use runtime_headers::config::ServerConfig;
use runtime_headers::notifications::Notifier;
use runtime_headers::{server, telemetry, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    telemetry::init(&config.log_level);

    // ── 1. Build shared state ────────────────────────────────────
    let state = Arc::new(AppState::new(Notifier::new()));

    // ── 2. Seed mock data ────────────────────────────────────────
    state.store.seed();

    // ── 3. Build Axum router ─────────────────────────────────────
    let app = server::create_router(state, config.runtime_headers());

    // ── 4. Bind & serve ──────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    tracing::info!(
        addr = %config.addr,
        server_timing = config.server_timing,
        "server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server exited with error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
