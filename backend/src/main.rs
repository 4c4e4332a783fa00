//! Main entry point for the QR-card backend.
//!
//! Initializes logging, loads configuration, connects the backend client
//! and serves the Axum application until interrupted.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use backend::config::{AppConfig, BackendMode};
use backend::{build_app, connect_backend, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    fmt().with_env_filter(filter).init();

    let config = AppConfig::from_env().context("loading configuration")?;
    if config.backend_mode == BackendMode::Memory {
        info!("using in-memory backend; nobody can sign in");
    }

    let backend = connect_backend(&config).context("connecting to backend")?;
    let app = build_app(AppState::new(backend, config.session_cookie.clone()));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
