//! Serve command - runs the HTTP API

use std::net::{IpAddr, SocketAddr};

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use crate::api::create_router;
use crate::config::{AppConfig, ServerConfig};
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::observability::init_metrics;

/// Load the registry once, then serve until SIGINT or SIGTERM
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    init_logging(&config.logging);

    // Recorder must exist before loading or the registry gauges are lost
    let metrics = init_metrics(&config.observability.metrics);
    let state = crate::create_app_state_with_config(&config).await?;
    let app = create_router(state, &config, metrics);

    let addr = listen_addr(&config.server)?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(%addr, "Cancer classification API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let signal = wait_for_signal().await;
            info!(signal, "Draining in-flight requests");
        })
        .await?;

    info!("Server stopped");
    Ok(())
}

#[cfg(unix)]
async fn wait_for_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate =
        signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => "SIGINT",
        _ = terminate.recv() => "SIGTERM",
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> &'static str {
    let _ = tokio::signal::ctrl_c().await;
    "Ctrl+C"
}

fn listen_addr(server: &ServerConfig) -> anyhow::Result<SocketAddr> {
    let ip: IpAddr = server
        .host
        .parse()
        .with_context(|| format!("server.host must be an IP address, got {:?}", server.host))?;
    Ok(SocketAddr::new(ip, server.port))
}
