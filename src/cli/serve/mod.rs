//! Serve command - runs the HTTP API

use std::net::{IpAddr, SocketAddr};

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use crate::api::create_router_with_state;
use crate::config::{AppConfig, ServerConfig};

/// Run the API server until interrupted
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let state = crate::create_app_state(&config).await?;
    let app = create_router_with_state(state, &config.cors);

    let addr = build_socket_addr(&config.server)?;
    info!(%addr, "Starting EyeCare API server");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn build_socket_addr(server: &ServerConfig) -> anyhow::Result<SocketAddr> {
    let host: IpAddr = server
        .host
        .parse()
        .with_context(|| format!("Invalid server.host '{}'", server.host))?;

    Ok(SocketAddr::from((host, server.port)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }

    info!("Shutdown signal received");
}
