use anyhow::{Context, Result};
use std::net::SocketAddr;
use tracing::info;

use workload_server::config::Settings;
use workload_server::utils::logger::init_logger;
use workload_server::{build_router, AppState};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    init_logger()?;

    info!("🚀 Starting workload server...");

    let settings = Settings::load()?;
    info!(
        "Load simulation settings: CPU Iterations={}, Memory MB={}",
        settings.load.cpu_iterations, settings.load.memory_mb
    );

    let state = AppState::new(&settings);

    if let Some(interval) = settings.session.sweep_interval() {
        tokio::spawn(state.sessions.clone().run_janitor(interval));
    }

    let app = build_router(state);

    let addr = SocketAddr::from((
        settings.server.host.parse::<std::net::IpAddr>()?,
        settings.server.port,
    ));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Could not start server on {}", addr))?;

    info!("🎯 Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
