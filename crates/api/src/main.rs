use std::sync::Arc;

use anyhow::Context;

use vivaha_api::app::{build_app, services};
use vivaha_infra::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    vivaha_observability::init();

    let config = Config::from_env().context("invalid configuration")?;
    let services = services::build_services(&config)
        .with_context(|| format!("failed to open ledger at {}", config.data_file.display()))?;

    let app = build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
