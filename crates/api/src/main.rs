use std::sync::Arc;

use anyhow::Context;
use userhub_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    userhub_observability::init();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    let services = userhub_api::app::services::build_services(&config).await?;
    let app = userhub_api::app::build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
