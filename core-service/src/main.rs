use anyhow::Context;
use core_library::db::{create_pool, DatabaseConfig};
use core_runtime::config::ServiceConfig;
use core_runtime::logging::init_logging;
use core_service::{create_router, CatalogService, CatalogSettings};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::from_env().context("Failed to load configuration")?;

    init_logging(config.logging())?;
    config.log_load_report();

    let pool = create_pool(
        DatabaseConfig::new(config.database_url.clone()).max_connections(config.db_max_connections),
    )
    .await
    .context("Failed to open database")?;

    let service = CatalogService::from_pool(pool.clone(), CatalogSettings::from(&config));
    let app = create_router(service, config.request_timeout());

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(%addr, version = env!("CARGO_PKG_VERSION"), "Songbook listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
