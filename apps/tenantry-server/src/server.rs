use std::time::Duration;

use anyhow::Context;
use axum::Router;
use axum::http::StatusCode;
use tenancy::TenancyModule;
use tenantry_db::Db;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::signals;

/// Connect, migrate and build the tenancy module.
pub async fn bootstrap(config: &AppConfig) -> anyhow::Result<(Db, TenancyModule)> {
    let db = Db::connect(&config.database)
        .await
        .context("failed to connect to the database")?;
    db.ping().await.context("database did not answer a ping")?;
    TenancyModule::migrate(&db).await?;
    let module = TenancyModule::new(db.clone(), config.tenancy.clone(), &config.auth)?;
    Ok((db, module))
}

/// Requests running past `request_timeout` are answered with 408.
fn with_layers(router: Router, request_timeout: Duration) -> Router {
    router
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let (_db, module) = bootstrap(&config).await?;

    let app = with_layers(module.router(), config.server.request_timeout);

    let listener = tokio::net::TcpListener::bind(config.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_addr))?;
    tracing::info!(addr = %config.server.bind_addr, "tenantry server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(signals::wait_for_shutdown())
        .await
        .context("server error")?;

    tracing::info!("tenantry server stopped");
    Ok(())
}
