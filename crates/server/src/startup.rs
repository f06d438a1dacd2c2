use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use service::Api;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::{pages, routes};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Build the application from configuration: backend, services, router.
pub fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let backend = backend::from_config(&cfg.backend)?;
    let api = Api::new(backend);
    let auth_endpoint = (!cfg.backend.is_in_memory()).then(|| pages::auth_endpoint(&cfg.backend.url));
    Ok(routes::build_router(api, build_cors(), auth_endpoint))
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")))
}

/// Public entry: load configuration, build the app and run the HTTP server.
pub async fn run() -> Result<(), StartupError> {
    let cfg = AppConfig::load_and_validate()?;
    serve(cfg).await
}

/// Serve until Ctrl+C, then drain in-flight requests.
pub async fn serve(cfg: AppConfig) -> Result<(), StartupError> {
    let app = build_app(&cfg)?;

    let addr = bind_addr(&cfg)?;
    info!(%addr, in_memory = cfg.backend.is_in_memory(), "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(anyhow::Error::from)?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
