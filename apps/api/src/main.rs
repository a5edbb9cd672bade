//! EcoPlaza permission API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod auth;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use ecoplaza_core::AppError;
use tracing::{info, warn};

use crate::api_config::{ApiConfig, init_tracing};
use crate::api_router::build_router;
use crate::api_services::{build_app_state, build_postgres_session_layer, connect_and_migrate};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;
    let pool = connect_and_migrate(
        config.database_url.as_str(),
        config.database_max_connections,
        config.database_acquire_timeout,
    )
    .await?;

    if config.migrate_only {
        info!("migrations applied, exiting");
        return Ok(());
    }

    let session_layer = build_postgres_session_layer(pool.clone(), config.cookie_secure).await?;
    let app_state = build_app_state(pool, &config);

    if config.permission_cache.warm_on_start {
        match app_state.authorization_service.warm_cache().await {
            Ok(warmed) => info!(warmed, "permission cache warmed on start"),
            Err(error) => warn!(%error, "permission cache warm-up failed, continuing cold"),
        }
    }

    let app = build_router(app_state, config.frontend_url.as_str(), session_layer)?;
    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind {address}: {error}")))?;

    info!(
        %address,
        mode = ?config.deployment_mode,
        "ecoplaza-api listening"
    );

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("server error: {error}")))
}
