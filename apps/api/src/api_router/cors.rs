use std::time::Duration;

use axum::http::header::{CONTENT_TYPE, HeaderName};
use axum::http::{HeaderValue, Method};
use ecoplaza_core::AppError;
use tower_http::cors::CorsLayer;

const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(600);

/// Browser-facing CORS policy: credentials only from the configured frontend.
pub(super) fn build_cors_layer(frontend_url: &str) -> Result<CorsLayer, AppError> {
    let origin = frontend_origin(frontend_url)?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .expose_headers([HeaderName::from_static("cache-control")])
        .max_age(PREFLIGHT_MAX_AGE))
}

fn frontend_origin(frontend_url: &str) -> Result<HeaderValue, AppError> {
    let trimmed = frontend_url.trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(AppError::Validation("FRONTEND_URL must not be empty".to_owned()));
    }

    HeaderValue::from_str(trimmed)
        .map_err(|error| AppError::Validation(format!("invalid FRONTEND_URL: {error}")))
}
