use axum::Json;
use axum::extract::State;
use ecoplaza_core::AppError;
use tracing::{info, warn};

use crate::dto::{
    ClearPermissionCacheResponse, PermissionCacheStatsResponse, PermissionCacheSummaryResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;


fn ensure_development(state: &AppState) -> Result<(), AppError> {
    if state.deployment_mode.is_production() {
        warn!("development cache endpoint called in production");
        return Err(AppError::Forbidden("not available in production".to_owned()));
    }

    Ok(())
}

pub async fn permission_cache_stats_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<PermissionCacheSummaryResponse>> {
    ensure_development(&state)?;

    let stats = state.authorization_service.cache_stats().await;
    Ok(Json(PermissionCacheSummaryResponse {
        success: true,
        stats: PermissionCacheStatsResponse::from(stats),
    }))
}

pub async fn clear_permission_cache_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<ClearPermissionCacheResponse>> {
    ensure_development(&state)?;

    let before = state.authorization_service.cache_stats().await;
    let removed = state.authorization_service.invalidate_all().await;
    let after = state.authorization_service.cache_stats().await;
    info!(removed, "permission cache cleared on request");

    Ok(Json(ClearPermissionCacheResponse {
        success: true,
        message: format!("cache cleared: {removed} entries removed"),
        removed,
        before: PermissionCacheStatsResponse::from(before),
        after: PermissionCacheStatsResponse::from(after),
    }))
}
