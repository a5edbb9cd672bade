use axum::Json;
use axum::extract::{Extension, Query, State};
use axum::http::{HeaderName, header};
use axum::response::IntoResponse;
use ecoplaza_core::UserIdentity;
use ecoplaza_domain::Capability;
use serde::Deserialize;

use crate::dto::{
    CapabilityCheckResponse, CapabilityResponse, PermissionsResponse, UserPermissionsResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;


fn no_store_headers() -> [(HeaderName, &'static str); 3] {
    [
        (
            header::CACHE_CONTROL,
            "private, no-cache, no-store, must-revalidate",
        ),
        (header::PRAGMA, "no-cache"),
        (header::EXPIRES, "0"),
    ]
}

#[derive(Debug, Deserialize)]
pub struct CapabilityCheckQuery {
    pub capability: String,
}

/// Returns the caller's resolved permissions, never cacheable downstream.
pub async fn permissions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<impl IntoResponse> {
    let permissions = state
        .authorization_service
        .resolve_actor_permissions(&user)
        .await?
        .map(UserPermissionsResponse::from);

    Ok((no_store_headers(), Json(PermissionsResponse { permissions })))
}

pub async fn check_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<CapabilityCheckQuery>,
) -> ApiResult<Json<CapabilityCheckResponse>> {
    let capability = Capability::from_transport(query.capability.as_str())?;
    let allowed = state
        .authorization_service
        .check_capability(&user, capability)
        .await?;

    Ok(Json(CapabilityCheckResponse {
        capability: capability.to_string(),
        allowed,
    }))
}

pub async fn capabilities_handler() -> Json<Vec<CapabilityResponse>> {
    Json(
        Capability::all()
            .into_iter()
            .map(CapabilityResponse::from)
            .collect(),
    )
}
