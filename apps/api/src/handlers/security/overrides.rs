use chrono::{DateTime, Utc};
use ecoplaza_core::AppError;
use ecoplaza_domain::OverrideEffect;

use super::*;

pub async fn list_user_overrides_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Vec<UserOverrideResponse>>> {
    let user_id = UserId::from_str(user_id.as_str())?;
    let overrides = state
        .security_admin_service
        .list_user_overrides(&user, user_id)
        .await?
        .into_iter()
        .map(UserOverrideResponse::from)
        .collect();

    Ok(Json(overrides))
}

pub async fn save_user_override_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<String>,
    Json(payload): Json<SaveUserOverrideRequest>,
) -> ApiResult<Json<UserOverrideResponse>> {
    let user_id = UserId::from_str(user_id.as_str())?;
    let capability = Capability::from_transport(payload.capability.as_str())?;
    let effect = OverrideEffect::from_str(payload.effect.as_str())?;
    let expires_at = payload
        .expires_at
        .as_deref()
        .map(parse_expires_at)
        .transpose()?;

    let entry = state
        .security_admin_service
        .save_user_override(
            &user,
            ecoplaza_application::SaveUserOverrideInput {
                user_id,
                capability,
                effect,
                expires_at,
            },
        )
        .await?;

    Ok(Json(UserOverrideResponse::from(entry)))
}

pub async fn remove_user_override_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((user_id, capability)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let user_id = UserId::from_str(user_id.as_str())?;
    let capability = Capability::from_transport(capability.as_str())?;

    state
        .security_admin_service
        .remove_user_override(&user, user_id, capability)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

fn parse_expires_at(value: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(value)
        .map(|value| value.with_timezone(&Utc))
        .map_err(|error| AppError::Validation(format!("invalid expires_at '{value}': {error}")))
}
