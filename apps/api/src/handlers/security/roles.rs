use super::*;

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .security_admin_service
        .list_roles(&user)
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    let capabilities = payload
        .capabilities
        .iter()
        .map(|value| Capability::from_transport(value.as_str()))
        .collect::<Result<Vec<_>, _>>()?;

    let role = state
        .security_admin_service
        .create_role(
            &user,
            ecoplaza_application::CreateRoleInput {
                name: payload.name,
                display_name: payload.display_name,
                capabilities,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role_id): Path<String>,
) -> ApiResult<StatusCode> {
    let role_id = RoleId::from_str(role_id.as_str())?;
    state
        .security_admin_service
        .delete_role(&user, role_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn grant_role_capability_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role_id): Path<String>,
    Json(payload): Json<GrantRoleCapabilityRequest>,
) -> ApiResult<Json<RoleResponse>> {
    let role_id = RoleId::from_str(role_id.as_str())?;
    let capability = Capability::from_transport(payload.capability.as_str())?;

    let role = state
        .security_admin_service
        .grant_role_capability(&user, role_id, capability)
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn revoke_role_capability_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((role_id, capability)): Path<(String, String)>,
) -> ApiResult<Json<RoleResponse>> {
    let role_id = RoleId::from_str(role_id.as_str())?;
    let capability = Capability::from_transport(capability.as_str())?;

    let role = state
        .security_admin_service
        .revoke_role_capability(&user, role_id, capability)
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn assign_user_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<String>,
    Json(payload): Json<AssignUserRoleRequest>,
) -> ApiResult<StatusCode> {
    let user_id = UserId::from_str(user_id.as_str())?;
    let role_id = RoleId::from_str(payload.role_id.as_str())?;

    state
        .security_admin_service
        .assign_user_role(&user, user_id, role_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
