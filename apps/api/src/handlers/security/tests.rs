use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use ecoplaza_core::AppError;
use ecoplaza_domain::{AuditAction, RoleAccess};

use crate::api_config::DeploymentMode;
use crate::dto::{
    AssignUserRoleRequest, CreateRoleRequest, GrantRoleCapabilityRequest, SaveUserOverrideRequest,
};
use crate::handlers::permissions::permissions_handler;
use crate::handlers::test_support::{TestContext, capability, json_body, test_context};

use super::{
    assign_user_role_handler, create_role_handler, delete_role_handler,
    grant_role_capability_handler, list_roles_handler, list_user_overrides_handler,
    remove_user_override_handler, save_user_override_handler,
};

async fn seller_capabilities(context: &TestContext) -> serde_json::Value {
    let result = permissions_handler(
        State(context.state.clone()),
        Extension(context.seller.clone()),
    )
    .await;
    let Ok(response) = result else {
        panic!("expected permissions response");
    };

    json_body(response.into_response()).await["permissions"]["capabilities"].clone()
}

#[tokio::test]
async fn seller_cannot_create_roles() {
    let context = test_context(DeploymentMode::Development).await;

    let result = create_role_handler(
        State(context.state.clone()),
        Extension(context.seller.clone()),
        Json(CreateRoleRequest {
            name: "cobranzas".to_owned(),
            display_name: "Cobranzas".to_owned(),
            capabilities: vec!["leads:read".to_owned()],
        }),
    )
    .await;

    let Err(error) = result else {
        panic!("expected forbidden error");
    };
    assert!(matches!(error.0, AppError::Forbidden(_)));

    let events = context.audit_repository.events.lock().await;
    assert_eq!(
        events[0].action,
        AuditAction::SecurityUnauthorizedAccessAttempt
    );
}

#[tokio::test]
async fn admin_creates_and_lists_role() {
    let context = test_context(DeploymentMode::Development).await;

    let created = create_role_handler(
        State(context.state.clone()),
        Extension(context.admin.clone()),
        Json(CreateRoleRequest {
            name: "cobranzas".to_owned(),
            display_name: "Cobranzas".to_owned(),
            capabilities: vec!["leads:read".to_owned(), "leads:export".to_owned()],
        }),
    )
    .await;
    let Ok((status, Json(role))) = created else {
        panic!("expected created role");
    };
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(role.capabilities, vec!["leads:read", "leads:export"]);
    assert!(!role.is_system);

    let listed = list_roles_handler(
        State(context.state.clone()),
        Extension(context.admin.clone()),
    )
    .await;
    let Ok(Json(roles)) = listed else {
        panic!("expected role list");
    };
    assert!(roles.iter().any(|value| value.name == "cobranzas"));
    assert!(
        roles
            .iter()
            .any(|value| value.name == "superadmin" && value.is_superadmin)
    );
}

#[tokio::test]
async fn unknown_capability_in_role_payload_is_rejected() {
    let context = test_context(DeploymentMode::Development).await;

    let result = create_role_handler(
        State(context.state.clone()),
        Extension(context.admin.clone()),
        Json(CreateRoleRequest {
            name: "cobranzas".to_owned(),
            display_name: "Cobranzas".to_owned(),
            capabilities: vec!["cobranzas:read".to_owned()],
        }),
    )
    .await;

    let Err(error) = result else {
        panic!("expected validation error");
    };
    assert!(matches!(error.0, AppError::Validation(_)));
}

#[tokio::test]
async fn role_reassignment_takes_effect_on_next_lookup() {
    let context = test_context(DeploymentMode::Development).await;
    assert_eq!(
        seller_capabilities(&context).await,
        serde_json::json!(["leads:read", "leads:update"])
    );

    let finanzas = context
        .directory
        .add_role(
            "finanzas",
            RoleAccess::scoped([capability("control_pagos:read")]),
        )
        .await;
    let result = assign_user_role_handler(
        State(context.state.clone()),
        Extension(context.admin.clone()),
        Path(context.seller_id.to_string()),
        Json(AssignUserRoleRequest {
            role_id: finanzas.to_string(),
        }),
    )
    .await;
    assert!(matches!(result, Ok(StatusCode::NO_CONTENT)));

    assert_eq!(
        seller_capabilities(&context).await,
        serde_json::json!(["control_pagos:read"])
    );
}

#[tokio::test]
async fn role_grant_reaches_cached_holders() {
    let context = test_context(DeploymentMode::Development).await;
    assert_eq!(
        seller_capabilities(&context).await,
        serde_json::json!(["leads:read", "leads:update"])
    );

    let roles = list_roles_handler(
        State(context.state.clone()),
        Extension(context.admin.clone()),
    )
    .await;
    let Ok(Json(roles)) = roles else {
        panic!("expected role list");
    };
    let Some(vendedor) = roles.into_iter().find(|value| value.name == "vendedor") else {
        panic!("expected vendedor role");
    };

    let granted = grant_role_capability_handler(
        State(context.state.clone()),
        Extension(context.admin.clone()),
        Path(vendedor.role_id),
        Json(GrantRoleCapabilityRequest {
            capability: "leads:export".to_owned(),
        }),
    )
    .await;
    assert!(granted.is_ok());

    assert_eq!(
        seller_capabilities(&context).await,
        serde_json::json!(["leads:read", "leads:update", "leads:export"])
    );
}

#[tokio::test]
async fn revoke_override_applies_immediately_and_can_be_removed() {
    let context = test_context(DeploymentMode::Development).await;
    assert!(seller_capabilities(&context).await.is_array());

    let saved = save_user_override_handler(
        State(context.state.clone()),
        Extension(context.admin.clone()),
        Path(context.seller_id.to_string()),
        Json(SaveUserOverrideRequest {
            capability: "leads:update".to_owned(),
            effect: "revoke".to_owned(),
            expires_at: None,
        }),
    )
    .await;
    let Ok(Json(entry)) = saved else {
        panic!("expected saved override");
    };
    assert_eq!(entry.effect, "revoke");
    assert_eq!(entry.granted_by, context.admin.subject());
    assert_eq!(
        seller_capabilities(&context).await,
        serde_json::json!(["leads:read"])
    );

    let listed = list_user_overrides_handler(
        State(context.state.clone()),
        Extension(context.admin.clone()),
        Path(context.seller_id.to_string()),
    )
    .await;
    assert!(matches!(listed, Ok(Json(ref entries)) if entries.len() == 1));

    let removed = remove_user_override_handler(
        State(context.state.clone()),
        Extension(context.admin.clone()),
        Path((context.seller_id.to_string(), "leads:update".to_owned())),
    )
    .await;
    assert!(matches!(removed, Ok(StatusCode::NO_CONTENT)));
    assert_eq!(
        seller_capabilities(&context).await,
        serde_json::json!(["leads:read", "leads:update"])
    );
}

#[tokio::test]
async fn malformed_override_expiry_is_rejected() {
    let context = test_context(DeploymentMode::Development).await;

    let result = save_user_override_handler(
        State(context.state.clone()),
        Extension(context.admin.clone()),
        Path(context.seller_id.to_string()),
        Json(SaveUserOverrideRequest {
            capability: "leads:export".to_owned(),
            effect: "grant".to_owned(),
            expires_at: Some("next tuesday".to_owned()),
        }),
    )
    .await;

    let Err(error) = result else {
        panic!("expected validation error");
    };
    assert!(matches!(error.0, AppError::Validation(_)));
}

#[tokio::test]
async fn malformed_role_id_is_rejected_before_lookup() {
    let context = test_context(DeploymentMode::Development).await;

    let result = delete_role_handler(
        State(context.state.clone()),
        Extension(context.admin.clone()),
        Path("ventas".to_owned()),
    )
    .await;

    let Err(error) = result else {
        panic!("expected validation error");
    };
    assert!(matches!(error.0, AppError::Validation(_)));
}
