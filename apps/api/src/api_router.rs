use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{delete, get, post, put};
use ecoplaza_core::AppError;
use tower_http::trace::TraceLayer;
use tower_sessions::SessionManagerLayer;
use tower_sessions_sqlx_store::PostgresStore;

use crate::state::AppState;
use crate::{auth, handlers, middleware};

mod cors;

pub fn build_router(
    app_state: AppState,
    frontend_url: &str,
    session_layer: SessionManagerLayer<PostgresStore>,
) -> Result<Router, AppError> {
    Ok(app_routes(app_state, frontend_url)?.layer(session_layer))
}

/// Every route with its guards, awaiting the session layer.
fn app_routes(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me_handler))
        .route(
            "/api/permissions",
            get(handlers::permissions::permissions_handler),
        )
        .route(
            "/api/permissions/check",
            get(handlers::permissions::check_permission_handler),
        )
        .route(
            "/api/capabilities",
            get(handlers::permissions::capabilities_handler),
        )
        .route(
            "/api/security/roles",
            get(handlers::security::list_roles_handler)
                .post(handlers::security::create_role_handler),
        )
        .route(
            "/api/security/roles/{role_id}",
            delete(handlers::security::delete_role_handler),
        )
        .route(
            "/api/security/roles/{role_id}/capabilities",
            post(handlers::security::grant_role_capability_handler),
        )
        .route(
            "/api/security/roles/{role_id}/capabilities/{capability}",
            delete(handlers::security::revoke_role_capability_handler),
        )
        .route(
            "/api/security/users/{user_id}/role",
            put(handlers::security::assign_user_role_handler),
        )
        .route(
            "/api/security/users/{user_id}/overrides",
            get(handlers::security::list_user_overrides_handler)
                .put(handlers::security::save_user_override_handler),
        )
        .route(
            "/api/security/users/{user_id}/overrides/{capability}",
            delete(handlers::security::remove_user_override_handler),
        )
        .route_layer(from_fn(middleware::require_auth));

    let dev_routes = Router::new().route(
        "/api/dev/clear-rbac-cache",
        get(handlers::dev_cache::permission_cache_stats_handler)
            .post(handlers::dev_cache::clear_permission_cache_handler),
    );

    let cors_layer = cors::build_cors_layer(frontend_url)?;

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .merge(dev_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state))
}
