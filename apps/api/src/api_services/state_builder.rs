use std::sync::Arc;

use ecoplaza_application::{
    AuditRepository, AuthorizationService, PermissionCache, PermissionStore, SecurityAdminService,
};
use ecoplaza_infrastructure::{
    InMemoryPermissionCache, PostgresAuditRepository, PostgresPermissionRepository,
    PostgresSecurityAdminRepository,
};
use sqlx::PgPool;
use tracing::info;

use crate::api_config::ApiConfig;
use crate::state::AppState;

pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> AppState {
    let cache_config = config.permission_cache;
    let permission_cache: Arc<dyn PermissionCache> = Arc::new(InMemoryPermissionCache::new(
        cache_config.ttl,
        cache_config.max_entries,
    ));
    info!(
        ttl_seconds = cache_config.ttl.as_secs(),
        max_entries = cache_config.max_entries.map(|value| value.get()),
        "configured permission cache"
    );

    let audit_repository: Arc<dyn AuditRepository> =
        Arc::new(PostgresAuditRepository::new(pool.clone()));

    let authorization_service = AuthorizationService::new(
        PermissionStore::new(Arc::new(PostgresPermissionRepository::new(pool.clone()))),
        permission_cache,
        audit_repository.clone(),
    );

    let security_admin_service = SecurityAdminService::new(
        authorization_service.clone(),
        Arc::new(PostgresSecurityAdminRepository::new(pool.clone())),
        audit_repository,
    );

    AppState {
        authorization_service,
        security_admin_service,
        postgres_pool: pool,
        frontend_url: config.frontend_url.clone(),
        deployment_mode: config.deployment_mode,
    }
}
