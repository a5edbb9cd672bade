use ecoplaza_application::{AuthorizationService, SecurityAdminService};
use sqlx::PgPool;

use crate::api_config::DeploymentMode;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub authorization_service: AuthorizationService,
    pub security_admin_service: SecurityAdminService,
    pub postgres_pool: PgPool,
    pub frontend_url: String,
    pub deployment_mode: DeploymentMode,
}
