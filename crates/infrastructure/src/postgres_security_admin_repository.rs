use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use ecoplaza_application::{
    CreateRoleInput, RoleDefinition, SaveUserOverrideInput, SecurityAdminRepository,
    UserOverrideEntry,
};
use ecoplaza_core::{AppError, AppResult};
use ecoplaza_domain::{Capability, OverrideEffect, RoleAccess, RoleId, UserId};

use crate::sqlx_errors::{is_foreign_key_violation, is_unique_violation, query_error};

mod overrides;
mod roles;


/// PostgreSQL-backed repository for role, assignment and override
/// administration.
#[derive(Clone)]
pub struct PostgresSecurityAdminRepository {
    pool: PgPool,
}

impl PostgresSecurityAdminRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RoleRow {
    role_id: uuid::Uuid,
    role_name: String,
    display_name: String,
    is_system: bool,
    is_superadmin: bool,
    capabilities: Vec<String>,
}

#[derive(Debug, FromRow)]
struct UserOverrideRow {
    user_id: uuid::Uuid,
    capability: String,
    effect: String,
    expires_at: Option<DateTime<Utc>>,
    granted_by: String,
    updated_at: DateTime<Utc>,
}

#[async_trait]
impl SecurityAdminRepository for PostgresSecurityAdminRepository {
    async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>> {
        self.list_roles_impl().await
    }

    async fn create_role(&self, input: CreateRoleInput) -> AppResult<RoleDefinition> {
        self.create_role_impl(input).await
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        self.delete_role_impl(role_id).await
    }

    async fn grant_role_capability(
        &self,
        role_id: RoleId,
        capability: Capability,
    ) -> AppResult<RoleDefinition> {
        self.grant_role_capability_impl(role_id, capability).await
    }

    async fn revoke_role_capability(
        &self,
        role_id: RoleId,
        capability: Capability,
    ) -> AppResult<RoleDefinition> {
        self.revoke_role_capability_impl(role_id, capability).await
    }

    async fn assign_user_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        self.assign_user_role_impl(user_id, role_id).await
    }

    async fn save_user_override(
        &self,
        granted_by: &str,
        input: SaveUserOverrideInput,
    ) -> AppResult<UserOverrideEntry> {
        self.save_user_override_impl(granted_by, input).await
    }

    async fn remove_user_override(&self, user_id: UserId, capability: Capability) -> AppResult<()> {
        self.remove_user_override_impl(user_id, capability).await
    }

    async fn list_user_overrides(&self, user_id: UserId) -> AppResult<Vec<UserOverrideEntry>> {
        self.list_user_overrides_impl(user_id).await
    }
}

fn role_from_row(row: RoleRow) -> AppResult<RoleDefinition> {
    let access = if row.is_superadmin {
        RoleAccess::SuperAdmin
    } else {
        let capabilities = row
            .capabilities
            .iter()
            .map(|value| {
                Capability::from_str(value).map_err(|error| {
                    AppError::Internal(format!(
                        "invalid stored capability '{value}' for role '{}': {error}",
                        row.role_name
                    ))
                })
            })
            .collect::<AppResult<Vec<_>>>()?;
        RoleAccess::scoped(capabilities)
    };

    Ok(RoleDefinition {
        role_id: RoleId::from_uuid(row.role_id),
        name: row.role_name,
        display_name: row.display_name,
        is_system: row.is_system,
        access,
    })
}

fn override_from_row(row: UserOverrideRow) -> AppResult<UserOverrideEntry> {
    let capability = Capability::from_str(row.capability.as_str()).map_err(|error| {
        AppError::Internal(format!(
            "invalid stored override capability '{}': {error}",
            row.capability
        ))
    })?;
    let effect = OverrideEffect::from_str(row.effect.as_str()).map_err(|error| {
        AppError::Internal(format!(
            "invalid stored override effect '{}': {error}",
            row.effect
        ))
    })?;

    Ok(UserOverrideEntry {
        user_id: UserId::from_uuid(row.user_id),
        capability,
        effect,
        expires_at: row.expires_at,
        granted_by: row.granted_by,
        updated_at: row.updated_at,
    })
}
