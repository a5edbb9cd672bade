use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::warn;

use ecoplaza_application::{PermissionRepository, UserRoleAssignment};
use ecoplaza_core::AppResult;
use ecoplaza_domain::{Capability, CapabilityOverride, OverrideEffect, RoleAccess, RoleId, UserId};

use crate::sqlx_errors::query_error;

#[cfg(test)]
mod tests;

/// PostgreSQL-backed repository for role and override lookups.
#[derive(Clone)]
pub struct PostgresPermissionRepository {
    pool: PgPool,
}

impl PostgresPermissionRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RoleAssignmentRow {
    role_id: uuid::Uuid,
    role_name: String,
    is_superadmin: bool,
    capabilities: Vec<String>,
}

#[derive(Debug, FromRow)]
struct OverrideRow {
    capability: String,
    effect: String,
    expires_at: Option<DateTime<Utc>>,
}

#[async_trait]
impl PermissionRepository for PostgresPermissionRepository {
    async fn find_role_assignment(
        &self,
        user_id: UserId,
    ) -> AppResult<Option<UserRoleAssignment>> {
        let row = sqlx::query_as::<_, RoleAssignmentRow>(
            r#"
            SELECT
                roles.id AS role_id,
                roles.name AS role_name,
                roles.is_superadmin,
                COALESCE(
                    array_agg(role_capabilities.capability ORDER BY role_capabilities.capability)
                        FILTER (WHERE role_capabilities.capability IS NOT NULL),
                    '{}'
                ) AS capabilities
            FROM users
            INNER JOIN roles
                ON roles.id = users.role_id
            LEFT JOIN role_capabilities
                ON role_capabilities.role_id = roles.id
            WHERE users.id = $1
                AND users.is_active
            GROUP BY roles.id, roles.name, roles.is_superadmin
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| query_error("failed to load role assignment", error))?;

        Ok(row.map(|row| {
            let access = if row.is_superadmin {
                RoleAccess::SuperAdmin
            } else {
                RoleAccess::scoped(
                    row.capabilities
                        .iter()
                        .filter_map(|value| decode_capability(value, row.role_name.as_str())),
                )
            };

            UserRoleAssignment {
                role_id: RoleId::from_uuid(row.role_id),
                role_name: row.role_name,
                access,
            }
        }))
    }

    async fn list_capability_overrides(
        &self,
        user_id: UserId,
    ) -> AppResult<Vec<CapabilityOverride>> {
        let rows = sqlx::query_as::<_, OverrideRow>(
            r#"
            SELECT capability, effect, expires_at
            FROM user_capability_overrides
            WHERE user_id = $1
                AND (expires_at IS NULL OR expires_at > now())
            ORDER BY capability
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| query_error("failed to load capability overrides", error))?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let capability = decode_capability(row.capability.as_str(), "override")?;
                let effect = OverrideEffect::from_str(row.effect.as_str())
                    .inspect_err(|error| warn!(%error, %user_id, "skipping stored override"))
                    .ok()?;

                Some(CapabilityOverride {
                    capability,
                    effect,
                    expires_at: row.expires_at,
                })
            })
            .collect())
    }

    async fn list_assigned_user_ids(&self) -> AppResult<Vec<UserId>> {
        let rows = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            SELECT id
            FROM users
            WHERE is_active
                AND role_id IS NOT NULL
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| query_error("failed to list assigned users", error))?;

        Ok(rows.into_iter().map(UserId::from_uuid).collect())
    }
}

/// Stored capabilities outside the catalog grant nothing.
fn decode_capability(value: &str, source: &str) -> Option<Capability> {
    Capability::from_str(value)
        .inspect_err(|error| warn!(%error, source, "skipping stored capability"))
        .ok()
}
