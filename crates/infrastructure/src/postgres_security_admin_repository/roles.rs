use super::*;

const ROLE_SELECT: &str = r#"
    SELECT
        roles.id AS role_id,
        roles.name AS role_name,
        roles.display_name,
        roles.is_system,
        roles.is_superadmin,
        COALESCE(
            array_agg(role_capabilities.capability ORDER BY role_capabilities.capability)
                FILTER (WHERE role_capabilities.capability IS NOT NULL),
            '{}'
        ) AS capabilities
    FROM roles
    LEFT JOIN role_capabilities
        ON role_capabilities.role_id = roles.id
"#;

impl PostgresSecurityAdminRepository {
    pub(super) async fn list_roles_impl(&self) -> AppResult<Vec<RoleDefinition>> {
        let rows = sqlx::query_as::<_, RoleRow>(&format!(
            "{ROLE_SELECT} GROUP BY roles.id ORDER BY roles.name"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| query_error("failed to list roles", error))?;

        rows.into_iter().map(role_from_row).collect()
    }

    pub(super) async fn find_role(&self, role_id: RoleId) -> AppResult<RoleDefinition> {
        let row = sqlx::query_as::<_, RoleRow>(&format!(
            "{ROLE_SELECT} WHERE roles.id = $1 GROUP BY roles.id"
        ))
        .bind(role_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| query_error("failed to load role", error))?
        .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))?;

        role_from_row(row)
    }

    pub(super) async fn create_role_impl(
        &self,
        input: CreateRoleInput,
    ) -> AppResult<RoleDefinition> {
        let mut transaction = self
            .pool
            .begin()
            .await
            .map_err(|error| query_error("failed to begin transaction", error))?;

        let role_id = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            INSERT INTO roles (name, display_name, is_system, is_superadmin)
            VALUES ($1, $2, false, false)
            RETURNING id
            "#,
        )
        .bind(input.name.trim())
        .bind(input.display_name.trim())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| {
            if is_unique_violation(&error) {
                return AppError::Conflict(format!("role '{}' already exists", input.name));
            }

            query_error("failed to create role", error)
        })?;

        for capability in &input.capabilities {
            sqlx::query(
                r#"
                INSERT INTO role_capabilities (role_id, capability)
                VALUES ($1, $2)
                ON CONFLICT (role_id, capability) DO NOTHING
                "#,
            )
            .bind(role_id)
            .bind(capability.to_string())
            .execute(&mut *transaction)
            .await
            .map_err(|error| query_error("failed to persist role capabilities", error))?;
        }

        transaction
            .commit()
            .await
            .map_err(|error| query_error("failed to commit transaction", error))?;

        Ok(RoleDefinition {
            role_id: RoleId::from_uuid(role_id),
            name: input.name.trim().to_owned(),
            display_name: input.display_name.trim().to_owned(),
            is_system: false,
            access: RoleAccess::scoped(input.capabilities),
        })
    }

    pub(super) async fn delete_role_impl(&self, role_id: RoleId) -> AppResult<()> {
        let mut transaction = self
            .pool
            .begin()
            .await
            .map_err(|error| query_error("failed to begin transaction", error))?;

        let is_system = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT is_system
            FROM roles
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| query_error("failed to load role", error))?
        .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))?;

        if is_system {
            return Err(AppError::Conflict(format!(
                "role '{role_id}' is a system role and cannot be deleted"
            )));
        }

        let assigned_users = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM users
            WHERE role_id = $1
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| query_error("failed to count role assignments", error))?;

        if assigned_users > 0 {
            return Err(AppError::Conflict(format!(
                "role '{role_id}' is still assigned to {assigned_users} user(s)"
            )));
        }

        sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(role_id.as_uuid())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                if is_foreign_key_violation(&error) {
                    return AppError::Conflict(format!("role '{role_id}' is still assigned"));
                }

                query_error("failed to delete role", error)
            })?;

        transaction
            .commit()
            .await
            .map_err(|error| query_error("failed to commit transaction", error))
    }

    pub(super) async fn grant_role_capability_impl(
        &self,
        role_id: RoleId,
        capability: Capability,
    ) -> AppResult<RoleDefinition> {
        let mut transaction = self
            .pool
            .begin()
            .await
            .map_err(|error| query_error("failed to begin transaction", error))?;

        let (role_name, is_superadmin) = sqlx::query_as::<_, (String, bool)>(
            r#"
            SELECT name, is_superadmin
            FROM roles
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| query_error("failed to load role", error))?
        .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))?;

        if is_superadmin {
            return Err(AppError::Conflict(format!(
                "role '{role_name}' already holds every capability"
            )));
        }

        sqlx::query(
            r#"
            INSERT INTO role_capabilities (role_id, capability)
            VALUES ($1, $2)
            ON CONFLICT (role_id, capability) DO NOTHING
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(capability.to_string())
        .execute(&mut *transaction)
        .await
        .map_err(|error| query_error("failed to grant role capability", error))?;

        transaction
            .commit()
            .await
            .map_err(|error| query_error("failed to commit transaction", error))?;

        self.find_role(role_id).await
    }

    pub(super) async fn revoke_role_capability_impl(
        &self,
        role_id: RoleId,
        capability: Capability,
    ) -> AppResult<RoleDefinition> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM role_capabilities
            WHERE role_id = $1
                AND capability = $2
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(capability.to_string())
        .execute(&self.pool)
        .await
        .map_err(|error| query_error("failed to revoke role capability", error))?
        .rows_affected();

        let role = self.find_role(role_id).await?;
        if rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "role '{}' does not hold capability '{capability}'",
                role.name
            )));
        }

        Ok(role)
    }

    pub(super) async fn assign_user_role_impl(
        &self,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE users
            SET role_id = $2,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(role_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            if is_foreign_key_violation(&error) {
                return AppError::NotFound(format!("role '{role_id}' was not found"));
            }

            query_error("failed to assign role", error)
        })?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!("user '{user_id}' was not found")));
        }

        Ok(())
    }
}
