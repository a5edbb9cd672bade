use super::*;

impl PostgresSecurityAdminRepository {
    pub(super) async fn save_user_override_impl(
        &self,
        granted_by: &str,
        input: SaveUserOverrideInput,
    ) -> AppResult<UserOverrideEntry> {
        let row = sqlx::query_as::<_, UserOverrideRow>(
            r#"
            INSERT INTO user_capability_overrides (
                user_id,
                capability,
                effect,
                expires_at,
                granted_by
            )
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, capability) DO UPDATE
            SET effect = EXCLUDED.effect,
                expires_at = EXCLUDED.expires_at,
                granted_by = EXCLUDED.granted_by,
                updated_at = now()
            RETURNING user_id, capability, effect, expires_at, granted_by, updated_at
            "#,
        )
        .bind(input.user_id.as_uuid())
        .bind(input.capability.to_string())
        .bind(input.effect.as_str())
        .bind(input.expires_at)
        .bind(granted_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            if is_foreign_key_violation(&error) {
                return AppError::NotFound(format!("user '{}' was not found", input.user_id));
            }

            query_error("failed to save user override", error)
        })?;

        override_from_row(row)
    }

    pub(super) async fn remove_user_override_impl(
        &self,
        user_id: UserId,
        capability: Capability,
    ) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM user_capability_overrides
            WHERE user_id = $1
                AND capability = $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(capability.to_string())
        .execute(&self.pool)
        .await
        .map_err(|error| query_error("failed to remove user override", error))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "override '{capability}' was not found for user '{user_id}'"
            )));
        }

        Ok(())
    }

    pub(super) async fn list_user_overrides_impl(
        &self,
        user_id: UserId,
    ) -> AppResult<Vec<UserOverrideEntry>> {
        let rows = sqlx::query_as::<_, UserOverrideRow>(
            r#"
            SELECT user_id, capability, effect, expires_at, granted_by, updated_at
            FROM user_capability_overrides
            WHERE user_id = $1
            ORDER BY capability
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| query_error("failed to list user overrides", error))?;

        rows.into_iter().map(override_from_row).collect()
    }
}
