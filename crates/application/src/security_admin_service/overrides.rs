use super::*;

use chrono::Utc;
use ecoplaza_core::AppError;
use ecoplaza_domain::UserId;

use crate::security_admin_ports::{SaveUserOverrideInput, UserOverrideEntry};

impl SecurityAdminService {
    /// Lists stored overrides for a user.
    pub async fn list_user_overrides(
        &self,
        actor: &UserIdentity,
        user_id: UserId,
    ) -> AppResult<Vec<UserOverrideEntry>> {
        self.require_usuarios(actor, Action::Read).await?;
        self.repository.list_user_overrides(user_id).await
    }

    /// Saves a grant or revoke override and drops the user's cached snapshot.
    pub async fn save_user_override(
        &self,
        actor: &UserIdentity,
        input: SaveUserOverrideInput,
    ) -> AppResult<UserOverrideEntry> {
        self.require_usuarios(actor, Action::AssignPermissions).await?;

        if input.expires_at.is_some_and(|expires_at| expires_at <= Utc::now()) {
            return Err(AppError::Validation(
                "override expires_at must be in the future".to_owned(),
            ));
        }

        let entry = self
            .repository
            .save_user_override(actor.subject(), input)
            .await?;
        self.authorization_service.invalidate_user(entry.user_id).await;

        self.append_audit(
            actor,
            AuditAction::SecurityUserOverrideSaved,
            "rbac_user_override",
            format!("{}:{}", entry.user_id, entry.capability),
            format!(
                "saved {} override for '{}' on user '{}'",
                entry.effect.as_str(),
                entry.capability,
                entry.user_id
            ),
        )
        .await?;

        Ok(entry)
    }

    /// Removes an override and drops the user's cached snapshot.
    pub async fn remove_user_override(
        &self,
        actor: &UserIdentity,
        user_id: UserId,
        capability: Capability,
    ) -> AppResult<()> {
        self.require_usuarios(actor, Action::AssignPermissions).await?;

        self.repository.remove_user_override(user_id, capability).await?;
        self.authorization_service.invalidate_user(user_id).await;

        self.append_audit(
            actor,
            AuditAction::SecurityUserOverrideRemoved,
            "rbac_user_override",
            format!("{user_id}:{capability}"),
            format!("removed override for '{capability}' on user '{user_id}'"),
        )
        .await
    }
}
