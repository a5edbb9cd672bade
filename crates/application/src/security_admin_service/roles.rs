use super::*;

use ecoplaza_core::AppError;
use ecoplaza_domain::{RoleId, UserId};
use tracing::info;

use crate::security_admin_ports::{CreateRoleInput, RoleDefinition};

const MAX_ROLE_NAME_LENGTH: usize = 50;

impl SecurityAdminService {
    /// Returns every role for administrative users.
    pub async fn list_roles(&self, actor: &UserIdentity) -> AppResult<Vec<RoleDefinition>> {
        self.require_usuarios(actor, Action::Read).await?;
        self.repository.list_roles().await
    }

    /// Creates a scoped role and emits an audit event.
    pub async fn create_role(
        &self,
        actor: &UserIdentity,
        input: CreateRoleInput,
    ) -> AppResult<RoleDefinition> {
        self.require_usuarios(actor, Action::AssignPermissions).await?;
        validate_role_name(input.name.as_str())?;
        if input.display_name.trim().is_empty() {
            return Err(AppError::Validation(
                "role display_name must not be empty".to_owned(),
            ));
        }

        let role = self.repository.create_role(input).await?;

        self.append_audit(
            actor,
            AuditAction::SecurityRoleCreated,
            "rbac_role",
            role.role_id.to_string(),
            format!("created role '{}'", role.name),
        )
        .await?;

        Ok(role)
    }

    /// Deletes a custom role that no user references.
    pub async fn delete_role(&self, actor: &UserIdentity, role_id: RoleId) -> AppResult<()> {
        self.require_usuarios(actor, Action::AssignPermissions).await?;

        self.repository.delete_role(role_id).await?;

        self.append_audit(
            actor,
            AuditAction::SecurityRoleDeleted,
            "rbac_role",
            role_id.to_string(),
            format!("deleted role '{role_id}'"),
        )
        .await
    }

    /// Adds a capability to a role and drops every cached snapshot.
    pub async fn grant_role_capability(
        &self,
        actor: &UserIdentity,
        role_id: RoleId,
        capability: Capability,
    ) -> AppResult<RoleDefinition> {
        self.require_usuarios(actor, Action::AssignPermissions).await?;

        let role = self
            .repository
            .grant_role_capability(role_id, capability)
            .await?;
        self.authorization_service.invalidate_all().await;

        self.append_audit(
            actor,
            AuditAction::SecurityRoleCapabilityGranted,
            "rbac_role_capability",
            format!("{role_id}:{capability}"),
            format!("granted '{capability}' to role '{}'", role.name),
        )
        .await?;

        Ok(role)
    }

    /// Removes a capability from a role and drops every cached snapshot.
    pub async fn revoke_role_capability(
        &self,
        actor: &UserIdentity,
        role_id: RoleId,
        capability: Capability,
    ) -> AppResult<RoleDefinition> {
        self.require_usuarios(actor, Action::AssignPermissions).await?;

        let role = self
            .repository
            .revoke_role_capability(role_id, capability)
            .await?;
        self.authorization_service.invalidate_all().await;

        self.append_audit(
            actor,
            AuditAction::SecurityRoleCapabilityRevoked,
            "rbac_role_capability",
            format!("{role_id}:{capability}"),
            format!("revoked '{capability}' from role '{}'", role.name),
        )
        .await?;

        Ok(role)
    }

    /// Assigns a role to a user and drops that user's cached snapshot.
    pub async fn assign_user_role(
        &self,
        actor: &UserIdentity,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<()> {
        self.require_usuarios(actor, Action::ChangeRole).await?;

        self.repository.assign_user_role(user_id, role_id).await?;
        self.authorization_service.invalidate_user(user_id).await;
        info!(%user_id, %role_id, "assigned user role");

        self.append_audit(
            actor,
            AuditAction::SecurityUserRoleAssigned,
            "rbac_user_role",
            user_id.to_string(),
            format!("assigned role '{role_id}' to user '{user_id}'"),
        )
        .await
    }
}

fn validate_role_name(name: &str) -> AppResult<()> {
    let mut characters = name.chars();
    let starts_with_letter = characters
        .next()
        .is_some_and(|character| character.is_ascii_lowercase());
    let valid_rest = characters.all(|character| {
        character.is_ascii_lowercase() || character.is_ascii_digit() || character == '_'
    });

    if !starts_with_letter || !valid_rest || name.len() > MAX_ROLE_NAME_LENGTH {
        return Err(AppError::Validation(format!(
            "role name '{name}' must be a lowercase slug of at most {MAX_ROLE_NAME_LENGTH} characters"
        )));
    }

    Ok(())
}
