use async_trait::async_trait;

use ecoplaza_core::AppResult;
use ecoplaza_domain::{Capability, RoleId, UserId};

use super::overrides::{SaveUserOverrideInput, UserOverrideEntry};
use super::roles::{CreateRoleInput, RoleDefinition};

/// Repository port for role, assignment and override administration.
#[async_trait]
pub trait SecurityAdminRepository: Send + Sync {
    /// Lists all roles with their access.
    async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>>;

    /// Creates a scoped role; `Conflict` when the name is taken.
    async fn create_role(&self, input: CreateRoleInput) -> AppResult<RoleDefinition>;

    /// Deletes a role; `Conflict` for system roles or roles still assigned.
    async fn delete_role(&self, role_id: RoleId) -> AppResult<()>;

    /// Adds a capability to a role.
    async fn grant_role_capability(
        &self,
        role_id: RoleId,
        capability: Capability,
    ) -> AppResult<RoleDefinition>;

    /// Removes a capability from a role.
    async fn revoke_role_capability(
        &self,
        role_id: RoleId,
        capability: Capability,
    ) -> AppResult<RoleDefinition>;

    /// Replaces the role assigned to a user.
    async fn assign_user_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()>;

    /// Inserts or replaces the override for one user and capability.
    async fn save_user_override(
        &self,
        granted_by: &str,
        input: SaveUserOverrideInput,
    ) -> AppResult<UserOverrideEntry>;

    /// Removes the override for one user and capability.
    async fn remove_user_override(&self, user_id: UserId, capability: Capability) -> AppResult<()>;

    /// Lists stored overrides for a user, expired ones included.
    async fn list_user_overrides(&self, user_id: UserId) -> AppResult<Vec<UserOverrideEntry>>;
}
