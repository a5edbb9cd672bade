use serde::{Deserialize, Serialize};
use ts_rs::TS;

mod conversions;

/// Incoming payload for custom role creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-role-request.ts"
)]
pub struct CreateRoleRequest {
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub capabilities: Vec<String>,
}

/// Incoming payload for granting one capability to a role.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/grant-role-capability-request.ts"
)]
pub struct GrantRoleCapabilityRequest {
    pub capability: String,
}

/// Incoming payload for assigning a user's role.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/assign-user-role-request.ts"
)]
pub struct AssignUserRoleRequest {
    pub role_id: String,
}

/// Incoming payload for saving a per-user override.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/save-user-override-request.ts"
)]
pub struct SaveUserOverrideRequest {
    pub capability: String,
    /// `grant` or `revoke`.
    pub effect: String,
    /// RFC 3339 timestamp; omitted for a permanent override.
    #[serde(default)]
    pub expires_at: Option<String>,
}

/// API representation of an RBAC role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/role-response.ts"
)]
pub struct RoleResponse {
    pub role_id: String,
    pub name: String,
    pub display_name: String,
    pub is_system: bool,
    pub is_superadmin: bool,
    pub capabilities: Vec<String>,
}

/// API representation of a stored per-user override.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/user-override-response.ts"
)]
pub struct UserOverrideResponse {
    pub user_id: String,
    pub capability: String,
    pub effect: String,
    pub expires_at: Option<String>,
    pub granted_by: String,
    pub updated_at: String,
}
