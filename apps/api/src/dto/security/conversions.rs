use ecoplaza_application::{RoleDefinition, UserOverrideEntry};

use super::{RoleResponse, UserOverrideResponse};

impl From<RoleDefinition> for RoleResponse {
    fn from(value: RoleDefinition) -> Self {
        Self {
            role_id: value.role_id.to_string(),
            name: value.name,
            display_name: value.display_name,
            is_system: value.is_system,
            is_superadmin: value.access.is_superadmin(),
            capabilities: value
                .access
                .capabilities()
                .into_iter()
                .map(|capability| capability.to_string())
                .collect(),
        }
    }
}

impl From<UserOverrideEntry> for UserOverrideResponse {
    fn from(value: UserOverrideEntry) -> Self {
        Self {
            user_id: value.user_id.to_string(),
            capability: value.capability.to_string(),
            effect: value.effect.as_str().to_owned(),
            expires_at: value.expires_at.map(|expires_at| expires_at.to_rfc3339()),
            granted_by: value.granted_by,
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}
