use ecoplaza_domain::{Capability, RoleAccess, RoleId};

/// Role definition returned to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDefinition {
    /// Stable role identifier.
    pub role_id: RoleId,
    /// Unique role slug.
    pub name: String,
    /// Human readable role label.
    pub display_name: String,
    /// Indicates a system-managed role.
    pub is_system: bool,
    /// Access granted by the role.
    pub access: RoleAccess,
}

/// Input payload for creating custom roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoleInput {
    /// Unique role slug.
    pub name: String,
    /// Human readable role label.
    pub display_name: String,
    /// Capabilities to attach to the role.
    pub capabilities: Vec<Capability>,
}
