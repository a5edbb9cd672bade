//! Application services and ports for permission resolution and
//! security administration.

#![forbid(unsafe_code)]

mod audit_ports;
mod authorization_service;
mod permission_ports;
mod permission_store;
mod security_admin_ports;
mod security_admin_service;

#[cfg(test)]
mod test_support;

pub use audit_ports::{AuditEvent, AuditRepository};
pub use authorization_service::{AuthorizationService, actor_user_id};
pub use permission_ports::{
    PermissionCache, PermissionCacheStats, PermissionRepository, UserRoleAssignment,
};
pub use permission_store::PermissionStore;
pub use security_admin_ports::{
    CreateRoleInput, RoleDefinition, SaveUserOverrideInput, SecurityAdminRepository,
    UserOverrideEntry,
};
pub use security_admin_service::SecurityAdminService;
