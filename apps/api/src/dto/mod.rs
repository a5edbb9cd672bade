mod common;
mod permissions;
mod security;

pub use common::{HealthDependencyStatus, HealthResponse, UserIdentityResponse};
pub use permissions::{
    CapabilityCheckResponse, CapabilityResponse, ClearPermissionCacheResponse,
    PermissionCacheStatsResponse, PermissionCacheSummaryResponse, PermissionsResponse,
    UserPermissionsResponse,
};
pub use security::{
    AssignUserRoleRequest, CreateRoleRequest, GrantRoleCapabilityRequest, RoleResponse,
    SaveUserOverrideRequest, UserOverrideResponse,
};
