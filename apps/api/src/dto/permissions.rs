use ecoplaza_application::PermissionCacheStats;
use ecoplaza_domain::{Capability, CapabilityOverride, UserPermissions};
use serde::Serialize;
use ts_rs::TS;

/// Payload of the caller's permission lookup; `permissions` is `null` while
/// the caller has no role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/permissions-response.ts"
)]
pub struct PermissionsResponse {
    pub permissions: Option<UserPermissionsResponse>,
}

/// API representation of resolved user permissions.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/user-permissions-response.ts"
)]
pub struct UserPermissionsResponse {
    pub user_id: String,
    pub role_id: String,
    pub role_name: String,
    pub is_superadmin: bool,
    /// Effective capabilities after overrides, as `module:action` strings.
    pub capabilities: Vec<String>,
    pub overrides: Vec<CapabilityOverrideResponse>,
}

/// API representation of an active per-user override.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/capability-override-response.ts"
)]
pub struct CapabilityOverrideResponse {
    pub capability: String,
    pub effect: String,
    pub expires_at: Option<String>,
}

/// Result of a single capability check.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/capability-check-response.ts"
)]
pub struct CapabilityCheckResponse {
    pub capability: String,
    pub allowed: bool,
}

/// Catalog entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/capability-response.ts"
)]
pub struct CapabilityResponse {
    pub capability: String,
    pub module: String,
    pub action: String,
}

/// Permission cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/permission-cache-stats-response.ts"
)]
pub struct PermissionCacheStatsResponse {
    pub total_entries: usize,
    pub valid_entries: usize,
    pub expired_entries: usize,
    #[ts(type = "number")]
    pub ttl_seconds: u64,
    pub max_entries: Option<usize>,
    #[ts(type = "number")]
    pub hits: u64,
    #[ts(type = "number")]
    pub misses: u64,
}

/// Development-only cache statistics payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/permission-cache-summary-response.ts"
)]
pub struct PermissionCacheSummaryResponse {
    pub success: bool,
    pub stats: PermissionCacheStatsResponse,
}

/// Development-only cache clear payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/clear-permission-cache-response.ts"
)]
pub struct ClearPermissionCacheResponse {
    pub success: bool,
    pub message: String,
    pub removed: usize,
    pub before: PermissionCacheStatsResponse,
    pub after: PermissionCacheStatsResponse,
}

impl From<UserPermissions> for UserPermissionsResponse {
    fn from(value: UserPermissions) -> Self {
        Self {
            user_id: value.user_id().to_string(),
            role_id: value.role_id().to_string(),
            role_name: value.role_name().to_owned(),
            is_superadmin: value.access().is_superadmin(),
            capabilities: value
                .access()
                .capabilities()
                .into_iter()
                .map(|capability| capability.to_string())
                .collect(),
            overrides: value
                .overrides()
                .iter()
                .map(CapabilityOverrideResponse::from)
                .collect(),
        }
    }
}

impl From<&CapabilityOverride> for CapabilityOverrideResponse {
    fn from(value: &CapabilityOverride) -> Self {
        Self {
            capability: value.capability.to_string(),
            effect: value.effect.as_str().to_owned(),
            expires_at: value.expires_at.map(|expires_at| expires_at.to_rfc3339()),
        }
    }
}

impl From<Capability> for CapabilityResponse {
    fn from(value: Capability) -> Self {
        Self {
            capability: value.to_string(),
            module: value.module().as_str().to_owned(),
            action: value.action().as_str().to_owned(),
        }
    }
}

impl From<PermissionCacheStats> for PermissionCacheStatsResponse {
    fn from(value: PermissionCacheStats) -> Self {
        Self {
            total_entries: value.total_entries,
            valid_entries: value.valid_entries,
            expired_entries: value.expired_entries,
            ttl_seconds: value.ttl_seconds,
            max_entries: value.max_entries,
            hits: value.hits,
            misses: value.misses,
        }
    }
}
