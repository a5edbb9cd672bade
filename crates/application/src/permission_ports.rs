use async_trait::async_trait;
use ecoplaza_core::AppResult;
use ecoplaza_domain::{CapabilityOverride, RoleAccess, RoleId, UserId, UserPermissions};

/// Role currently assigned to an active user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRoleAssignment {
    /// Assigned role identifier.
    pub role_id: RoleId,
    /// Assigned role name.
    pub role_name: String,
    /// Access granted by the role itself, before overrides.
    pub access: RoleAccess,
}

/// Repository port for the durable permission model.
#[async_trait]
pub trait PermissionRepository: Send + Sync {
    /// Finds the role of an active user, `None` when the user is missing,
    /// inactive or unassigned.
    async fn find_role_assignment(
        &self,
        user_id: UserId,
    ) -> AppResult<Option<UserRoleAssignment>>;

    /// Lists per-user overrides that have not expired.
    async fn list_capability_overrides(
        &self,
        user_id: UserId,
    ) -> AppResult<Vec<CapabilityOverride>>;

    /// Lists active users that hold a role assignment.
    async fn list_assigned_user_ids(&self) -> AppResult<Vec<UserId>>;
}

/// Point-in-time view of the permission cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionCacheStats {
    /// Entries stored, including expired ones not yet removed.
    pub total_entries: usize,
    /// Entries younger than the ttl.
    pub valid_entries: usize,
    /// Entries at or past the ttl.
    pub expired_entries: usize,
    /// Configured ttl in seconds.
    pub ttl_seconds: u64,
    /// Configured capacity, if bounded.
    pub max_entries: Option<usize>,
    /// Reads served from the cache.
    pub hits: u64,
    /// Reads that found no fresh entry.
    pub misses: u64,
}

/// Cache port for resolved user permissions.
///
/// Cache operations never fail; an unusable entry is reported as a miss.
#[async_trait]
pub trait PermissionCache: Send + Sync {
    /// Returns a fresh snapshot for the user, if one is cached.
    async fn get(&self, user_id: UserId) -> Option<UserPermissions>;

    /// Stores or replaces the snapshot for the user.
    async fn put(&self, user_id: UserId, permissions: UserPermissions);

    /// Removes one user's entry and reports whether it existed.
    async fn invalidate(&self, user_id: UserId) -> bool;

    /// Removes every entry and returns how many were present.
    async fn invalidate_all(&self) -> usize;

    /// Stores many snapshots at once and returns how many were stored.
    async fn warm(&self, entries: Vec<UserPermissions>) -> usize;

    /// Returns entry counts and hit/miss counters.
    async fn stats(&self) -> PermissionCacheStats;
}
