use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use ecoplaza_core::{AppError, AppResult};
use ecoplaza_domain::{
    Capability, CapabilityOverride, OverrideEffect, RoleAccess, RoleId, UserId, UserPermissions,
};
use tokio::sync::Mutex;

use crate::{
    AuditEvent, AuditRepository, PermissionCache, PermissionCacheStats, PermissionRepository,
    UserRoleAssignment,
};

pub(crate) fn capability(value: &str) -> Capability {
    match Capability::from_str(value) {
        Ok(capability) => capability,
        Err(error) => panic!("invalid test capability '{value}': {error}"),
    }
}

pub(crate) fn capability_override(value: &str, effect: OverrideEffect) -> CapabilityOverride {
    CapabilityOverride {
        capability: capability(value),
        effect,
        expires_at: None,
    }
}

#[derive(Default)]
pub(crate) struct FakePermissionRepository {
    assignments: Mutex<HashMap<UserId, UserRoleAssignment>>,
    overrides: Mutex<HashMap<UserId, Vec<CapabilityOverride>>>,
    failure: Mutex<Option<String>>,
    lookups: AtomicUsize,
}

impl FakePermissionRepository {
    pub(crate) async fn assign(&self, user_id: UserId, role_name: &str, access: RoleAccess) {
        self.assignments.lock().await.insert(
            user_id,
            UserRoleAssignment {
                role_id: RoleId::new(),
                role_name: role_name.to_owned(),
                access,
            },
        );
    }

    pub(crate) async fn add_override(&self, user_id: UserId, value: CapabilityOverride) {
        self.overrides
            .lock()
            .await
            .entry(user_id)
            .or_default()
            .push(value);
    }

    pub(crate) async fn fail_with(&self, message: &str) {
        *self.failure.lock().await = Some(message.to_owned());
    }

    pub(crate) async fn recover(&self) {
        *self.failure.lock().await = None;
    }

    pub(crate) fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    async fn check_failure(&self) -> AppResult<()> {
        match self.failure.lock().await.as_ref() {
            Some(message) => Err(AppError::Internal(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PermissionRepository for FakePermissionRepository {
    async fn find_role_assignment(
        &self,
        user_id: UserId,
    ) -> AppResult<Option<UserRoleAssignment>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.check_failure().await?;
        Ok(self.assignments.lock().await.get(&user_id).cloned())
    }

    async fn list_capability_overrides(
        &self,
        user_id: UserId,
    ) -> AppResult<Vec<CapabilityOverride>> {
        self.check_failure().await?;
        Ok(self
            .overrides
            .lock()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_assigned_user_ids(&self) -> AppResult<Vec<UserId>> {
        self.check_failure().await?;
        Ok(self.assignments.lock().await.keys().copied().collect())
    }
}

/// Unbounded cache without expiry; ttl behaviour is covered by the
/// infrastructure adapter's own tests.
#[derive(Default)]
pub(crate) struct FakePermissionCache {
    entries: Mutex<HashMap<UserId, UserPermissions>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

#[async_trait]
impl PermissionCache for FakePermissionCache {
    async fn get(&self, user_id: UserId) -> Option<UserPermissions> {
        let value = self.entries.lock().await.get(&user_id).cloned();
        match value {
            Some(_) => self.hits.fetch_add(1, Ordering::SeqCst),
            None => self.misses.fetch_add(1, Ordering::SeqCst),
        };
        value
    }

    async fn put(&self, user_id: UserId, permissions: UserPermissions) {
        self.entries.lock().await.insert(user_id, permissions);
    }

    async fn invalidate(&self, user_id: UserId) -> bool {
        self.entries.lock().await.remove(&user_id).is_some()
    }

    async fn invalidate_all(&self) -> usize {
        let mut entries = self.entries.lock().await;
        let removed = entries.len();
        entries.clear();
        removed
    }

    async fn warm(&self, entries: Vec<UserPermissions>) -> usize {
        let mut cached = self.entries.lock().await;
        let count = entries.len();
        for permissions in entries {
            cached.insert(permissions.user_id(), permissions);
        }
        count
    }

    async fn stats(&self) -> PermissionCacheStats {
        let total_entries = self.entries.lock().await.len();
        PermissionCacheStats {
            total_entries,
            valid_entries: total_entries,
            expired_entries: 0,
            ttl_seconds: 300,
            max_entries: None,
            hits: self.hits.load(Ordering::SeqCst) as u64,
            misses: self.misses.load(Ordering::SeqCst) as u64,
        }
    }
}

#[derive(Default)]
pub(crate) struct FakeAuditRepository {
    pub(crate) events: Mutex<Vec<AuditEvent>>,
}

#[async_trait]
impl AuditRepository for FakeAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}
