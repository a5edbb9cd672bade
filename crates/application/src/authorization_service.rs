use std::str::FromStr;
use std::sync::Arc;

use ecoplaza_core::{AppError, AppResult, UserIdentity};
use ecoplaza_domain::{AuditAction, Capability, UserId, UserPermissions};
use tracing::{debug, info, warn};

use crate::{AuditEvent, AuditRepository, PermissionCache, PermissionCacheStats, PermissionStore};


/// Application service for capability checks backed by a read-through cache.
#[derive(Clone)]
pub struct AuthorizationService {
    store: PermissionStore,
    cache: Arc<dyn PermissionCache>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service.
    #[must_use]
    pub fn new(
        store: PermissionStore,
        cache: Arc<dyn PermissionCache>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            store,
            cache,
            audit_repository,
        }
    }

    /// Returns the user's permissions, consulting the cache first.
    ///
    /// Only successful lookups are cached: an unassigned user or a failed
    /// store read is looked up again on the next call. An admin write that
    /// lands between the store read and the cache write can leave the older
    /// snapshot cached for at most one ttl.
    pub async fn resolve_permissions(&self, user_id: UserId) -> AppResult<Option<UserPermissions>> {
        if let Some(permissions) = self.cache.get(user_id).await {
            return Ok(Some(permissions));
        }

        let Some(permissions) = self.store.load(user_id).await? else {
            debug!(%user_id, "user has no role assignment");
            return Ok(None);
        };

        self.cache.put(user_id, permissions.clone()).await;
        Ok(Some(permissions))
    }

    /// Returns permissions for the authenticated caller.
    pub async fn resolve_actor_permissions(
        &self,
        actor: &UserIdentity,
    ) -> AppResult<Option<UserPermissions>> {
        self.resolve_permissions(actor_user_id(actor)?).await
    }

    /// Returns whether the user currently holds the capability.
    ///
    /// A user without a role holds nothing. Store failures are returned as
    /// errors, never as `false`.
    pub async fn has_capability(&self, user_id: UserId, capability: Capability) -> AppResult<bool> {
        Ok(self
            .resolve_permissions(user_id)
            .await?
            .is_some_and(|permissions| permissions.has(capability)))
    }

    /// Returns whether the user holds at least one of the capabilities.
    pub async fn has_any_capability(
        &self,
        user_id: UserId,
        capabilities: &[Capability],
    ) -> AppResult<bool> {
        Ok(self
            .resolve_permissions(user_id)
            .await?
            .is_some_and(|permissions| permissions.has_any(capabilities)))
    }

    /// Returns whether the user holds every capability.
    pub async fn has_all_capabilities(
        &self,
        user_id: UserId,
        capabilities: &[Capability],
    ) -> AppResult<bool> {
        Ok(self
            .resolve_permissions(user_id)
            .await?
            .is_some_and(|permissions| permissions.has_all(capabilities)))
    }

    /// Checks the caller's capability and records denied attempts.
    pub async fn check_capability(
        &self,
        actor: &UserIdentity,
        capability: Capability,
    ) -> AppResult<bool> {
        let user_id = actor_user_id(actor)?;
        let allowed = self.has_capability(user_id, capability).await?;
        if !allowed {
            self.record_denied_attempt(actor, capability).await;
        }

        Ok(allowed)
    }

    /// Ensures the caller holds the capability.
    pub async fn require_capability(
        &self,
        actor: &UserIdentity,
        capability: Capability,
    ) -> AppResult<()> {
        if self.check_capability(actor, capability).await? {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "subject '{}' is missing capability '{capability}'",
            actor.subject()
        )))
    }

    /// Drops one user's cached permissions.
    pub async fn invalidate_user(&self, user_id: UserId) -> bool {
        let removed = self.cache.invalidate(user_id).await;
        if removed {
            info!(%user_id, "invalidated cached permissions");
        }

        removed
    }

    /// Drops every cached permission snapshot.
    pub async fn invalidate_all(&self) -> usize {
        let removed = self.cache.invalidate_all().await;
        info!(removed, "cleared permission cache");
        removed
    }

    /// Returns cache statistics.
    pub async fn cache_stats(&self) -> PermissionCacheStats {
        self.cache.stats().await
    }

    /// Loads every assigned user into the cache.
    pub async fn warm_cache(&self) -> AppResult<usize> {
        let mut snapshots = Vec::new();
        for user_id in self.store.assigned_user_ids().await? {
            if let Some(permissions) = self.store.load(user_id).await? {
                snapshots.push(permissions);
            }
        }

        let warmed = self.cache.warm(snapshots).await;
        info!(warmed, "warmed permission cache");
        Ok(warmed)
    }

    async fn record_denied_attempt(&self, actor: &UserIdentity, capability: Capability) {
        warn!(
            subject = actor.subject(),
            %capability,
            "unauthorized access attempt"
        );

        let result = self
            .audit_repository
            .append_event(AuditEvent {
                subject: actor.subject().to_owned(),
                action: AuditAction::SecurityUnauthorizedAccessAttempt,
                resource_type: capability.module().as_str().to_owned(),
                resource_id: capability.to_string(),
                detail: Some(format!("required capability '{capability}'")),
            })
            .await;

        if let Err(error) = result {
            warn!(%error, "failed to record unauthorized access attempt");
        }
    }
}

/// Parses the session subject into a user id.
pub fn actor_user_id(actor: &UserIdentity) -> AppResult<UserId> {
    UserId::from_str(actor.subject()).map_err(|_| {
        AppError::Unauthorized("session subject is not a valid user id".to_owned())
    })
}
