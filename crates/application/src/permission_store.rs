use std::sync::Arc;

use chrono::Utc;
use ecoplaza_core::{AppError, AppResult};
use ecoplaza_domain::{UserId, UserPermissions};
use tracing::error;

use crate::PermissionRepository;

/// Loads effective permissions from the durable permission model.
#[derive(Clone)]
pub struct PermissionStore {
    repository: Arc<dyn PermissionRepository>,
}

impl PermissionStore {
    /// Creates a store over a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn PermissionRepository>) -> Self {
        Self { repository }
    }

    /// Resolves the user's role and active overrides into one snapshot.
    ///
    /// Returns `Ok(None)` when the user has no role assignment. Every
    /// repository failure surfaces as [`AppError::Unavailable`].
    pub async fn load(&self, user_id: UserId) -> AppResult<Option<UserPermissions>> {
        let Some(assignment) = self
            .repository
            .find_role_assignment(user_id)
            .await
            .map_err(|error| store_unavailable(user_id, error))?
        else {
            return Ok(None);
        };

        let overrides = self
            .repository
            .list_capability_overrides(user_id)
            .await
            .map_err(|error| store_unavailable(user_id, error))?;

        Ok(Some(UserPermissions::resolve(
            user_id,
            assignment.role_id,
            assignment.role_name,
            assignment.access,
            overrides,
            Utc::now(),
        )))
    }

    /// Lists users that currently resolve to a role.
    pub async fn assigned_user_ids(&self) -> AppResult<Vec<UserId>> {
        self.repository
            .list_assigned_user_ids()
            .await
            .map_err(|error| {
                error!(%error, "failed to list users with role assignments");
                AppError::Unavailable(format!("permission store unavailable: {error}"))
            })
    }
}

fn store_unavailable(user_id: UserId, error: AppError) -> AppError {
    error!(%user_id, %error, "permission lookup failed");

    match error {
        AppError::Unavailable(_) => error,
        other => AppError::Unavailable(format!("permission store unavailable: {other}")),
    }
}
