use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use ecoplaza_core::AppError;
use serde::{Deserialize, Serialize};

use crate::{Capability, RoleId, UserId};

/// Access granted by a role.
///
/// The superadmin bypass is a variant of its own rather than a role name
/// compared at check time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "capabilities", rename_all = "snake_case")]
pub enum RoleAccess {
    /// Satisfies every capability check.
    SuperAdmin,
    /// Satisfies exactly the listed capabilities.
    Scoped(BTreeSet<Capability>),
}

impl RoleAccess {
    /// Creates scoped access from any capability iterator, deduplicating it.
    #[must_use]
    pub fn scoped(capabilities: impl IntoIterator<Item = Capability>) -> Self {
        Self::Scoped(capabilities.into_iter().collect())
    }

    /// Returns whether this access satisfies the capability.
    #[must_use]
    pub fn allows(&self, capability: Capability) -> bool {
        match self {
            Self::SuperAdmin => true,
            Self::Scoped(capabilities) => capabilities.contains(&capability),
        }
    }

    /// Returns whether this is the wildcard variant.
    #[must_use]
    pub fn is_superadmin(&self) -> bool {
        matches!(self, Self::SuperAdmin)
    }

    /// Returns the capabilities this access satisfies, expanding the wildcard
    /// to the full catalog.
    #[must_use]
    pub fn capabilities(&self) -> Vec<Capability> {
        match self {
            Self::SuperAdmin => Capability::all(),
            Self::Scoped(capabilities) => capabilities.iter().copied().collect(),
        }
    }

    /// Applies per-user overrides on top of role access.
    ///
    /// Grants are added before revokes are removed, so a capability that is
    /// both granted and revoked ends up revoked. Wildcard access is never
    /// narrowed.
    #[must_use]
    pub fn with_overrides<'a>(
        self,
        overrides: impl IntoIterator<Item = &'a CapabilityOverride>,
    ) -> Self {
        let Self::Scoped(mut capabilities) = self else {
            return Self::SuperAdmin;
        };

        let mut revoked = BTreeSet::new();
        for value in overrides {
            match value.effect {
                OverrideEffect::Grant => {
                    capabilities.insert(value.capability);
                }
                OverrideEffect::Revoke => {
                    revoked.insert(value.capability);
                }
            }
        }

        Self::Scoped(capabilities.difference(&revoked).copied().collect())
    }
}

/// Direction of a per-user override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideEffect {
    /// Adds a capability the role does not grant.
    Grant,
    /// Removes a capability the role grants.
    Revoke,
}

impl OverrideEffect {
    /// Returns a stable storage value for this effect.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grant => "grant",
            Self::Revoke => "revoke",
        }
    }
}

impl FromStr for OverrideEffect {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "grant" => Ok(Self::Grant),
            "revoke" => Ok(Self::Revoke),
            _ => Err(AppError::Validation(format!(
                "unknown override effect '{value}'"
            ))),
        }
    }
}

/// Per-user capability override layered on top of the assigned role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityOverride {
    /// Overridden capability.
    pub capability: Capability,
    /// Grant or revoke.
    pub effect: OverrideEffect,
    /// Optional expiry; the override is ignored from this instant on.
    pub expires_at: Option<DateTime<Utc>>,
}

impl CapabilityOverride {
    /// Returns whether the override still applies at `now`.
    #[must_use]
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|expires_at| expires_at > now)
    }
}

/// Resolved, user-scoped permission snapshot.
///
/// Built from the user's role and active overrides; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPermissions {
    user_id: UserId,
    role_id: RoleId,
    role_name: String,
    access: RoleAccess,
    overrides: Vec<CapabilityOverride>,
}

impl UserPermissions {
    /// Resolves effective access from a role and the overrides active at `now`.
    #[must_use]
    pub fn resolve(
        user_id: UserId,
        role_id: RoleId,
        role_name: impl Into<String>,
        role_access: RoleAccess,
        overrides: Vec<CapabilityOverride>,
        now: DateTime<Utc>,
    ) -> Self {
        let overrides: Vec<CapabilityOverride> = overrides
            .into_iter()
            .filter(|value| value.is_active_at(now))
            .collect();
        let access = role_access.with_overrides(&overrides);

        Self {
            user_id,
            role_id,
            role_name: role_name.into(),
            access,
            overrides,
        }
    }

    /// Returns the user these permissions belong to.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the assigned role identifier.
    #[must_use]
    pub fn role_id(&self) -> RoleId {
        self.role_id
    }

    /// Returns the assigned role name.
    #[must_use]
    pub fn role_name(&self) -> &str {
        self.role_name.as_str()
    }

    /// Returns effective access after overrides.
    #[must_use]
    pub fn access(&self) -> &RoleAccess {
        &self.access
    }

    /// Returns the active overrides that were applied.
    #[must_use]
    pub fn overrides(&self) -> &[CapabilityOverride] {
        &self.overrides
    }

    /// Returns whether the user holds the capability.
    #[must_use]
    pub fn has(&self, capability: Capability) -> bool {
        self.access.allows(capability)
    }

    /// Returns whether the user holds at least one of the capabilities.
    #[must_use]
    pub fn has_any(&self, capabilities: &[Capability]) -> bool {
        capabilities
            .iter()
            .any(|capability| self.has(*capability))
    }

    /// Returns whether the user holds every capability.
    #[must_use]
    pub fn has_all(&self, capabilities: &[Capability]) -> bool {
        capabilities
            .iter()
            .all(|capability| self.has(*capability))
    }
}
