use chrono::{DateTime, Utc};
use ecoplaza_domain::{Capability, OverrideEffect, UserId};

/// Input payload for saving a per-user override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveUserOverrideInput {
    /// User receiving the override.
    pub user_id: UserId,
    /// Overridden capability.
    pub capability: Capability,
    /// Grant or revoke.
    pub effect: OverrideEffect,
    /// Optional expiry instant.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Stored override projection for administrative views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserOverrideEntry {
    /// User the override belongs to.
    pub user_id: UserId,
    /// Overridden capability.
    pub capability: Capability,
    /// Grant or revoke.
    pub effect: OverrideEffect,
    /// Optional expiry instant.
    pub expires_at: Option<DateTime<Utc>>,
    /// Subject that last saved the override.
    pub granted_by: String,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
