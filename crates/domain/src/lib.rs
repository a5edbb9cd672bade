//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod access;
mod security;
mod user;

pub use access::{CapabilityOverride, OverrideEffect, RoleAccess, UserPermissions};
pub use security::{Action, AuditAction, Capability, Module};
pub use user::{RoleId, UserId};
