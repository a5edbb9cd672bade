use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use ecoplaza_core::UserIdentity;
use ecoplaza_domain::{Capability, RoleId, UserId};

use crate::dto::{
    AssignUserRoleRequest, CreateRoleRequest, GrantRoleCapabilityRequest, RoleResponse,
    SaveUserOverrideRequest, UserOverrideResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

mod overrides;
mod roles;

#[cfg(test)]
mod tests;

pub use overrides::{
    list_user_overrides_handler, remove_user_override_handler, save_user_override_handler,
};
pub use roles::{
    assign_user_role_handler, create_role_handler, delete_role_handler,
    grant_role_capability_handler, list_roles_handler, revoke_role_capability_handler,
};
