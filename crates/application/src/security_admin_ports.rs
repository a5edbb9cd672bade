mod overrides;
mod repositories;
mod roles;

pub use overrides::{SaveUserOverrideInput, UserOverrideEntry};
pub use repositories::SecurityAdminRepository;
pub use roles::{CreateRoleInput, RoleDefinition};
