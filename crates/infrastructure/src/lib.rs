//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_permission_cache;
mod postgres_audit_repository;
mod postgres_permission_repository;
mod postgres_security_admin_repository;
mod sqlx_errors;

#[cfg(test)]
mod postgres_test_support;

pub use in_memory_permission_cache::InMemoryPermissionCache;
pub use postgres_audit_repository::PostgresAuditRepository;
pub use postgres_permission_repository::PostgresPermissionRepository;
pub use postgres_security_admin_repository::PostgresSecurityAdminRepository;
