use std::str::FromStr;

use chrono::{Duration, Utc};
use ecoplaza_application::PermissionRepository;
use ecoplaza_domain::{Capability, OverrideEffect, RoleAccess, UserId};

use crate::postgres_test_support::{insert_user, seeded_role_id, test_pool};

use super::PostgresPermissionRepository;

fn capability(value: &str) -> Capability {
    match Capability::from_str(value) {
        Ok(capability) => capability,
        Err(error) => panic!("invalid test capability '{value}': {error}"),
    }
}

async fn insert_override(
    pool: &sqlx::PgPool,
    user_id: UserId,
    capability: &str,
    effect: OverrideEffect,
    expires_in: Option<Duration>,
) {
    let insert = sqlx::query(
        r#"
        INSERT INTO user_capability_overrides (user_id, capability, effect, expires_at, granted_by)
        VALUES ($1, $2, $3, $4, 'test')
        "#,
    )
    .bind(user_id.as_uuid())
    .bind(capability)
    .bind(effect.as_str())
    .bind(expires_in.map(|duration| Utc::now() + duration))
    .execute(pool)
    .await;

    assert!(insert.is_ok());
}

#[tokio::test]
async fn seeded_vendedor_role_is_scoped() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresPermissionRepository::new(pool.clone());
    let role_id = seeded_role_id(&pool, "vendedor").await;
    let user_id = insert_user(&pool, Some(role_id), true).await;

    let assignment = repository.find_role_assignment(user_id).await;
    let Ok(Some(assignment)) = assignment else {
        panic!("assigned user should resolve");
    };

    assert_eq!(assignment.role_id, role_id);
    assert_eq!(assignment.role_name, "vendedor");
    assert!(assignment.access.allows(capability("leads:read")));
    assert!(assignment.access.allows(capability("leads:update")));
    assert!(!assignment.access.allows(capability("leads:delete")));
}

#[tokio::test]
async fn superadmin_role_resolves_to_wildcard() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresPermissionRepository::new(pool.clone());
    let role_id = seeded_role_id(&pool, "superadmin").await;
    let user_id = insert_user(&pool, Some(role_id), true).await;

    let assignment = repository.find_role_assignment(user_id).await;
    assert!(matches!(
        assignment,
        Ok(Some(assignment)) if assignment.access == RoleAccess::SuperAdmin
    ));
}

#[tokio::test]
async fn inactive_or_unassigned_users_do_not_resolve() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresPermissionRepository::new(pool.clone());
    let role_id = seeded_role_id(&pool, "vendedor").await;
    let inactive = insert_user(&pool, Some(role_id), false).await;
    let unassigned = insert_user(&pool, None, true).await;

    for user_id in [inactive, unassigned, UserId::new()] {
        let assignment = repository.find_role_assignment(user_id).await;
        assert!(matches!(assignment, Ok(None)));
    }

    let assigned = repository.list_assigned_user_ids().await;
    let Ok(assigned) = assigned else {
        panic!("assigned users should list");
    };
    assert!(!assigned.contains(&inactive));
    assert!(!assigned.contains(&unassigned));
}

#[tokio::test]
async fn expired_overrides_are_not_listed() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresPermissionRepository::new(pool.clone());
    let role_id = seeded_role_id(&pool, "vendedor").await;
    let user_id = insert_user(&pool, Some(role_id), true).await;
    insert_override(&pool, user_id, "leads:update", OverrideEffect::Revoke, None).await;
    insert_override(
        &pool,
        user_id,
        "leads:export",
        OverrideEffect::Grant,
        Some(Duration::hours(1)),
    )
    .await;
    insert_override(
        &pool,
        user_id,
        "leads:delete",
        OverrideEffect::Grant,
        Some(Duration::hours(-1)),
    )
    .await;

    let overrides = repository.list_capability_overrides(user_id).await;
    let Ok(overrides) = overrides else {
        panic!("overrides should list");
    };

    let listed = overrides
        .iter()
        .map(|value| (value.capability.to_string(), value.effect))
        .collect::<Vec<_>>();
    assert_eq!(
        listed,
        vec![
            ("leads:export".to_owned(), OverrideEffect::Grant),
            ("leads:update".to_owned(), OverrideEffect::Revoke),
        ]
    );
}
