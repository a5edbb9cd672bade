use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use ecoplaza_domain::{RoleId, UserId};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Returns a migrated pool, or `None` when `DATABASE_URL` is not set.
pub(crate) async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres tests: {error}");
    }

    Some(pool)
}

pub(crate) async fn seeded_role_id(pool: &PgPool, name: &str) -> RoleId {
    let role_id = sqlx::query_scalar::<_, uuid::Uuid>("SELECT id FROM roles WHERE name = $1")
        .bind(name)
        .fetch_one(pool)
        .await;

    match role_id {
        Ok(role_id) => RoleId::from_uuid(role_id),
        Err(error) => panic!("seeded role '{name}' should exist: {error}"),
    }
}

pub(crate) async fn insert_user(
    pool: &PgPool,
    role_id: Option<RoleId>,
    is_active: bool,
) -> UserId {
    let user_id = UserId::new();
    let insert = sqlx::query(
        r#"
        INSERT INTO users (id, display_name, is_active, role_id)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(user_id.as_uuid())
    .bind(format!("Test user {user_id}"))
    .bind(is_active)
    .bind(role_id.map(|role_id| role_id.as_uuid()))
    .execute(pool)
    .await;

    assert!(insert.is_ok());
    user_id
}
