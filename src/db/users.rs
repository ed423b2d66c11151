//! Admin user queries.

use chrono::Utc;
use sqlx::SqlitePool;

use super::models::User;

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, created_at FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

/// Create the user or overwrite its password hash; returns the user id.
pub async fn upsert_password(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
) -> Result<i64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO users (username, password_hash, created_at)
        VALUES (?, ?, ?)
        ON CONFLICT (username) DO UPDATE SET password_hash = excluded.password_hash
        RETURNING id
        "#,
    )
    .bind(username)
    .bind(password_hash)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn test_upsert_creates_then_overwrites() {
        let pool = test_pool().await;
        assert!(find_by_username(&pool, "shuvo").await.unwrap().is_none());

        let id = upsert_password(&pool, "shuvo", "hash-1").await.unwrap();
        let again = upsert_password(&pool, "shuvo", "hash-2").await.unwrap();
        assert_eq!(id, again);

        let user = find_by_username(&pool, "shuvo").await.unwrap().unwrap();
        assert_eq!(user.password_hash, "hash-2");

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count.0, 1);
    }
}
