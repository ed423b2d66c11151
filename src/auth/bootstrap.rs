//! Startup provisioning of the admin account.
//!
//! Runs only when a password or a pre-computed hash was configured. A stored
//! hash that already matches the configured password is left alone, so
//! restarting with the same settings writes nothing.

use sqlx::SqlitePool;

use super::password::{hash_password_blocking, verify_password_blocking};
use crate::config::AdminBootstrap;
use crate::db::users;
use crate::error::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Skipped,
    Unchanged,
    Created,
    Updated,
}

pub async fn bootstrap_admin(pool: &SqlitePool, admin: &AdminBootstrap) -> AppResult<BootstrapOutcome> {
    if !admin.is_requested() {
        tracing::debug!("no admin credential configured, skipping bootstrap");
        return Ok(BootstrapOutcome::Skipped);
    }

    let existing = users::find_by_username(pool, &admin.username).await?;

    let password_hash = match (&admin.password, &admin.password_hash) {
        (Some(password), _) => {
            if let Some(user) = &existing {
                if verify_password_blocking(password.clone(), user.password_hash.clone()).await {
                    return Ok(BootstrapOutcome::Unchanged);
                }
            }
            hash_password_blocking(password.clone()).await?
        }
        (None, Some(hash)) => {
            if existing.as_ref().is_some_and(|u| &u.password_hash == hash) {
                return Ok(BootstrapOutcome::Unchanged);
            }
            hash.clone()
        }
        (None, None) => return Ok(BootstrapOutcome::Skipped),
    };

    users::upsert_password(pool, &admin.username, &password_hash).await?;

    let outcome = if existing.is_some() {
        BootstrapOutcome::Updated
    } else {
        BootstrapOutcome::Created
    };
    tracing::info!(username = %admin.username, outcome = ?outcome, "admin account provisioned");

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::{hash_password, verify_password};
    use crate::db::test_pool;

    fn admin(password: Option<&str>, hash: Option<&str>) -> AdminBootstrap {
        AdminBootstrap {
            username: "shuvo".to_string(),
            password: password.map(str::to_string),
            password_hash: hash.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_skipped_without_credentials() {
        let pool = test_pool().await;
        let outcome = bootstrap_admin(&pool, &admin(None, None)).await.unwrap();
        assert_eq!(outcome, BootstrapOutcome::Skipped);
        assert!(users::find_by_username(&pool, "shuvo").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_password_bootstrap_is_idempotent() {
        let pool = test_pool().await;
        let cfg = admin(Some("first-pass"), None);

        assert_eq!(bootstrap_admin(&pool, &cfg).await.unwrap(), BootstrapOutcome::Created);
        let stored = users::find_by_username(&pool, "shuvo").await.unwrap().unwrap();
        assert!(verify_password("first-pass", &stored.password_hash));

        assert_eq!(bootstrap_admin(&pool, &cfg).await.unwrap(), BootstrapOutcome::Unchanged);
        let again = users::find_by_username(&pool, "shuvo").await.unwrap().unwrap();
        assert_eq!(stored.password_hash, again.password_hash);
    }

    #[tokio::test]
    async fn test_new_password_overwrites_hash() {
        let pool = test_pool().await;
        bootstrap_admin(&pool, &admin(Some("first-pass"), None)).await.unwrap();
        let outcome = bootstrap_admin(&pool, &admin(Some("second-pass"), None))
            .await
            .unwrap();
        assert_eq!(outcome, BootstrapOutcome::Updated);

        let stored = users::find_by_username(&pool, "shuvo").await.unwrap().unwrap();
        assert!(verify_password("second-pass", &stored.password_hash));
        assert!(!verify_password("first-pass", &stored.password_hash));
    }

    #[tokio::test]
    async fn test_precomputed_hash() {
        let pool = test_pool().await;
        let hash = hash_password("from-env").unwrap();
        let cfg = admin(None, Some(&hash));

        assert_eq!(bootstrap_admin(&pool, &cfg).await.unwrap(), BootstrapOutcome::Created);
        assert_eq!(bootstrap_admin(&pool, &cfg).await.unwrap(), BootstrapOutcome::Unchanged);
        let stored = users::find_by_username(&pool, "shuvo").await.unwrap().unwrap();
        assert!(verify_password("from-env", &stored.password_hash));
    }
}
