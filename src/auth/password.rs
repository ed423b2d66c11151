//! Password hashing with bcrypt.
//!
//! Every hash carries its own random salt, so hashing the same password twice
//! yields two different strings that both verify.

use bcrypt::{hash, verify, BcryptError};

use crate::error::{AppError, AppResult};

#[cfg(not(test))]
const HASH_COST: u32 = bcrypt::DEFAULT_COST;

// Minimum bcrypt cost keeps the test suite fast.
#[cfg(test)]
const HASH_COST: u32 = 4;

pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    hash(password, HASH_COST)
}

/// Returns false for a wrong password and for a hash that is not valid bcrypt.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    verify(password, password_hash).unwrap_or(false)
}

lazy_static::lazy_static! {
    /// Hash of a password no account uses.
    static ref DUMMY_HASH: String = hash_password("no-such-account").unwrap_or_default();
}

/// bcrypt is CPU-bound; run it off the async executor.
pub async fn hash_password_blocking(password: String) -> AppResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::internal(format!("hash task failed: {}", e)))?
        .map_err(AppError::from)
}

pub async fn verify_password_blocking(password: String, password_hash: String) -> bool {
    tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
        .await
        .unwrap_or(false)
}

/// Spends one bcrypt verification for a username that does not exist, so a
/// failed login takes the same time whether or not the account is real.
pub async fn verify_unknown_user(password: String) -> bool {
    verify_password_blocking(password, DUMMY_HASH.clone()).await;
    false
}
