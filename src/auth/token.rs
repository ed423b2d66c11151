//! Signed, time-limited bearer tokens (HS256 JWT).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::Error as JwtError, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Default token lifetime: one day.
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 86_400;

/// The only role that may mutate content.
pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token")]
    Invalid,
    #[error("failed to encode token: {0}")]
    Encode(JwtError),
}

/// Who a token was issued to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub username: String,
    pub role: String,
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }

    /// Per-handler role gate.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            tracing::warn!(user = %self.username, role = %self.role, "non-admin access rejected");
            Err(AppError::Forbidden)
        }
    }
}

/// Issues and validates tokens with one process-wide secret.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_seconds: i64,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self::with_ttl(secret, DEFAULT_TOKEN_TTL_SECONDS)
    }

    pub fn with_ttl(secret: &str, ttl_seconds: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against an explicit clock in `validate_at`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_seconds,
        }
    }

    pub fn issue(&self, identity: &Identity) -> Result<String, TokenError> {
        self.issue_at(identity, self.ttl_seconds, Utc::now())
    }

    pub fn issue_at(
        &self,
        identity: &Identity,
        ttl_seconds: i64,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            id: identity.id,
            username: identity.username.clone(),
            role: identity.role.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(TokenError::Encode)
    }

    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        self.validate_at(token, Utc::now())
    }

    /// Verifies the signature first; the expiry is only consulted on a
    /// token whose signature checked out.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "token rejected");
            TokenError::Invalid
        })?;

        if now.timestamp() >= data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> Identity {
        Identity {
            id: 1,
            username: "shuvo".to_string(),
            role: ADMIN_ROLE.to_string(),
        }
    }

    #[test]
    fn test_issue_then_validate_round_trips_identity() {
        let svc = TokenService::new("test-secret");
        let token = svc.issue(&admin()).unwrap();
        let claims = svc.validate(&token).unwrap();
        assert_eq!(claims.id, 1);
        assert_eq!(claims.username, "shuvo");
        assert_eq!(claims.role, ADMIN_ROLE);
        assert_eq!(claims.exp - claims.iat, DEFAULT_TOKEN_TTL_SECONDS);
    }

    #[test]
    fn test_token_expires_after_ttl() {
        let svc = TokenService::new("test-secret");
        let issued = Utc::now();
        let token = svc.issue_at(&admin(), 60, issued).unwrap();

        assert!(svc.validate_at(&token, issued + Duration::seconds(59)).is_ok());
        assert!(matches!(
            svc.validate_at(&token, issued + Duration::seconds(60)),
            Err(TokenError::Expired)
        ));
        assert!(matches!(
            svc.validate_at(&token, issued + Duration::days(2)),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_other_secret_is_invalid() {
        let a = TokenService::new("secret-a");
        let b = TokenService::new("secret-b");
        let token = a.issue(&admin()).unwrap();
        assert!(matches!(b.validate(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_instances_sharing_a_secret_interoperate() {
        let a = TokenService::new("shared");
        let b = TokenService::new("shared");
        let token = a.issue(&admin()).unwrap();
        assert_eq!(b.validate(&token).unwrap().username, "shuvo");
    }

    #[test]
    fn test_garbage_and_tampered_tokens_are_invalid() {
        let svc = TokenService::new("test-secret");
        assert!(matches!(svc.validate("invalid.jwt.token"), Err(TokenError::Invalid)));
        assert!(matches!(svc.validate(""), Err(TokenError::Invalid)));

        // Splice another identity's payload onto the admin token's signature.
        let token = svc.issue(&admin()).unwrap();
        let other = svc
            .issue(&Identity {
                id: 2,
                username: "mallory".to_string(),
                role: ADMIN_ROLE.to_string(),
            })
            .unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let tampered = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);
        assert!(matches!(svc.validate(&tampered), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_other_algorithm_is_invalid() {
        let secret = "test-secret";
        let svc = TokenService::new(secret);
        let claims = Claims {
            id: 1,
            username: "shuvo".to_string(),
            role: ADMIN_ROLE.to_string(),
            iat: Utc::now().timestamp(),
            exp: Utc::now().timestamp() + 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();
        assert!(matches!(svc.validate(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_require_admin() {
        let mut claims = Claims {
            id: 1,
            username: "u".to_string(),
            role: ADMIN_ROLE.to_string(),
            iat: 0,
            exp: 1,
        };
        assert!(claims.require_admin().is_ok());
        claims.role = "viewer".to_string();
        assert!(matches!(claims.require_admin(), Err(AppError::Forbidden)));
    }
}
