//! Environment-driven configuration, read once at startup.

use crate::auth::token::DEFAULT_TOKEN_TTL_SECONDS;
use crate::db::DbConfig;

/// Development-only signing secret. Refused in production.
pub const DEV_JWT_SECRET: &str = "your-super-secret-jwt-key-change-this-in-production";

const DEFAULT_FRONTEND_URL: &str = "http://localhost:8080";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set to a secure, unique value in production")]
    InsecureSecret,
    #[error("invalid HOST/PORT configuration: {0}")]
    BindAddress(String),
}

#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub username: String,
    pub password: Option<String>,
    pub password_hash: Option<String>,
}

impl AdminBootstrap {
    /// Bootstrap only runs when some credential was supplied.
    pub fn is_requested(&self) -> bool {
        self.password.is_some() || self.password_hash.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_seconds: i64,
    pub frontend_origins: Vec<String>,
    pub admin: AdminBootstrap,
    pub db: DbConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = env_var("ENVIRONMENT")
            .or_else(|| env_var("NODE_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let mut frontend_origins = vec![
            env_var("FRONTEND_URL").unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_string())
        ];
        frontend_origins.extend(split_list(&env_var("FRONTEND_URLS").unwrap_or_default()));

        Self {
            environment,
            host: env_var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: env_parse("PORT").unwrap_or(3001),
            jwt_secret: env_var("JWT_SECRET").unwrap_or_else(|| DEV_JWT_SECRET.to_string()),
            token_ttl_seconds: env_parse("TOKEN_TTL_SECONDS").unwrap_or(DEFAULT_TOKEN_TTL_SECONDS),
            frontend_origins,
            admin: AdminBootstrap {
                username: env_var("ADMIN_USERNAME").unwrap_or_else(|| "admin".to_string()),
                password: env_var("ADMIN_PASSWORD"),
                password_hash: env_var("ADMIN_PASSWORD_HASH"),
            },
            db: DbConfig::default(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Refuse to start in production with the insecure default secret.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.is_production() && (self.jwt_secret.is_empty() || self.jwt_secret == DEV_JWT_SECRET)
        {
            return Err(ConfigError::InsecureSecret);
        }
        if self.is_production() && !self.admin.is_requested() {
            tracing::warn!(
                "SECURITY: neither ADMIN_PASSWORD nor ADMIN_PASSWORD_HASH is set; \
                 the admin account keeps whatever hash is already stored"
            );
        }
        Ok(())
    }

    pub fn bind_address(&self) -> Result<std::net::SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::BindAddress(e.to_string()))
    }
}

/// Non-empty environment variable.
pub(crate) fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

pub(crate) fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env_var(key).and_then(|s| s.trim().parse().ok())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
