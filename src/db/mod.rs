//! Data store gateway.
//!
//! Every operation borrows a pooled connection for its own duration. Writes
//! run inside a `sqlx::Transaction`: it is committed on success, and dropping
//! it on any early return rolls back and hands the connection back to the pool.

pub mod config;
pub mod messages;
pub mod models;
pub mod projects;
pub mod skills;
pub mod social_links;
pub mod users;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};
use std::str::FromStr;
use std::time::Duration;

use crate::config::{env_parse, env_var};

const DEFAULT_DB_PATH: &str = "database/portfolio.db";

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        let url = env_var("DATABASE_URL").unwrap_or_else(|| {
            let path = env_var("DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
            format!("sqlite://{}", path)
        });

        Self {
            url,
            max_connections: env_parse("DB_POOL_MAX").unwrap_or(5),
            connect_timeout_secs: env_parse("DB_CONNECT_TIMEOUT").unwrap_or(10),
            idle_timeout_secs: env_parse("DB_IDLE_TIMEOUT").unwrap_or(300),
        }
    }
}

impl DbConfig {
    /// A private in-memory store, used by tests.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            connect_timeout_secs: 10,
            idle_timeout_secs: 300,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

pub async fn init_pool(config: &DbConfig) -> Result<SqlitePool, sqlx::Error> {
    tracing::info!("Initializing database connection pool...");
    tracing::debug!(url = %config.url, "database location");

    let mut options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true);

    if !config.is_in_memory() {
        ensure_parent_dir(options.get_filename());
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    let mut pool_options = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs));

    // An in-memory database lives exactly as long as its connection.
    pool_options = if config.is_in_memory() {
        pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        pool_options.idle_timeout(Duration::from_secs(config.idle_timeout_secs))
    };

    let pool = pool_options.connect_with(options).await?;

    sqlx::query("SELECT 1").fetch_one(&pool).await?;

    tracing::info!("Database connection pool initialized successfully");

    Ok(pool)
}

fn ensure_parent_dir(path: &std::path::Path) {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!(dir = %parent.display(), error = %e, "could not create database directory");
            }
        }
    }
}

pub async fn health_check(pool: &SqlitePool) -> Result<Duration, sqlx::Error> {
    let start = std::time::Instant::now();
    sqlx::query("SELECT 1").fetch_one(pool).await?;
    Ok(start.elapsed())
}

/// Initial table creation. There are no later migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    tracing::info!("Running database migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT UNIQUE NOT NULL,
            password_hash TEXT NOT NULL,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS messages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            subject TEXT NOT NULL,
            message TEXT NOT NULL,
            read_status BOOLEAN NOT NULL DEFAULT 0,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS projects (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            image_url TEXT,
            live_url TEXT,
            github_url TEXT,
            technologies TEXT NOT NULL DEFAULT '[]',
            display_order INTEGER NOT NULL DEFAULT 0,
            is_active BOOLEAN NOT NULL DEFAULT 1,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS skills (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            level INTEGER NOT NULL CHECK (level BETWEEN 1 AND 100),
            category TEXT NOT NULL,
            display_order INTEGER NOT NULL DEFAULT 0,
            is_active BOOLEAN NOT NULL DEFAULT 1,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS social_links (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            platform TEXT,
            url TEXT,
            display_order INTEGER NOT NULL DEFAULT 0,
            is_active BOOLEAN NOT NULL DEFAULT 1
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS portfolio_config (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            config_key TEXT UNIQUE NOT NULL,
            config_value TEXT,
            updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_messages_created_at ON messages(created_at DESC);
        CREATE INDEX IF NOT EXISTS idx_messages_read_status ON messages(read_status);
        CREATE INDEX IF NOT EXISTS idx_projects_active_order ON projects(is_active, display_order);
        CREATE INDEX IF NOT EXISTS idx_skills_active_order ON skills(is_active, display_order);
        CREATE INDEX IF NOT EXISTS idx_social_links_order ON social_links(display_order)
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database migrations completed successfully");

    Ok(())
}

/// In-memory pool with the schema applied.
#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let pool = init_pool(&DbConfig::in_memory()).await.unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}
