//! Portfolio key/value configuration.
//!
//! Values share one TEXT column: strings are stored as-is, every other JSON
//! value as its JSON encoding. Reading never fails on content; anything that
//! does not parse as JSON comes back as the raw string.

use chrono::Utc;
use serde_json::{Map, Value};
use sqlx::SqlitePool;

use super::models::ConfigEntry;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Raw(String),
    Json(Value),
}

impl ConfigValue {
    /// Resolve a stored column value.
    pub fn from_stored(stored: Option<&str>) -> Self {
        match stored {
            None => ConfigValue::Json(Value::Null),
            Some(raw) => match serde_json::from_str::<Value>(raw) {
                Ok(value) => ConfigValue::Json(value),
                Err(_) => ConfigValue::Raw(raw.to_string()),
            },
        }
    }

    /// Text written to the column for an incoming value.
    ///
    /// Strings are stored without quotes, so a string that is itself valid
    /// JSON (`"42"`, `"true"`) reads back as that JSON value. The frontend
    /// relies on this to store numbers and flags as plain text.
    pub fn encode(value: &Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn into_json(self) -> Value {
        match self {
            ConfigValue::Raw(s) => Value::String(s),
            ConfigValue::Json(v) => v,
        }
    }
}

pub async fn entries(pool: &SqlitePool) -> Result<Vec<ConfigEntry>, sqlx::Error> {
    sqlx::query_as::<_, ConfigEntry>(
        "SELECT config_key, config_value, updated_at FROM portfolio_config ORDER BY config_key",
    )
    .fetch_all(pool)
    .await
}

/// All config entries as one JSON object.
pub async fn load(pool: &SqlitePool) -> Result<Map<String, Value>, sqlx::Error> {
    let config = entries(pool)
        .await?
        .into_iter()
        .map(|entry| {
            let value = ConfigValue::from_stored(entry.config_value.as_deref()).into_json();
            (entry.config_key, value)
        })
        .collect();
    Ok(config)
}

/// Insert-or-replace every key in one transaction.
pub async fn upsert_many(pool: &SqlitePool, configs: &Map<String, Value>) -> Result<(), sqlx::Error> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    for (key, value) in configs {
        sqlx::query(
            r#"
            INSERT INTO portfolio_config (config_key, config_value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT (config_key) DO UPDATE SET
                config_value = excluded.config_value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(ConfigValue::encode(value))
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    tracing::debug!(keys = configs.len(), "portfolio config upserted");
    Ok(())
}
