//! Database Models - structs representing database tables (used by sqlx/serde).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Admin user model
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Contact message model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub read_status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New message from the public contact form
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageStats {
    pub total: i64,
    pub unread: i64,
    pub today: i64,
}

/// Project model; `technologies` is stored as JSON text
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    #[sqlx(json)]
    pub technologies: Vec<String>,
    pub display_order: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub technologies: Vec<String>,
    pub display_order: i64,
}

/// Partial project update; `None` keeps the stored value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub display_order: Option<i64>,
    pub is_active: Option<bool>,
}

/// Skill model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Skill {
    pub id: i64,
    pub name: String,
    pub level: i64,
    pub category: String,
    pub display_order: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSkill {
    pub name: String,
    pub level: i64,
    pub category: String,
    pub display_order: i64,
}

/// Partial skill update; `None` keeps the stored value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkillUpdate {
    pub name: Option<String>,
    pub level: Option<i64>,
    pub category: Option<String>,
    pub display_order: Option<i64>,
    pub is_active: Option<bool>,
}

/// Social link model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SocialLink {
    pub id: i64,
    pub platform: Option<String>,
    pub url: Option<String>,
    pub display_order: i64,
    pub is_active: bool,
}

/// One element of a social links replacement set
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSocialLink {
    pub platform: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub display_order: Option<i64>,
}

/// Raw portfolio_config row
#[derive(Debug, Clone, FromRow)]
pub struct ConfigEntry {
    pub config_key: String,
    pub config_value: Option<String>,
    pub updated_at: DateTime<Utc>,
}
