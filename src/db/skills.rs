//! Skill queries.

use chrono::Utc;
use sqlx::SqlitePool;

use super::models::{NewSkill, Skill, SkillUpdate};
use crate::pagination::PageRequest;

const SKILL_COLUMNS: &str =
    "id, name, level, category, display_order, is_active, created_at, updated_at";

pub const MIN_LEVEL: i64 = 1;
pub const MAX_LEVEL: i64 = 100;

pub fn is_valid_level(level: i64) -> bool {
    (MIN_LEVEL..=MAX_LEVEL).contains(&level)
}

/// Active skills by display order; `None` returns the whole list.
pub async fn list_active(
    pool: &SqlitePool,
    page: Option<PageRequest>,
) -> Result<(Vec<Skill>, i64), sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM skills WHERE is_active = 1 ORDER BY display_order ASC, id ASC LIMIT ? OFFSET ?",
        SKILL_COLUMNS
    );
    let (limit, offset) = page.map_or((-1, 0), |p| (p.limit(), p.offset()));

    let skills = sqlx::query_as::<_, Skill>(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM skills WHERE is_active = 1")
        .fetch_one(pool)
        .await?;

    Ok((skills, total.0))
}

pub async fn create(pool: &SqlitePool, new: &NewSkill) -> Result<i64, sqlx::Error> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        INSERT INTO skills (name, level, category, display_order, is_active, created_at, updated_at)
        VALUES (?, ?, ?, ?, 1, ?, ?)
        "#,
    )
    .bind(&new.name)
    .bind(new.level)
    .bind(&new.category)
    .bind(new.display_order)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(result.last_insert_rowid())
}

/// Partial update; returns rows affected.
pub async fn update(pool: &SqlitePool, id: i64, patch: &SkillUpdate) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE skills SET
            name = COALESCE(?, name),
            level = COALESCE(?, level),
            category = COALESCE(?, category),
            display_order = COALESCE(?, display_order),
            is_active = COALESCE(?, is_active),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&patch.name)
    .bind(patch.level)
    .bind(&patch.category)
    .bind(patch.display_order)
    .bind(patch.is_active)
    .bind(Utc::now())
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(result.rows_affected())
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query("DELETE FROM skills WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(result.rows_affected())
}
