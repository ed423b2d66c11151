//! Project queries.

use chrono::Utc;
use sqlx::{types::Json, SqlitePool};

use super::models::{NewProject, Project, ProjectUpdate};
use crate::pagination::PageRequest;

const PROJECT_COLUMNS: &str = "id, title, description, image_url, live_url, github_url, \
     technologies, display_order, is_active, created_at, updated_at";

/// Active projects by display order; `None` returns the whole list.
pub async fn list_active(
    pool: &SqlitePool,
    page: Option<PageRequest>,
) -> Result<(Vec<Project>, i64), sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM projects WHERE is_active = 1 ORDER BY display_order ASC, id ASC LIMIT ? OFFSET ?",
        PROJECT_COLUMNS
    );
    let (limit, offset) = page.map_or((-1, 0), |p| (p.limit(), p.offset()));

    let projects = sqlx::query_as::<_, Project>(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM projects WHERE is_active = 1")
        .fetch_one(pool)
        .await?;

    Ok((projects, total.0))
}

pub async fn create(pool: &SqlitePool, new: &NewProject) -> Result<i64, sqlx::Error> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        INSERT INTO projects (title, description, image_url, live_url, github_url,
                              technologies, display_order, is_active, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, 1, ?, ?)
        "#,
    )
    .bind(&new.title)
    .bind(&new.description)
    .bind(&new.image_url)
    .bind(&new.live_url)
    .bind(&new.github_url)
    .bind(Json(&new.technologies))
    .bind(new.display_order)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(result.last_insert_rowid())
}

/// Partial update; returns rows affected.
pub async fn update(pool: &SqlitePool, id: i64, patch: &ProjectUpdate) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE projects SET
            title = COALESCE(?, title),
            description = COALESCE(?, description),
            image_url = COALESCE(?, image_url),
            live_url = COALESCE(?, live_url),
            github_url = COALESCE(?, github_url),
            technologies = COALESCE(?, technologies),
            display_order = COALESCE(?, display_order),
            is_active = COALESCE(?, is_active),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&patch.title)
    .bind(&patch.description)
    .bind(&patch.image_url)
    .bind(&patch.live_url)
    .bind(&patch.github_url)
    .bind(patch.technologies.as_ref().map(Json))
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

    let result = sqlx::query("DELETE FROM projects WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(result.rows_affected())
}
