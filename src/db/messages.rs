//! Contact message queries.

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

use super::models::{Message, MessageStats, NewMessage};
use crate::pagination::PageRequest;

const MESSAGE_COLUMNS: &str =
    "id, name, email, subject, message, read_status, created_at, updated_at";

/// Newest first; returns the page and the total matching rows.
pub async fn list(
    pool: &SqlitePool,
    page: PageRequest,
    unread_only: bool,
) -> Result<(Vec<Message>, i64), sqlx::Error> {
    let filter = if unread_only {
        " WHERE read_status = 0"
    } else {
        ""
    };

    let messages = sqlx::query_as::<_, Message>(&format!(
        "SELECT {} FROM messages{} ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
        MESSAGE_COLUMNS, filter
    ))
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(pool)
    .await?;

    let total: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM messages{}", filter))
        .fetch_one(pool)
        .await?;

    Ok((messages, total.0))
}

pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<Message>, sqlx::Error> {
    sqlx::query_as::<_, Message>(&format!(
        "SELECT {} FROM messages WHERE id = ?",
        MESSAGE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn create(pool: &SqlitePool, new: &NewMessage) -> Result<i64, sqlx::Error> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        INSERT INTO messages (name, email, subject, message, read_status, created_at, updated_at)
        VALUES (?, ?, ?, ?, 0, ?, ?)
        "#,
    )
    .bind(&new.name)
    .bind(&new.email)
    .bind(&new.subject)
    .bind(&new.message)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(result.last_insert_rowid())
}

/// Returns the number of rows touched (0 when the id does not exist).
pub async fn set_read_status(pool: &SqlitePool, id: i64, read: bool) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let result =
        sqlx::query("UPDATE messages SET read_status = ?, updated_at = ? WHERE id = ?")
            .bind(read)
            .bind(Utc::now())
            .bind(id)
            .execute(&mut *tx)
            .await?;

    tx.commit().await?;
    Ok(result.rows_affected())
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query("DELETE FROM messages WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(result.rows_affected())
}

/// `today` compares calendar dates (UTC), not timestamps.
pub async fn stats(pool: &SqlitePool, today: NaiveDate) -> Result<MessageStats, sqlx::Error> {
    let (total, unread, today): (i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT
            COUNT(*),
            COALESCE(SUM(CASE WHEN read_status = 0 THEN 1 ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN DATE(created_at) = ? THEN 1 ELSE 0 END), 0)
        FROM messages
        "#,
    )
    .bind(today.format("%Y-%m-%d").to_string())
    .fetch_one(pool)
    .await?;

    Ok(MessageStats {
        total,
        unread,
        today,
    })
}
