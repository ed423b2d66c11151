//! Social link queries. The set is replaced wholesale, never edited by id.

use sqlx::SqlitePool;

use super::models::{NewSocialLink, SocialLink};
use crate::pagination::PageRequest;

pub async fn list_active(
    pool: &SqlitePool,
    page: Option<PageRequest>,
) -> Result<(Vec<SocialLink>, i64), sqlx::Error> {
    let (limit, offset) = page.map_or((-1, 0), |p| (p.limit(), p.offset()));

    let links = sqlx::query_as::<_, SocialLink>(
        r#"
        SELECT id, platform, url, display_order, is_active
        FROM social_links
        WHERE is_active = 1
        ORDER BY display_order ASC, id ASC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM social_links WHERE is_active = 1")
        .fetch_one(pool)
        .await?;

    Ok((links, total.0))
}

/// Delete every link and insert `links` in one transaction.
pub async fn replace_all(pool: &SqlitePool, links: &[NewSocialLink]) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM social_links")
        .execute(&mut *tx)
        .await?;

    for link in links {
        sqlx::query("INSERT INTO social_links (platform, url, display_order) VALUES (?, ?, ?)")
            .bind(&link.platform)
            .bind(&link.url)
            .bind(link.display_order.unwrap_or(0))
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    tracing::debug!(count = links.len(), "social links replaced");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn link(platform: &str, order: Option<i64>) -> NewSocialLink {
        NewSocialLink {
            platform: Some(platform.to_string()),
            url: Some(format!("https://{}.com/me", platform)),
            display_order: order,
        }
    }

    #[tokio::test]
    async fn test_replace_all_swaps_the_set() {
        let pool = test_pool().await;
        replace_all(&pool, &[link("github", Some(1)), link("twitter", Some(2))])
            .await
            .unwrap();
        replace_all(&pool, &[link("linkedin", None)]).await.unwrap();

        let (links, total) = list_active(&pool, None).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(links[0].platform.as_deref(), Some("linkedin"));
        assert_eq!(links[0].display_order, 0);
    }

    #[tokio::test]
    async fn test_replace_with_empty_set_clears() {
        let pool = test_pool().await;
        replace_all(&pool, &[link("github", Some(1))]).await.unwrap();
        replace_all(&pool, &[]).await.unwrap();
        let (links, _) = list_active(&pool, None).await.unwrap();
        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_links_sorted_by_display_order() {
        let pool = test_pool().await;
        replace_all(
            &pool,
            &[link("b", Some(2)), link("a", Some(1)), link("c", Some(3))],
        )
        .await
        .unwrap();
        let (links, _) = list_active(&pool, None).await.unwrap();
        let order: Vec<_> = links.iter().filter_map(|l| l.platform.clone()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }
}
