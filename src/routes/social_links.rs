/**
 * Social Link Routes
 * The whole set is replaced on update
 */
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Extension, Json,
};
use serde_json::Value;

use crate::auth::Claims;
use crate::db::{
    models::{NewSocialLink, SocialLink},
    social_links,
};
use crate::error::{AppError, AppResult};
use crate::pagination::{PageQuery, Pagination};
use crate::routes::ApiResponse;
use crate::AppState;

fn links_of(body: Value) -> AppResult<Vec<NewSocialLink>> {
    let invalid = || AppError::validation("Social links must be an array");

    let Value::Object(mut obj) = body else {
        return Err(invalid());
    };
    let Some(Value::Array(items)) = obj.remove("socialLinks") else {
        return Err(invalid());
    };

    items
        .into_iter()
        .map(|item| {
            serde_json::from_value::<NewSocialLink>(item)
                .map_err(|e| AppError::validation(format!("Invalid social link: {}", e)))
        })
        .collect()
}

/// GET /api/portfolio/social-links
pub async fn list_social_links(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> AppResult<Json<ApiResponse<Vec<SocialLink>>>> {
    let Query(query) = query?;
    let page = query.is_requested().then(|| query.resolve());

    let (items, total) = social_links::list_active(&state.pool, page).await?;
    let pagination = page.map(|p| Pagination::new(p, total));

    Ok(Json(ApiResponse::data(items).with_pagination(pagination)))
}

/// PUT /api/portfolio/social-links
pub async fn update_social_links(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<ApiResponse<()>>> {
    claims.require_admin()?;
    let Json(body) = payload?;
    let links = links_of(body)?;

    social_links::replace_all(&state.pool, &links).await?;
    tracing::info!(count = links.len(), "social links updated");

    Ok(Json(ApiResponse::message("Social links updated successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{admin_token, send, test_app};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[test]
    fn test_links_of_requires_array() {
        assert!(links_of(json!({"socialLinks": []})).unwrap().is_empty());
        assert!(links_of(json!({"socialLinks": {}})).is_err());
        assert!(links_of(json!({})).is_err());
        assert!(links_of(json!("x")).is_err());
        assert!(links_of(json!({"socialLinks": [{"display_order": "first"}]})).is_err());
    }

    #[tokio::test]
    async fn test_replace_set_then_list() {
        let (app, state) = test_app().await;
        let token = admin_token(&state);

        let first = json!({"socialLinks": [
            {"platform": "github", "url": "https://github.com/me", "display_order": 2},
            {"platform": "mastodon", "url": "https://fosstodon.org/@me", "display_order": 1}
        ]});
        let (status, _) = send(
            app.clone(),
            Method::PUT,
            "/api/portfolio/social-links",
            Some(&token),
            Some(first),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(app.clone(), Method::GET, "/api/portfolio/social-links", None, None).await;
        let items = body["data"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["platform"], "mastodon");

        let second = json!({"socialLinks": [{"platform": "email"}]});
        send(
            app.clone(),
            Method::PUT,
            "/api/portfolio/social-links",
            Some(&token),
            Some(second),
        )
        .await;

        let (_, body) = send(app, Method::GET, "/api/portfolio/social-links", None, None).await;
        let items = body["data"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["display_order"], 0);
        assert!(items[0]["url"].is_null());
    }

    #[tokio::test]
    async fn test_list_paginates_when_asked() {
        let (app, state) = test_app().await;
        let token = admin_token(&state);
        let links: Vec<Value> = (0..3).map(|i| json!({"platform": format!("p{}", i)})).collect();
        send(
            app.clone(),
            Method::PUT,
            "/api/portfolio/social-links",
            Some(&token),
            Some(json!({"socialLinks": links})),
        )
        .await;

        let (_, body) = send(
            app,
            Method::GET,
            "/api/portfolio/social-links?page=2&limit=2",
            None,
            None,
        )
        .await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["pagination"]["currentPage"], 2);
    }

    #[tokio::test]
    async fn test_update_rejects_non_array() {
        let (app, state) = test_app().await;
        let token = admin_token(&state);
        let (status, body) = send(
            app,
            Method::PUT,
            "/api/portfolio/social-links",
            Some(&token),
            Some(json!({"socialLinks": "github"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Social links must be an array");
    }
}
