/**
 * Portfolio Config Routes
 * Free-form key/value settings shown by the frontend
 */
use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde_json::{Map, Value};

use crate::auth::Claims;
use crate::db::config;
use crate::error::{AppError, AppResult};
use crate::routes::ApiResponse;
use crate::AppState;

/// Pull the `configs` object out of an update body.
fn configs_of(body: Value) -> AppResult<Map<String, Value>> {
    match body {
        Value::Object(mut obj) => match obj.remove("configs") {
            Some(Value::Object(configs)) => Ok(configs),
            _ => Err(AppError::validation("Invalid configuration data")),
        },
        _ => Err(AppError::validation("Invalid configuration data")),
    }
}

/// GET /api/portfolio/config
pub async fn get_config(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Map<String, Value>>>> {
    let configs = config::load(&state.pool).await?;
    Ok(Json(ApiResponse::data(configs)))
}

/// PUT /api/portfolio/config
pub async fn update_config(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<ApiResponse<()>>> {
    claims.require_admin()?;
    let Json(body) = payload?;
    let configs = configs_of(body)?;

    config::upsert_many(&state.pool, &configs).await?;
    tracing::info!(keys = configs.len(), "portfolio config updated");

    Ok(Json(ApiResponse::message("Configuration updated successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{admin_token, send, send_raw, test_app, viewer_token};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[test]
    fn test_configs_of_shapes() {
        assert!(configs_of(json!({"configs": {"a": 1}})).is_ok());
        assert!(configs_of(json!({"configs": []})).is_err());
        assert!(configs_of(json!({"configs": "x"})).is_err());
        assert!(configs_of(json!({"other": {}})).is_err());
        assert!(configs_of(json!([1, 2])).is_err());
    }

    #[tokio::test]
    async fn test_get_config_is_public_and_empty() {
        let (app, _) = test_app().await;
        let (status, body) = send(app, Method::GET, "/api/portfolio/config", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!({}));
    }

    #[tokio::test]
    async fn test_upsert_then_read_back() {
        let (app, state) = test_app().await;
        let token = admin_token(&state);

        for title in ["X", "Y"] {
            let (status, _) = send(
                app.clone(),
                Method::PUT,
                "/api/portfolio/config",
                Some(&token),
                Some(json!({"configs": {"siteTitle": title}})),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (_, body) = send(app, Method::GET, "/api/portfolio/config", None, None).await;
        assert_eq!(body["data"], json!({"siteTitle": "Y"}));

        let rows = config::entries(&state.pool).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_structured_values_survive() {
        let (app, state) = test_app().await;
        let token = admin_token(&state);
        let configs = json!({"hero": {"title": "Hi", "tags": ["a", "b"]}, "visits": 42});

        send(
            app.clone(),
            Method::PUT,
            "/api/portfolio/config",
            Some(&token),
            Some(json!({"configs": configs.clone()})),
        )
        .await;

        let (_, body) = send(app, Method::GET, "/api/portfolio/config", None, None).await;
        assert_eq!(body["data"], configs);
    }

    #[tokio::test]
    async fn test_update_rejects_bad_shapes() {
        let (app, state) = test_app().await;
        let token = admin_token(&state);

        let (status, body) = send(
            app.clone(),
            Method::PUT,
            "/api/portfolio/config",
            Some(&token),
            Some(json!({"siteTitle": "X"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid configuration data");

        let status = send_raw(app, Method::PUT, "/api/portfolio/config", &token, "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_requires_admin() {
        let (app, state) = test_app().await;
        let body = json!({"configs": {"siteTitle": "X"}});

        let (status, _) = send(
            app.clone(),
            Method::PUT,
            "/api/portfolio/config",
            None,
            Some(body.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let token = viewer_token(&state);
        let (status, _) = send(
            app,
            Method::PUT,
            "/api/portfolio/config",
            Some(&token),
            Some(body),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
