/**
 * Health Routes
 * Endpoints for checking backend health status
 */
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Simple health response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    pub environment: String,
}

/// Single service check result
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCheck {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "Server is running".to_string(),
        environment: state.environment.to_string(),
    })
}

/// GET /health/database - database connectivity check
pub async fn health_database(State(state): State<AppState>) -> impl IntoResponse {
    match crate::db::health_check(&state.pool).await {
        Ok(duration) => (
            StatusCode::OK,
            Json(ServiceCheck {
                status: "healthy".to_string(),
                response_time: Some(duration.as_millis() as u64),
                error: None,
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "database health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ServiceCheck {
                    status: "unhealthy".to_string(),
                    response_time: None,
                    error: Some("Database unavailable".to_string()),
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{send, test_app};
    use axum::http::{Method, StatusCode};

    #[tokio::test]
    async fn test_health_reports_environment() {
        let (app, _) = test_app().await;
        let (status, body) = send(app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Server is running");
        assert_eq!(body["environment"], "test");
    }

    #[tokio::test]
    async fn test_health_database() {
        let (app, _) = test_app().await;
        let (status, body) = send(app, Method::GET, "/health/database", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_database_down_is_unavailable() {
        let (app, state) = test_app().await;
        state.pool.close().await;
        let (status, body) = send(app, Method::GET, "/health/database", None, None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "unhealthy");
    }
}
