/**
 * Authentication Routes
 * Login, token verification and logout for the single admin account
 */
use axum::{
    extract::{rejection::JsonRejection, ConnectInfo, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::auth::password::{verify_password_blocking, verify_unknown_user};
use crate::auth::{Claims, Identity, ADMIN_ROLE};
use crate::db::users;
use crate::error::{AppError, AppResult};
use crate::routes::ApiResponse;
use crate::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// User summary returned to the frontend
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub role: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: UserSummary,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub message: String,
    pub user: Claims,
}

fn invalid_credentials() -> AppError {
    AppError::Unauthenticated("Invalid credentials".to_string())
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<LoginResponse>> {
    let Json(payload) = payload?;

    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::validation("Username and password are required"));
    }

    let user = match users::find_by_username(&state.pool, &payload.username).await? {
        Some(user) => user,
        None => {
            verify_unknown_user(payload.password).await;
            tracing::warn!(ip = %addr.ip(), "login attempt for unknown user");
            return Err(invalid_credentials());
        }
    };

    if !verify_password_blocking(payload.password, user.password_hash.clone()).await {
        tracing::warn!(ip = %addr.ip(), username = %user.username, "failed login attempt");
        return Err(invalid_credentials());
    }

    let identity = Identity {
        id: user.id,
        username: user.username,
        role: ADMIN_ROLE.to_string(),
    };
    let token = state.tokens.issue(&identity)?;

    tracing::info!(username = %identity.username, "successful login");

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        token,
        user: UserSummary {
            id: identity.id,
            username: identity.username,
            role: identity.role,
        },
    }))
}

/// GET /api/auth/verify
/// Echoes the claims of a token the auth layer already accepted
pub async fn verify_token(Extension(claims): Extension<Claims>) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        success: true,
        message: "Token is valid".to_string(),
        user: claims,
    })
}

/// POST /api/auth/logout
/// Tokens are stateless, there is nothing to revoke server-side.
pub async fn logout() -> Json<ApiResponse<()>> {
    Json(ApiResponse::message("Logout successful"))
}
