/**
 * Message Routes
 * Public contact form submission and admin inbox management
 */
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::auth::Claims;
use crate::db::{
    messages,
    models::{Message, MessageStats, NewMessage},
};
use crate::error::{AppError, AppResult};
use crate::pagination::{PageQuery, Pagination};
use crate::routes::{required, ApiResponse, CreatedId};
use crate::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct MessageListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    #[serde(default)]
    pub unread_only: bool,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CreateMessageRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessagePage {
    pub messages: Vec<Message>,
    pub pagination: Pagination,
}

// ============================================================================
// Validation
// ============================================================================

lazy_static::lazy_static! {
    /// local-part@domain.tld, no whitespace and a single '@'
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

impl CreateMessageRequest {
    fn validate(&self) -> AppResult<NewMessage> {
        let (Some(name), Some(email), Some(subject), Some(message)) = (
            required(&self.name),
            required(&self.email),
            required(&self.subject),
            required(&self.message),
        ) else {
            return Err(AppError::validation("All fields are required"));
        };

        if !is_valid_email(&email) {
            return Err(AppError::validation("Invalid email format"));
        }

        Ok(NewMessage {
            name,
            email,
            subject,
            message,
        })
    }
}

fn message_not_found() -> AppError {
    AppError::not_found("Message not found")
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/messages?page=&limit=&unread_only=
pub async fn list_messages(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    query: Result<Query<MessageListQuery>, QueryRejection>,
) -> AppResult<Json<ApiResponse<MessagePage>>> {
    claims.require_admin()?;
    let Query(query) = query?;

    let page = PageQuery {
        page: query.page,
        limit: query.limit,
    }
    .resolve();
    let (items, total) = messages::list(&state.pool, page, query.unread_only).await?;

    Ok(Json(ApiResponse::data(MessagePage {
        messages: items,
        pagination: Pagination::new(page, total),
    })))
}

/// GET /api/messages/{id}
pub async fn get_message(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<ApiResponse<Message>>> {
    claims.require_admin()?;
    let Path(id) = id?;

    let message = messages::find(&state.pool, id)
        .await?
        .ok_or_else(message_not_found)?;

    Ok(Json(ApiResponse::data(message)))
}

/// POST /api/messages - public contact form
pub async fn create_message(
    State(state): State<AppState>,
    payload: Result<Json<CreateMessageRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<CreatedId>>)> {
    let Json(payload) = payload?;
    let new = payload.validate()?;

    let id = messages::create(&state.pool, &new).await?;
    tracing::info!(message_id = id, "contact message received");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(CreatedId { id }).with_message("Message sent successfully")),
    ))
}

async fn set_read_status(
    state: &AppState,
    claims: &Claims,
    id: Result<Path<i64>, PathRejection>,
    read: bool,
) -> AppResult<Json<ApiResponse<()>>> {
    claims.require_admin()?;
    let Path(id) = id?;

    if messages::set_read_status(&state.pool, id, read).await? == 0 {
        return Err(message_not_found());
    }

    let label = if read { "read" } else { "unread" };
    Ok(Json(ApiResponse::message(format!("Message marked as {}", label))))
}

/// PUT /api/messages/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<ApiResponse<()>>> {
    set_read_status(&state, &claims, id, true).await
}

/// PUT /api/messages/{id}/unread
pub async fn mark_unread(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<ApiResponse<()>>> {
    set_read_status(&state, &claims, id, false).await
}

/// DELETE /api/messages/{id}
pub async fn delete_message(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<ApiResponse<()>>> {
    claims.require_admin()?;
    let Path(id) = id?;

    if messages::delete(&state.pool, id).await? == 0 {
        return Err(message_not_found());
    }

    tracing::info!(message_id = id, "message deleted");
    Ok(Json(ApiResponse::message("Message deleted successfully")))
}

/// GET /api/messages/stats/summary
pub async fn message_stats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<ApiResponse<MessageStats>>> {
    claims.require_admin()?;
    let stats = messages::stats(&state.pool, Utc::now().date_naive()).await?;
    Ok(Json(ApiResponse::data(stats)))
}
