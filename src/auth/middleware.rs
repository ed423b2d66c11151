//! Bearer-token authentication layer for protected routes.
//!
//! Authentication is structural: this layer rejects the request before it
//! reaches a handler. Role checks stay in each handler via
//! [`Claims::require_admin`](crate::auth::token::Claims::require_admin).

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::AppState;

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = {
        let token = extract_bearer_token(req.headers())?;
        state.tokens.validate(token)?
    };

    tracing::debug!(user = %claims.username, "request authenticated");
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Extract bearer token from Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let unauthenticated = || AppError::Unauthenticated("Access token required".to_string());

    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(unauthenticated)?
        .to_str()
        .map_err(|_| unauthenticated())?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(unauthenticated)?
        .trim();

    if token.is_empty() {
        return Err(unauthenticated());
    }

    Ok(token)
}
