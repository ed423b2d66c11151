//! Shared fixtures for handler tests: an in-memory store, a token service and
//! a helper that drives the full router.

use axum::{
    body::Body,
    extract::connect_info::MockConnectInfo,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceExt;

use crate::auth::password::hash_password;
use crate::auth::{Identity, TokenService, ADMIN_ROLE};
use crate::db::{self, users};
use crate::AppState;

pub const TEST_SECRET: &str = "test-secret";
pub const TEST_PASSWORD: &str = "correct-horse-battery";

pub async fn test_state() -> AppState {
    AppState {
        pool: db::test_pool().await,
        tokens: Arc::new(TokenService::new(TEST_SECRET)),
        environment: Arc::from("test"),
    }
}

pub async fn test_app() -> (Router, AppState) {
    let state = test_state().await;
    let app = crate::create_app(state.clone(), &[])
        .layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 12345))));
    (app, state)
}

pub async fn seed_admin(state: &AppState) -> i64 {
    let hash = hash_password(TEST_PASSWORD).unwrap();
    users::upsert_password(&state.pool, "admin", &hash).await.unwrap()
}

fn token_for(state: &AppState, role: &str) -> String {
    state
        .tokens
        .issue(&Identity {
            id: 1,
            username: "admin".to_string(),
            role: role.to_string(),
        })
        .unwrap()
}

pub fn admin_token(state: &AppState) -> String {
    token_for(state, ADMIN_ROLE)
}

pub fn viewer_token(state: &AppState) -> String {
    token_for(state, "viewer")
}

/// One request through the router; the body is parsed as JSON (`Null` when empty).
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let req = match body {
        Some(json) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };

    let res = app.oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

/// Raw-body variant for malformed payloads.
pub async fn send_raw(app: Router, method: Method, uri: &str, token: &str, body: &str) -> StatusCode {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(req).await.unwrap().status()
}
