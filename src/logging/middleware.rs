//! Per-request logging and `x-request-id` handling.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tower_http::request_id::{
    MakeRequestUuid, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};

/// Logs every request on entry and on completion; the level follows the status class.
pub async fn log_request(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let req_id = request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    tracing::debug!(request_id = %req_id, method = %method, path = %path, "incoming request");

    let response = next.run(request).await;

    let status = response.status();
    let duration_ms = start.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::error!(
            request_id = %req_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms,
            "request failed"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            request_id = %req_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms,
            "request rejected"
        );
    } else {
        tracing::info!(
            request_id = %req_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms,
            "request completed"
        );
    }

    response
}

pub fn request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::x_request_id(MakeRequestUuid)
}

pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

#[cfg(test)]
mod tests {
    use crate::test_support::test_app;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_responses_carry_request_id() {
        let (app, _) = test_app().await;
        let res = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(res.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_incoming_request_id_is_echoed() {
        let (app, _) = test_app().await;
        let res = app
            .oneshot(
                Request::get("/health")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.headers()["x-request-id"], "abc-123");
    }
}
