//! Portfolio API - library for app logic and testing

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod pagination;
pub mod routes;

#[cfg(test)]
mod test_support;

use axum::{
    http::{header, request::Parts, HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use regex::Regex;
use sqlx::SqlitePool;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::auth::TokenService;
use crate::config::{AppConfig, ConfigError};
use crate::error::AppError;

/// Shared handler state, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub tokens: Arc<TokenService>,
    pub environment: Arc<str>,
}

impl AppState {
    pub fn new(pool: SqlitePool, tokens: TokenService, environment: &str) -> Self {
        Self {
            pool,
            tokens: Arc::new(tokens),
            environment: Arc::from(environment),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("admin bootstrap failed: {0}")]
    Bootstrap(#[from] AppError),
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

lazy_static::lazy_static! {
    /// Local development frontends on any port.
    static ref LOCAL_ORIGIN: Regex =
        Regex::new(r"^http://(localhost|127\.0\.0\.1|192\.168\.\d+\.\d+):\d+$").unwrap();
}

fn origin_allowed(origin: &str, allowed: &[String]) -> bool {
    allowed.iter().any(|a| a == origin) || LOCAL_ORIGIN.is_match(origin)
}

/// CORS for the configured frontend origins plus local development hosts.
pub fn configure_cors(origins: &[String]) -> CorsLayer {
    let allowed = origins.to_vec();

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                origin
                    .to_str()
                    .map(|o| origin_allowed(o, &allowed))
                    .unwrap_or(false)
            },
        ))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

async fn route_not_found() -> AppError {
    AppError::not_found("Route not found")
}

/// Create and configure the application router.
pub fn create_app(state: AppState, origins: &[String]) -> Router {
    let public = Router::new()
        .route("/health", get(routes::health::health))
        .route("/health/database", get(routes::health::health_database))
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/logout", post(routes::auth::logout))
        .route("/api/messages", post(routes::messages::create_message))
        .route("/api/portfolio/config", get(routes::config::get_config))
        .route("/api/portfolio/projects", get(routes::projects::list_projects))
        .route("/api/portfolio/skills", get(routes::skills::list_skills))
        .route(
            "/api/portfolio/social-links",
            get(routes::social_links::list_social_links),
        );

    let protected = Router::new()
        .route("/api/auth/verify", get(routes::auth::verify_token))
        .route("/api/messages", get(routes::messages::list_messages))
        .route(
            "/api/messages/stats/summary",
            get(routes::messages::message_stats),
        )
        .route(
            "/api/messages/{id}",
            get(routes::messages::get_message).delete(routes::messages::delete_message),
        )
        .route("/api/messages/{id}/read", put(routes::messages::mark_read))
        .route("/api/messages/{id}/unread", put(routes::messages::mark_unread))
        .route("/api/portfolio/config", put(routes::config::update_config))
        .route(
            "/api/portfolio/projects",
            post(routes::projects::create_project),
        )
        .route(
            "/api/portfolio/projects/{id}",
            put(routes::projects::update_project).delete(routes::projects::delete_project),
        )
        .route("/api/portfolio/skills", post(routes::skills::create_skill))
        .route(
            "/api/portfolio/skills/{id}",
            put(routes::skills::update_skill).delete(routes::skills::delete_skill),
        )
        .route(
            "/api/portfolio/social-links",
            put(routes::social_links::update_social_links),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    public
        .merge(protected)
        .fallback(route_not_found)
        .layer(logging::middleware::propagate_request_id_layer())
        .layer(middleware::from_fn(logging::middleware::log_request))
        .layer(logging::middleware::request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        // 2 MB request body cap
        .layer(RequestBodyLimitLayer::new(2 * 1024 * 1024))
        .layer(configure_cors(origins))
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}

async fn serve(config: AppConfig) -> Result<(), StartupError> {
    config.validate()?;
    let addr = config.bind_address()?;

    let pool = db::init_pool(&config.db).await?;
    db::run_migrations(&pool).await?;
    auth::bootstrap::bootstrap_admin(&pool, &config.admin).await?;

    let tokens = TokenService::with_ttl(&config.jwt_secret, config.token_ttl_seconds);
    let state = AppState::new(pool.clone(), tokens, &config.environment);

    let app = create_app(state, &config.frontend_origins);
    tracing::info!(origins = ?config.frontend_origins, "CORS configured");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Starting server on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    pool.close().await;
    tracing::info!("server stopped");
    Ok(())
}

/// Run the server (used by main).
pub async fn run() -> Result<(), StartupError> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env();

    // Held until return; dropping them flushes the log writers.
    let _log_guards = logging::init(&config.environment);

    let result = serve(config).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "fatal startup error");
    }
    result
}
