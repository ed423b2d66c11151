/*!
 * Logging Module
 * Console plus daily rolling files: pretty in development, JSON in production
 */
pub mod middleware;

use std::io;
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::env_var;

const LOG_DIR: &str = "logs";

/// Filter used when `RUST_LOG` is not set.
fn default_directives(is_production: bool) -> String {
    let fallback = if is_production { "info" } else { "debug" };
    let level = env_var("LOG_LEVEL").unwrap_or_else(|| fallback.to_string());
    format!("portfolio_api={},tower_http=info,sqlx=warn", level)
}

/// Initialize the logging system.
///
/// The returned guards flush the background writers when dropped, so the
/// caller must hold them for the life of the process.
pub fn init(environment: &str) -> Vec<WorkerGuard> {
    let is_production = environment == "production";

    if let Err(e) = std::fs::create_dir_all(LOG_DIR) {
        eprintln!("cannot create {} directory: {}", LOG_DIR, e);
    }

    let (file_writer, file_guard) = non_blocking(rolling::daily(LOG_DIR, "app.log"));
    let (error_writer, error_guard) = non_blocking(rolling::daily(LOG_DIR, "error.log"));
    let (console_writer, console_guard) = non_blocking(io::stdout());

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(is_production)));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if is_production {
        let file_layer = fmt::layer()
            .json()
            .with_writer(file_writer)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);

        let error_layer = fmt::layer()
            .json()
            .with_writer(error_writer)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(tracing_subscriber::filter::LevelFilter::ERROR);

        let console_layer = fmt::layer()
            .json()
            .with_writer(console_writer)
            .with_target(false);

        subscriber
            .with(file_layer)
            .with(error_layer)
            .with(console_layer)
            .init();
    } else {
        let file_layer = fmt::layer()
            .with_writer(file_writer)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false);

        let error_layer = fmt::layer()
            .with_writer(error_writer)
            .with_ansi(false)
            .with_filter(tracing_subscriber::filter::LevelFilter::ERROR);

        let console_layer = fmt::layer()
            .with_writer(console_writer)
            .with_target(true)
            .pretty();

        subscriber
            .with(file_layer)
            .with(error_layer)
            .with(console_layer)
            .init();
    }

    tracing::info!("Logging initialized for {} environment", environment);

    vec![file_guard, error_guard, console_guard]
}
