use std::sync::Arc;

use axum::{middleware, routing::get, Router};

pub mod config;
pub mod discovery;
pub mod domain;
pub mod errors;
pub mod http;
pub mod logging;
pub mod systemd_client;

use systemd_client::UnitProvider;

#[derive(Clone)]
pub struct AppState {
    pub unit_provider: Arc<dyn UnitProvider>,
    pub default_journal_limit: i64,
}

impl AppState {
    pub fn new(unit_provider: Arc<dyn UnitProvider>, default_journal_limit: i64) -> Self {
        Self {
            unit_provider,
            default_journal_limit,
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(http::handlers::health))
        .route("/api", get(http::handlers::discovery))
        .route("/api/systemd/services", get(http::handlers::list_services))
        .route("/api/systemd/status", get(http::handlers::unit_status))
        .route("/api/systemd/journal", get(http::handlers::journal))
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}
