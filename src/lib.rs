use std::sync::Arc;

use axum::{middleware, routing::get, Router};

pub mod bridge;
pub mod config;
pub mod domain;
pub mod errors;
pub mod http;
pub mod logging;
pub mod mcp;

use bridge::executor::HttpExecutor;
use config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub executor: Arc<dyn HttpExecutor>,
}

impl AppState {
    pub fn new(config: Config, executor: Arc<dyn HttpExecutor>) -> Self {
        Self {
            config: Arc::new(config),
            executor,
        }
    }
}

pub fn build_health_app() -> Router {
    Router::new()
        .route("/health", get(http::handlers::health))
        .fallback(http::handlers::not_found)
        .layer(middleware::from_fn(logging::request_logging_middleware))
}
