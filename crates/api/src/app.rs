//! HTTP application wiring.

pub mod dto;
pub mod errors;
pub mod routes;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};
use sqlx::SqlitePool;

use crate::settings::Settings;

/// Shared per-request context: connection pool + immutable settings.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub pool: SqlitePool,
    pub settings: Arc<Settings>,
}

pub fn build_app(pool: SqlitePool, settings: Arc<Settings>) -> Router {
    let ctx = Arc::new(AppContext { pool, settings });

    Router::new()
        .route("/health", get(routes::health))
        .route("/v1/queries", get(routes::list_queries))
        .route("/v1/query/execute", post(routes::execute_query))
        .route("/v1/forecast/latest", get(routes::latest_forecast))
        .layer(Extension(ctx))
}
