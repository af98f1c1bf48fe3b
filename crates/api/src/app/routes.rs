//! Route handlers: validate, delegate to the store, map errors to
//! responses.

use std::sync::Arc;

use axum::extract::{Extension, Query};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;

use forgecast_core::SeriesKey;
use forgecast_store as store;

use crate::app::AppContext;
use crate::app::dto::{
    ForecastResponse, LatestForecastParams, QueryDefinitionResponse, QueryRequest, QueryResponse,
};
use crate::app::errors::store_error_to_response;

pub async fn health() -> axum::response::Response {
    Json(serde_json::json!({ "status": "ok" })).into_response()
}

pub async fn list_queries() -> axum::response::Response {
    let definitions: Vec<QueryDefinitionResponse> = store::query_registry()
        .iter()
        .map(|def| QueryDefinitionResponse {
            query_id: def.query_id,
            description: def.description,
            required_params: def.required_params.to_vec(),
            optional_params: def.optional_params(),
        })
        .collect();
    Json(definitions).into_response()
}

pub async fn execute_query(
    Extension(ctx): Extension<Arc<AppContext>>,
    Json(body): Json<QueryRequest>,
) -> axum::response::Response {
    let definition = match store::registry::find_query(&body.query_id) {
        Ok(def) => def,
        Err(e) => return store_error_to_response(e),
    };

    let params = match store::validate_params(definition, &body.params) {
        Ok(p) => p,
        Err(e) => return store_error_to_response(e),
    };

    let hard_limit = body.limit.min(ctx.settings.allowed_query_row_limit);
    let rows =
        match store::execute_allowlisted_query(&ctx.pool, definition, &params, hard_limit).await {
            Ok(rows) => rows,
            Err(e) => return store_error_to_response(e),
        };

    Json(QueryResponse {
        query_id: body.query_id,
        row_count: rows.len(),
        generated_at: Utc::now().naive_utc(),
        rows,
    })
    .into_response()
}

pub async fn latest_forecast(
    Extension(ctx): Extension<Arc<AppContext>>,
    Query(params): Query<LatestForecastParams>,
) -> axum::response::Response {
    let hard_limit = params.limit.min(ctx.settings.allowed_query_row_limit).max(1);
    let series_key = SeriesKey::new(params.series_key);

    match store::latest_forecast(&ctx.pool, params.domain, &series_key, hard_limit).await {
        Ok(latest) => Json(ForecastResponse {
            domain: latest.domain,
            series_key: latest.series_key.to_string(),
            generated_at: latest.generated_at,
            source: "precomputed_table",
            points: latest.points,
        })
        .into_response(),
        Err(e) => store_error_to_response(e),
    }
}
