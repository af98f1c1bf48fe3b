//! HTTP error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use forgecast_store::StoreError;

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::NoForecast { .. } => {
            json_error(StatusCode::NOT_FOUND, "not_found", err.to_string())
        }
        StoreError::UnknownQuery(_) => {
            json_error(StatusCode::NOT_FOUND, "unknown_query", err.to_string())
        }
        StoreError::InvalidParams(_) | StoreError::Core(_) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_request", err.to_string())
        }
        StoreError::Database(e) => {
            tracing::error!(error = %e, "database error while serving request");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_error",
                "internal storage error",
            )
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
