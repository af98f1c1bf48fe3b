//! Request/response schemas for the HTTP surface.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use forgecast_core::ForecastDomain;
use forgecast_store::ForecastPoint;

/// Body of `POST /v1/query/execute`.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    /// Allowlisted query id from `GET /v1/queries`.
    pub query_id: String,
    /// Query-specific named parameters.
    #[serde(default)]
    pub params: Map<String, Value>,
    /// Maximum rows to return (a server-side cap may apply).
    #[serde(default = "default_query_limit")]
    pub limit: usize,
}

fn default_query_limit() -> usize {
    100
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryDefinitionResponse {
    pub query_id: &'static str,
    pub description: &'static str,
    pub required_params: Vec<&'static str>,
    pub optional_params: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub query_id: String,
    pub row_count: usize,
    pub generated_at: NaiveDateTime,
    pub rows: Vec<Map<String, Value>>,
}

/// Query string of `GET /v1/forecast/latest`.
#[derive(Debug, Clone, Deserialize)]
pub struct LatestForecastParams {
    /// `lead_time` or `sales`.
    pub domain: ForecastDomain,
    /// `__ALL__` for the aggregate, or a part number such as `PART-0001`.
    #[serde(default = "default_series_key")]
    pub series_key: String,
    /// Maximum forecast points to return from the latest run.
    #[serde(default = "default_points_limit")]
    pub limit: usize,
}

fn default_series_key() -> String {
    forgecast_core::series::AGGREGATE_KEY.to_string()
}

fn default_points_limit() -> usize {
    1
}

#[derive(Debug, Clone, Serialize)]
pub struct ForecastResponse {
    pub domain: ForecastDomain,
    pub series_key: String,
    pub generated_at: NaiveDateTime,
    /// Always `precomputed_table`: nothing is forecast on demand.
    pub source: &'static str,
    pub points: Vec<ForecastPoint>,
}
