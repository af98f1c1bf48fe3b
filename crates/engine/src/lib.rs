//! `forgecast-engine`
//!
//! **Responsibility:** the forecast computation pipeline.
//!
//! This crate is storage-agnostic:
//! - Inputs (raw facts within the lookback window) are supplied by callers.
//! - It turns facts into per-series bucketed histories, generates a
//!   trend-based baseline per series, simulates an uncertainty band around
//!   it, and assembles timestamped forecast rows.
//! - It never talks to a database; persistence belongs to `forgecast-store`.

pub mod aggregate;
pub mod baseline;
pub mod quantile;
pub mod rows;
pub mod summary;

pub use aggregate::{
    BucketSeries, LeadTimeFact, SalesFact, SeriesHistories, aggregate_lead_time, aggregate_sales,
};
pub use baseline::baseline_forecast;
pub use quantile::{QuantileBands, series_seed_offset, simulate_quantiles};
pub use rows::{ForecastRow, MIN_BUCKETS, MODEL_VERSION, SeriesForecastParams, build_forecast_rows};
pub use summary::{RunId, RunSummary};
