//! The forecast job orchestrator.
//!
//! One run: resolve `generated_at`, then, inside a single transaction,
//! load and aggregate both domains' history, build every forecast row,
//! delete the previous generation wholesale and bulk-insert the new one.
//! The sequence commits or rolls back as one operation, so concurrent
//! readers only ever see a complete generation.

use chrono::{DateTime, Duration, Timelike, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{info, instrument};

use forgecast_core::{BucketFrequency, ForecastDomain};
use forgecast_engine::{
    ForecastRow, RunId, RunSummary, SeriesForecastParams, aggregate_lead_time, aggregate_sales,
    build_forecast_rows,
};

use crate::error::StoreResult;
use crate::facts::{load_lead_time_facts, load_sales_facts};
use crate::schema::initialize_schema;

/// Per-run forecasting configuration, resolved once per process and passed
/// in explicitly so runs are parameterizable and testable in isolation.
#[derive(Debug, Clone, Copy)]
pub struct ForecastJobConfig {
    /// Lead-time horizon, in days.
    pub horizon_days: usize,
    /// Sales horizon, in months.
    pub horizon_months: usize,
    /// Monte Carlo sample count (minimum of 100 enforced downstream).
    pub simulations: usize,
    /// Base seed; each series derives its own offset from it.
    pub base_seed: u64,
    /// Trailing window of raw history considered, in days.
    pub lookback_days: i64,
}

impl Default for ForecastJobConfig {
    fn default() -> Self {
        Self {
            horizon_days: 30,
            horizon_months: 6,
            simulations: 1000,
            base_seed: 42,
            lookback_days: 1460,
        }
    }
}

/// Execute one full forecast run against `pool`.
///
/// `now` is injectable for tests; production callers pass `None` to use the
/// current time. `generated_at` is UTC truncated to whole seconds, so two
/// runs at the same logical time over identical inputs produce identical
/// rows.
#[instrument(skip(pool, config), err)]
pub async fn run_forecast_job(
    pool: &SqlitePool,
    config: &ForecastJobConfig,
    now: Option<DateTime<Utc>>,
) -> StoreResult<RunSummary> {
    initialize_schema(pool).await?;

    let run_id = RunId::new();
    let now = now.unwrap_or_else(Utc::now).naive_utc();
    let generated_at = now.with_nanosecond(0).unwrap_or(now);
    let lookback_start = generated_at - Duration::days(config.lookback_days);

    let mut tx = pool.begin().await?;

    let lead_facts = load_lead_time_facts(&mut tx, lookback_start).await?;
    let sales_facts = load_sales_facts(&mut tx, lookback_start.date()).await?;

    let lead_histories = aggregate_lead_time(&lead_facts);
    let sales_histories = aggregate_sales(&sales_facts);

    let (mut rows, lead_time_series) = build_forecast_rows(
        ForecastDomain::LeadTime,
        BucketFrequency::Daily,
        &lead_histories,
        generated_at,
        &SeriesForecastParams {
            horizon: config.horizon_days,
            simulations: config.simulations,
            base_seed: config.base_seed,
        },
    );
    let (sales_rows, sales_series) = build_forecast_rows(
        ForecastDomain::Sales,
        BucketFrequency::Monthly,
        &sales_histories,
        generated_at,
        &SeriesForecastParams {
            horizon: config.horizon_months,
            simulations: config.simulations,
            base_seed: config.base_seed,
        },
    );
    rows.extend(sales_rows);

    // Replace the previous generation wholesale. Readers never observe a
    // mix of old and new rows: the delete and the insert commit together.
    sqlx::query("DELETE FROM forecast_outputs")
        .execute(&mut *tx)
        .await?;
    insert_rows(&mut tx, &rows).await?;

    tx.commit().await?;

    let summary = RunSummary {
        run_id,
        generated_at,
        lead_time_series,
        sales_series,
        rows_written: rows.len(),
    };
    info!(
        run_id = %summary.run_id,
        generated_at = %summary.generated_at,
        lead_time_series = summary.lead_time_series,
        sales_series = summary.sales_series,
        rows_written = summary.rows_written,
        "forecast run committed"
    );
    Ok(summary)
}

async fn insert_rows(tx: &mut Transaction<'_, Sqlite>, rows: &[ForecastRow]) -> StoreResult<()> {
    for row in rows {
        sqlx::query(
            r#"
            INSERT INTO forecast_outputs (
                domain, series_key, timestamp, value, p10, p50, p90,
                generated_at, model_version,
                source_window_start, source_window_end, notes
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(row.domain.as_str())
        .bind(row.series_key.as_str())
        .bind(row.timestamp)
        .bind(row.value)
        .bind(row.p10)
        .bind(row.p50)
        .bind(row.p90)
        .bind(row.generated_at)
        .bind(row.model_version.as_str())
        .bind(row.source_window_start)
        .bind(row.source_window_end)
        .bind(row.notes.as_str())
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}
