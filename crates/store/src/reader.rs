//! Latest-forecast reader.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};

use forgecast_core::{ForecastDomain, SeriesKey};

use crate::error::{StoreError, StoreResult};

/// One forecast point from the stored generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub timestamp: NaiveDateTime,
    pub value: f64,
    pub p10: Option<f64>,
    pub p50: Option<f64>,
    pub p90: Option<f64>,
}

/// The latest generation's points for one `(domain, series_key)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestForecast {
    pub domain: ForecastDomain,
    pub series_key: SeriesKey,
    pub generated_at: NaiveDateTime,
    pub points: Vec<ForecastPoint>,
}

/// Up to `limit` points of the latest forecast generation for the pair,
/// ordered by ascending timestamp.
///
/// Fails with [`StoreError::NoForecast`] when no generation exists yet for
/// the pair, so callers can distinguish "not forecast" from real errors.
pub async fn latest_forecast(
    pool: &SqlitePool,
    domain: ForecastDomain,
    series_key: &SeriesKey,
    limit: usize,
) -> StoreResult<LatestForecast> {
    let max_row = sqlx::query(
        "SELECT MAX(generated_at) AS generated_at FROM forecast_outputs \
         WHERE domain = ? AND series_key = ?",
    )
    .bind(domain.as_str())
    .bind(series_key.as_str())
    .fetch_one(pool)
    .await?;

    let generated_at: Option<NaiveDateTime> = max_row.try_get("generated_at")?;
    let Some(generated_at) = generated_at else {
        return Err(StoreError::NoForecast {
            domain,
            series_key: series_key.clone(),
        });
    };

    let rows = sqlx::query(
        r#"
        SELECT timestamp, value, p10, p50, p90
        FROM forecast_outputs
        WHERE domain = ? AND series_key = ? AND generated_at = ?
        ORDER BY timestamp ASC
        LIMIT ?
        "#,
    )
    .bind(domain.as_str())
    .bind(series_key.as_str())
    .bind(generated_at)
    .bind(limit as i64)
    .fetch_all(pool)
    .await?;

    let mut points = Vec::with_capacity(rows.len());
    for row in rows {
        points.push(ForecastPoint {
            timestamp: row.try_get("timestamp")?,
            value: row.try_get("value")?,
            p10: row.try_get("p10")?,
            p50: row.try_get("p50")?,
            p90: row.try_get("p90")?,
        });
    }

    Ok(LatestForecast {
        domain,
        series_key: series_key.clone(),
        generated_at,
        points,
    })
}
