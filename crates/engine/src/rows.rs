//! Forecast row assembly: baseline + quantile bands → timestamped output
//! records with provenance metadata.

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::json;

use forgecast_core::{BucketFrequency, ForecastDomain, SeriesKey};

use crate::aggregate::SeriesHistories;
use crate::baseline::baseline_forecast;
use crate::quantile::{series_seed_offset, simulate_quantiles};

/// Tag identifying the algorithm combination that produced a row.
pub const MODEL_VERSION: &str = "baseline+mc-v1";

/// Minimum distinct history buckets a series needs to be forecast at all.
/// Series below this are silently omitted, never errored.
pub const MIN_BUCKETS: usize = 3;

/// One persisted forecast point.
///
/// Identity within a run is `(domain, series_key, timestamp, generated_at)`;
/// readers resolve `(domain, series_key)` to the maximum `generated_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    pub domain: ForecastDomain,
    pub series_key: SeriesKey,
    pub timestamp: NaiveDateTime,
    pub value: f64,
    pub p10: f64,
    pub p50: f64,
    pub p90: f64,
    pub generated_at: NaiveDateTime,
    pub model_version: String,
    pub source_window_start: NaiveDateTime,
    pub source_window_end: NaiveDateTime,
    pub notes: String,
}

/// Per-run forecasting parameters, resolved once from configuration.
#[derive(Debug, Clone, Copy)]
pub struct SeriesForecastParams {
    /// Future buckets to forecast.
    pub horizon: usize,
    /// Monte Carlo sample count (clamped to a minimum internally).
    pub simulations: usize,
    /// Run-level base seed; each series adds its own derived offset.
    pub base_seed: u64,
}

/// Build all forecast rows for one domain.
///
/// Series are processed in ascending key order and buckets chronologically,
/// so two runs over identical inputs produce identical row sequences.
/// Returns the rows plus the number of series that qualified.
pub fn build_forecast_rows(
    domain: ForecastDomain,
    frequency: BucketFrequency,
    histories: &SeriesHistories,
    generated_at: NaiveDateTime,
    params: &SeriesForecastParams,
) -> (Vec<ForecastRow>, usize) {
    let mut rows = Vec::new();
    let mut series_count = 0usize;
    let notes = json!({ "frequency": frequency.as_str() }).to_string();

    for (series_key, buckets) in histories {
        if buckets.len() < MIN_BUCKETS {
            continue;
        }
        series_count += 1;

        let history: Vec<f64> = buckets.values().copied().collect();
        let baseline = baseline_forecast(&history, params.horizon);
        let seed = params.base_seed.wrapping_add(series_seed_offset(series_key));
        let bands = simulate_quantiles(&history, &baseline, params.simulations, seed);

        // BTreeMap keys are ascending, so first/last are the window bounds.
        let first_bucket = *buckets.keys().next().expect("non-empty by MIN_BUCKETS");
        let last_bucket = *buckets.keys().next_back().expect("non-empty by MIN_BUCKETS");
        let window_start = first_bucket.and_time(NaiveTime::MIN);
        let window_end = last_bucket.and_time(NaiveTime::MIN);

        for step in 0..params.horizon {
            let bucket = frequency.step(last_bucket, (step + 1) as u32);
            rows.push(ForecastRow {
                domain,
                series_key: series_key.clone(),
                timestamp: bucket.and_time(NaiveTime::MIN),
                value: baseline[step],
                p10: bands.p10[step],
                p50: bands.p50[step],
                p90: bands.p90[step],
                generated_at,
                model_version: MODEL_VERSION.to_string(),
                source_window_start: window_start,
                source_window_end: window_end,
                notes: notes.clone(),
            });
        }
    }

    (rows, series_count)
}
