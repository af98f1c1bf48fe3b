//! Deterministic point forecast: recent level blended with a linear trend.

/// Weight of the recent level in the blended forecast; the remainder goes
/// to the extrapolated trend.
const LEVEL_WEIGHT: f64 = 0.65;

/// Observations considered "recent" when computing the level.
const RECENT_WINDOW: usize = 12;

/// Produce a point forecast of length `horizon` from an ordered history.
///
/// An empty history is treated as a single zero observation so the math
/// stays well-defined. With fewer than two observations there is no trend
/// to fit: the slope is zero and the intercept is the last value. Forecast
/// values are floored at zero since both domains are non-negative.
pub fn baseline_forecast(history: &[f64], horizon: usize) -> Vec<f64> {
    let zero_history = [0.0];
    let values: &[f64] = if history.is_empty() { &zero_history } else { history };
    let n = values.len();

    let recent = &values[n - n.min(RECENT_WINDOW)..];
    let recent_level = mean(recent);

    let (slope, intercept) = if n >= 2 {
        linear_fit(values)
    } else {
        (0.0, values[n - 1])
    };

    (1..=horizon)
        .map(|step| {
            let trend_value = intercept + slope * (n - 1 + step) as f64;
            (LEVEL_WEIGHT * recent_level + (1.0 - LEVEL_WEIGHT) * trend_value).max(0.0)
        })
        .collect()
}

/// First-degree least-squares fit over index positions `0..n`.
///
/// Returns `(slope, intercept)`.
fn linear_fit(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = mean(values);

    let mut covariance = 0.0;
    let mut x_variance = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        covariance += dx * (y - y_mean);
        x_variance += dx * dx;
    }

    if x_variance == 0.0 {
        return (0.0, y_mean);
    }
    let slope = covariance / x_variance;
    (slope, y_mean - slope * x_mean)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
