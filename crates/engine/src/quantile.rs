//! Monte Carlo uncertainty band around a baseline forecast.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use forgecast_core::SeriesKey;

/// Floor on the simulation count; fewer samples make the tail percentiles
/// too coarse to be meaningful.
const MIN_SIMULATIONS: usize = 100;

/// p10/p50/p90 vectors, one entry per horizon step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantileBands {
    pub p10: Vec<f64>,
    pub p50: Vec<f64>,
    pub p90: Vec<f64>,
}

/// Simulate an uncertainty band around `baseline`.
///
/// Volatility is estimated from the standard deviation of first differences
/// of the history (raw history when there are fewer than two observations).
/// A non-positive estimate falls back to `max(0.1 * stddev(history), 0.5)`
/// so the spread is always strictly positive.
///
/// For each step, `simulations` samples are drawn from a normal distribution
/// centered on the baseline value, clipped to be non-negative, and reduced
/// to the 10th/50th/90th percentiles. Given the same seed the output is
/// fully reproducible.
pub fn simulate_quantiles(
    history: &[f64],
    baseline: &[f64],
    simulations: usize,
    seed: u64,
) -> QuantileBands {
    let simulations = simulations.max(MIN_SIMULATIONS);

    let zero_history = [0.0];
    let values: &[f64] = if history.is_empty() { &zero_history } else { history };

    let mut volatility = if values.len() >= 2 {
        let diffs: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
        stddev(&diffs)
    } else {
        stddev(values)
    };
    if volatility <= 0.0 {
        volatility = (0.1 * stddev(values)).max(0.5);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut bands = QuantileBands {
        p10: Vec::with_capacity(baseline.len()),
        p50: Vec::with_capacity(baseline.len()),
        p90: Vec::with_capacity(baseline.len()),
    };

    for &center in baseline {
        let normal = Normal::new(center, volatility)
            .unwrap_or_else(|_| Normal::new(0.0, 0.5).expect("positive stddev"));
        let mut samples: Vec<f64> = (0..simulations)
            .map(|_| normal.sample(&mut rng).max(0.0))
            .collect();
        samples.sort_by(|a, b| a.total_cmp(b));
        bands.p10.push(percentile_sorted(&samples, 10.0));
        bands.p50.push(percentile_sorted(&samples, 50.0));
        bands.p90.push(percentile_sorted(&samples, 90.0));
    }

    bands
}

/// Per-series seed offset: first 8 hex characters of the SHA-256 digest of
/// the key, read as an integer.
///
/// This is a reproducible partitioning trick, not a security property: it
/// gives each series an independent stream from one configured base seed
/// without persisting per-series state. Changing the digest (or its
/// truncation) changes reproducibility of previously stored forecasts.
pub fn series_seed_offset(series_key: &SeriesKey) -> u64 {
    let digest = Sha256::digest(series_key.as_str().as_bytes());
    // 8 hex chars = the first 4 digest bytes.
    u64::from(u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]))
}

/// Population standard deviation (ddof = 0).
fn stddev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values
        .iter()
        .map(|v| {
            let d = v - mean;
            d * d
        })
        .sum::<f64>()
        / values.len() as f64;
    variance.sqrt()
}

/// Linear-interpolated percentile over an ascending-sorted sample set.
fn percentile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let position = q / 100.0 * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn same_seed_is_reproducible() {
        let history = [5.0, 7.0, 6.0, 9.0];
        let baseline = [7.0, 7.5];
        let a = simulate_quantiles(&history, &baseline, 500, 42);
        let b = simulate_quantiles(&history, &baseline, 500, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_diverge() {
        let history = [5.0, 7.0, 6.0, 9.0];
        let baseline = [7.0, 7.5];
        let a = simulate_quantiles(&history, &baseline, 500, 1);
        let b = simulate_quantiles(&history, &baseline, 500, 2);
        assert_ne!(a, b);
    }

    #[test]
    fn distinct_series_keys_get_distinct_offsets() {
        let all = series_seed_offset(&SeriesKey::aggregate());
        let part = series_seed_offset(&SeriesKey::new("PART-0001"));
        assert_ne!(all, part);
        // Stable across calls (and across runs, by construction).
        assert_eq!(part, series_seed_offset(&SeriesKey::new("PART-0001")));
    }

    #[test]
    fn constant_history_still_spreads_via_floor() {
        // First differences of a constant series have zero stddev; the floor
        // substitution keeps the band strictly positive in width.
        let history = [4.0; 6];
        let baseline = [4.0];
        let bands = simulate_quantiles(&history, &baseline, 2000, 7);
        assert!(bands.p90[0] > bands.p10[0]);
    }

    #[test]
    fn zero_baseline_clips_at_zero() {
        let bands = simulate_quantiles(&[0.0, 0.0, 0.0], &[0.0], 500, 3);
        assert_eq!(bands.p10[0], 0.0);
        assert!(bands.p90[0] >= 0.0);
    }

    #[test]
    fn tiny_simulation_count_is_clamped() {
        // Clamped to 100 internally; just verify the output stays ordered.
        let bands = simulate_quantiles(&[1.0, 2.0, 3.0], &[2.5], 1, 11);
        assert!(bands.p10[0] <= bands.p50[0] && bands.p50[0] <= bands.p90[0]);
    }

    proptest! {
        #[test]
        fn percentiles_are_ordered_and_non_negative(
            history in proptest::collection::vec(0.0f64..1000.0, 0..20),
            baseline in proptest::collection::vec(0.0f64..1000.0, 1..8),
            seed in any::<u64>(),
        ) {
            let bands = simulate_quantiles(&history, &baseline, 200, seed);
            for step in 0..baseline.len() {
                prop_assert!(bands.p10[step] >= 0.0);
                prop_assert!(bands.p10[step] <= bands.p50[step]);
                prop_assert!(bands.p50[step] <= bands.p90[step]);
            }
        }
    }
}
