//! History aggregation: raw domain facts → per-series bucketed histories.
//!
//! Accumulation uses `BTreeMap` end to end so series iterate in ascending
//! key order and buckets in chronological order. Output ordering is an
//! observable contract of the pipeline, so the structures are rebuilt as
//! freshly-owned maps on every run instead of relying on insertion order.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use forgecast_core::SeriesKey;

/// Row state marking a lead-time order as finished.
pub const CLOSED_STATE: &str = "Closed";

/// One series' history: bucket date → scalar observation.
pub type BucketSeries = BTreeMap<NaiveDate, f64>;

/// All series of one domain, keyed by series key.
pub type SeriesHistories = BTreeMap<SeriesKey, BucketSeries>;

/// Raw lead-time fact (one order line), as read from the fact feed.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadTimeFact {
    pub part_no: Option<String>,
    pub entered_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
    pub row_state: String,
}

/// Raw sales fact (one quantity record), as read from the fact feed.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesFact {
    pub part_no: Option<String>,
    pub sale_date: NaiveDate,
    pub quantity: f64,
}

/// Bucket lead-time facts by entry date, one mean lead duration per part per
/// day.
///
/// Only closed orders whose completion is strictly after entry count; the
/// fact feed already filters on both, but the checks are repeated here so
/// the aggregation is correct on any input. Negative durations (malformed
/// timestamps) are discarded.
///
/// The `"__ALL__"` series is the per-bucket mean of the per-part bucket
/// means already computed, so every part weighs equally regardless of
/// order volume.
pub fn aggregate_lead_time(facts: &[LeadTimeFact]) -> SeriesHistories {
    let mut per_part: BTreeMap<SeriesKey, BTreeMap<NaiveDate, Vec<f64>>> = BTreeMap::new();

    for fact in facts {
        if fact.row_state != CLOSED_STATE {
            continue;
        }
        let Some(completed_at) = fact.completed_at else {
            continue;
        };
        if completed_at <= fact.entered_at {
            continue;
        }
        let lead_days = (completed_at - fact.entered_at).num_days();
        if lead_days < 0 {
            continue;
        }
        per_part
            .entry(SeriesKey::from_part(fact.part_no.as_deref()))
            .or_default()
            .entry(fact.entered_at.date())
            .or_default()
            .push(lead_days as f64);
    }

    let mut histories: SeriesHistories = per_part
        .into_iter()
        .map(|(key, buckets)| {
            let series: BucketSeries = buckets
                .into_iter()
                .map(|(bucket, values)| (bucket, mean(&values)))
                .collect();
            (key, series)
        })
        .collect();

    let mut aggregate_buckets: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for series in histories.values() {
        for (&bucket, &value) in series {
            aggregate_buckets.entry(bucket).or_default().push(value);
        }
    }
    histories.insert(
        SeriesKey::aggregate(),
        aggregate_buckets
            .into_iter()
            .map(|(bucket, values)| (bucket, mean(&values)))
            .collect(),
    );

    histories
}

/// Bucket sales facts by calendar month (first of month), one summed
/// quantity per part per month.
///
/// Unlike lead time, the `"__ALL__"` series is a true aggregate: the sum of
/// all quantities per bucket across parts.
pub fn aggregate_sales(facts: &[SalesFact]) -> SeriesHistories {
    let mut histories: SeriesHistories = BTreeMap::new();
    let mut aggregate: BucketSeries = BTreeMap::new();

    for fact in facts {
        let bucket = month_start(fact.sale_date);
        *histories
            .entry(SeriesKey::from_part(fact.part_no.as_deref()))
            .or_default()
            .entry(bucket)
            .or_insert(0.0) += fact.quantity;
        *aggregate.entry(bucket).or_insert(0.0) += fact.quantity;
    }

    histories.insert(SeriesKey::aggregate(), aggregate);
    histories
}

fn month_start(day: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(day.year(), day.month(), 1)
        .expect("first day of month is always a valid date")
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn closed(part: &str, entered: NaiveDateTime, completed: NaiveDateTime) -> LeadTimeFact {
        LeadTimeFact {
            part_no: Some(part.to_string()),
            entered_at: entered,
            completed_at: Some(completed),
            row_state: CLOSED_STATE.to_string(),
        }
    }

    #[test]
    fn lead_time_buckets_mean_per_part_per_day() {
        let facts = vec![
            closed("A", dt(2024, 1, 1), dt(2024, 1, 3)),
            closed("A", dt(2024, 1, 1), dt(2024, 1, 5)),
            closed("A", dt(2024, 1, 2), dt(2024, 1, 8)),
        ];
        let histories = aggregate_lead_time(&facts);
        let series = &histories[&SeriesKey::new("A")];
        assert_eq!(series[&date(2024, 1, 1)], 3.0); // mean(2, 4)
        assert_eq!(series[&date(2024, 1, 2)], 6.0);
    }

    #[test]
    fn lead_time_skips_open_and_inverted_orders() {
        let facts = vec![
            LeadTimeFact {
                row_state: "Open".to_string(),
                ..closed("A", dt(2024, 1, 1), dt(2024, 1, 3))
            },
            // Completion not after entry.
            closed("A", dt(2024, 1, 4), dt(2024, 1, 4)),
            LeadTimeFact {
                completed_at: None,
                ..closed("A", dt(2024, 1, 5), dt(2024, 1, 9))
            },
        ];
        let histories = aggregate_lead_time(&facts);
        assert!(!histories.contains_key(&SeriesKey::new("A")));
        // The aggregate series still exists, just empty.
        assert!(histories[&SeriesKey::aggregate()].is_empty());
    }

    #[test]
    fn lead_time_aggregate_averages_per_part_means() {
        let facts = vec![
            // Part A: three same-day orders, bucket mean 2.
            closed("A", dt(2024, 1, 1), dt(2024, 1, 3)),
            closed("A", dt(2024, 1, 1), dt(2024, 1, 3)),
            closed("A", dt(2024, 1, 1), dt(2024, 1, 3)),
            // Part B: one order of 8 days.
            closed("B", dt(2024, 1, 1), dt(2024, 1, 9)),
        ];
        let histories = aggregate_lead_time(&facts);
        // Average of the two bucket means (2 and 8), not of the four orders.
        assert_eq!(histories[&SeriesKey::aggregate()][&date(2024, 1, 1)], 5.0);
    }

    #[test]
    fn lead_time_missing_part_goes_to_unknown_series() {
        let facts = vec![LeadTimeFact {
            part_no: None,
            ..closed("_", dt(2024, 1, 1), dt(2024, 1, 2))
        }];
        let histories = aggregate_lead_time(&facts);
        assert!(histories.contains_key(&SeriesKey::unknown()));
    }

    #[test]
    fn sales_sums_per_part_per_month_and_in_aggregate() {
        let facts = vec![
            SalesFact {
                part_no: Some("A".to_string()),
                sale_date: date(2024, 3, 5),
                quantity: 2.0,
            },
            SalesFact {
                part_no: Some("A".to_string()),
                sale_date: date(2024, 3, 28),
                quantity: 3.0,
            },
            SalesFact {
                part_no: Some("B".to_string()),
                sale_date: date(2024, 3, 10),
                quantity: 10.0,
            },
        ];
        let histories = aggregate_sales(&facts);
        assert_eq!(histories[&SeriesKey::new("A")][&date(2024, 3, 1)], 5.0);
        assert_eq!(histories[&SeriesKey::new("B")][&date(2024, 3, 1)], 10.0);
        assert_eq!(histories[&SeriesKey::aggregate()][&date(2024, 3, 1)], 15.0);
    }

    #[test]
    fn buckets_iterate_chronologically() {
        let facts = vec![
            SalesFact {
                part_no: Some("A".to_string()),
                sale_date: date(2024, 5, 1),
                quantity: 1.0,
            },
            SalesFact {
                part_no: Some("A".to_string()),
                sale_date: date(2024, 2, 1),
                quantity: 1.0,
            },
            SalesFact {
                part_no: Some("A".to_string()),
                sale_date: date(2024, 4, 1),
                quantity: 1.0,
            },
        ];
        let histories = aggregate_sales(&facts);
        let buckets: Vec<NaiveDate> = histories[&SeriesKey::new("A")].keys().copied().collect();
        assert_eq!(
            buckets,
            vec![date(2024, 2, 1), date(2024, 4, 1), date(2024, 5, 1)]
        );
    }
}
