use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Fixed time granularity used to collapse raw records into buckets and to
/// step forecast timestamps forward from the last observed bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketFrequency {
    Daily,
    Monthly,
}

impl BucketFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            BucketFrequency::Daily => "daily",
            BucketFrequency::Monthly => "monthly",
        }
    }

    /// Bucket lying `steps_ahead` steps after `last_bucket`.
    ///
    /// Daily stepping adds whole days. Monthly stepping adds calendar months
    /// and normalizes to the first day of the resulting month, rolling the
    /// year over when the month index exceeds December.
    pub fn step(&self, last_bucket: NaiveDate, steps_ahead: u32) -> NaiveDate {
        match self {
            BucketFrequency::Daily => last_bucket + Duration::days(i64::from(steps_ahead)),
            BucketFrequency::Monthly => add_months(last_bucket, steps_ahead),
        }
    }
}

fn add_months(day: NaiveDate, months: u32) -> NaiveDate {
    let month_index = day.month0() + months;
    let year = day.year() + (month_index / 12) as i32;
    let month = (month_index % 12) + 1;
    NaiveDate::from_ymd_opt(year, month, 1).expect("first day of month is always a valid date")
}

impl std::fmt::Display for BucketFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BucketFrequency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(BucketFrequency::Daily),
            "monthly" => Ok(BucketFrequency::Monthly),
            other => Err(CoreError::unsupported_frequency(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn daily_steps_cross_month_boundaries() {
        let last = d(2024, 6, 28);
        assert_eq!(BucketFrequency::Daily.step(last, 1), d(2024, 6, 29));
        assert_eq!(BucketFrequency::Daily.step(last, 2), d(2024, 6, 30));
        assert_eq!(BucketFrequency::Daily.step(last, 3), d(2024, 7, 1));
    }

    #[test]
    fn monthly_steps_roll_the_year_over() {
        let last = d(2024, 11, 1);
        assert_eq!(BucketFrequency::Monthly.step(last, 1), d(2024, 12, 1));
        assert_eq!(BucketFrequency::Monthly.step(last, 2), d(2025, 1, 1));
        assert_eq!(BucketFrequency::Monthly.step(last, 3), d(2025, 2, 1));
    }

    #[test]
    fn monthly_step_normalizes_to_first_of_month() {
        assert_eq!(BucketFrequency::Monthly.step(d(2024, 3, 17), 1), d(2024, 4, 1));
    }

    #[test]
    fn unsupported_frequency_is_a_fatal_parse_error() {
        let err = "weekly".parse::<BucketFrequency>().unwrap_err();
        assert_eq!(err, CoreError::unsupported_frequency("weekly"));
    }
}
