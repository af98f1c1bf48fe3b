use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Forecasted subject area.
///
/// Each domain has its own fact feed, bucket granularity and horizon, but
/// shares the same pipeline and output table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastDomain {
    /// Order lead time in whole days, bucketed daily.
    LeadTime,
    /// Sold quantity, bucketed by calendar month.
    Sales,
}

impl ForecastDomain {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastDomain::LeadTime => "lead_time",
            ForecastDomain::Sales => "sales",
        }
    }
}

impl std::fmt::Display for ForecastDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForecastDomain {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lead_time" => Ok(ForecastDomain::LeadTime),
            "sales" => Ok(ForecastDomain::Sales),
            other => Err(CoreError::validation(format!(
                "unknown forecast domain '{other}' (expected 'lead_time' or 'sales')"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_str() {
        for domain in [ForecastDomain::LeadTime, ForecastDomain::Sales] {
            assert_eq!(domain.as_str().parse::<ForecastDomain>().unwrap(), domain);
        }
    }

    #[test]
    fn rejects_unknown_domain() {
        assert!("weather".parse::<ForecastDomain>().is_err());
    }
}
