use serde::{Deserialize, Serialize};

/// Sentinel key for the per-domain aggregate series.
pub const AGGREGATE_KEY: &str = "__ALL__";

/// Sentinel key for facts with a missing part identifier.
pub const UNKNOWN_KEY: &str = "__UNKNOWN__";

/// Identifier partitioning history within a domain.
///
/// Either a part number, the unknown-part sentinel, or the aggregate
/// sentinel `"__ALL__"`. Ordering is lexicographic on the key text, which is
/// the deterministic series order the output contract requires.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesKey(String);

impl SeriesKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Key for a raw fact's part identifier. Missing identifiers map to the
    /// unknown sentinel rather than being dropped.
    pub fn from_part(part_no: Option<&str>) -> Self {
        match part_no {
            Some(p) if !p.is_empty() => Self(p.to_string()),
            _ => Self::unknown(),
        }
    }

    /// The per-domain aggregate series.
    pub fn aggregate() -> Self {
        Self(AGGREGATE_KEY.to_string())
    }

    /// The unknown-part sentinel series.
    pub fn unknown() -> Self {
        Self(UNKNOWN_KEY.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_aggregate(&self) -> bool {
        self.0 == AGGREGATE_KEY
    }
}

impl std::fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SeriesKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_part_maps_to_unknown_sentinel() {
        assert_eq!(SeriesKey::from_part(None), SeriesKey::unknown());
        assert_eq!(SeriesKey::from_part(Some("")), SeriesKey::unknown());
        assert_eq!(
            SeriesKey::from_part(Some("PART-0001")).as_str(),
            "PART-0001"
        );
    }

    #[test]
    fn keys_sort_lexicographically() {
        let mut keys = vec![
            SeriesKey::new("PART-0002"),
            SeriesKey::aggregate(),
            SeriesKey::new("PART-0001"),
        ];
        keys.sort();
        assert_eq!(
            keys.iter().map(SeriesKey::as_str).collect::<Vec<_>>(),
            vec!["PART-0001", "PART-0002", AGGREGATE_KEY]
        );
    }
}
