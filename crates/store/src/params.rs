//! Query parameter validation and normalization.
//!
//! Registry SQL only ever sees bound parameters, so injection is not
//! possible through placeholders; the token scan below is a second fence
//! for string values that end up in `LIKE`-style comparisons or get echoed
//! into reports.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::{StoreError, StoreResult};
use crate::registry::QueryDefinition;

const DANGEROUS_SQL_TOKENS: &[&str] = &[
    ";", "--", "/*", "*/", " XP_", " DROP ", " ALTER ", " TRUNCATE ", " DELETE ", " UPDATE ",
    " INSERT ", " MERGE ", " GRANT ", " REVOKE ", " EXECUTE ", " EXEC ",
];

/// Validate raw request parameters against a query's contract.
///
/// Rejects unknown keys, missing/null required keys and non-scalar values;
/// trims strings (an all-whitespace string counts as absent) and blocks
/// strings containing dangerous SQL tokens. Returns the normalized map
/// ready for binding.
pub fn validate_params(
    definition: &QueryDefinition,
    raw_params: &Map<String, Value>,
) -> StoreResult<BTreeMap<String, Value>> {
    let unknown: Vec<&str> = raw_params
        .keys()
        .map(String::as_str)
        .filter(|key| !definition.allowed_params.contains(key))
        .collect();
    if !unknown.is_empty() {
        return Err(StoreError::invalid_params(format!(
            "unexpected query params: {}",
            unknown.join(", ")
        )));
    }

    let mut normalized = BTreeMap::new();
    for (key, value) in raw_params {
        normalized.insert(key.clone(), normalize_value(key, value)?);
    }

    let missing: Vec<&str> = definition
        .required_params
        .iter()
        .copied()
        .filter(|param| normalized.get(*param).is_none_or(Value::is_null))
        .collect();
    if !missing.is_empty() {
        return Err(StoreError::invalid_params(format!(
            "missing required params: {}",
            missing.join(", ")
        )));
    }

    Ok(normalized)
}

fn normalize_value(key: &str, value: &Value) -> StoreResult<Value> {
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) => Ok(value.clone()),
        Value::String(s) => {
            let stripped = s.trim();
            if stripped.is_empty() {
                return Ok(Value::Null);
            }
            let scan = format!(" {} ", stripped.to_uppercase());
            for token in DANGEROUS_SQL_TOKENS {
                if scan.contains(token) {
                    return Err(StoreError::invalid_params(format!(
                        "unsafe value blocked for '{key}'"
                    )));
                }
            }
            Ok(Value::String(stripped.to_string()))
        }
        other => Err(StoreError::invalid_params(format!(
            "unsupported value type for '{key}': {}",
            type_name(other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::registry::find_query;

    fn lead_time_query() -> &'static QueryDefinition {
        find_query("ic_orders_lead_time_extract").unwrap()
    }

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn accepts_valid_params_and_trims_strings() {
        let params = map(json!({"start_date": "  2024-01-01 ", "part_no": "PART-0001"}));
        let normalized = validate_params(lead_time_query(), &params).unwrap();
        assert_eq!(normalized["start_date"], json!("2024-01-01"));
    }

    #[test]
    fn rejects_unknown_params() {
        let params = map(json!({"start_date": "2024-01-01", "order_no": "X"}));
        let err = validate_params(lead_time_query(), &params).unwrap_err();
        assert!(matches!(err, StoreError::InvalidParams(_)));
    }

    #[test]
    fn rejects_missing_required_params() {
        let params = map(json!({"part_no": "PART-0001"}));
        assert!(validate_params(lead_time_query(), &params).is_err());
        // Whitespace-only counts as absent.
        let params = map(json!({"start_date": "   "}));
        assert!(validate_params(lead_time_query(), &params).is_err());
    }

    #[test]
    fn blocks_dangerous_tokens() {
        for bad in ["2024-01-01; DROP TABLE x", "a -- b", "x union drop y"] {
            let params = map(json!({"start_date": bad}));
            assert!(
                validate_params(lead_time_query(), &params).is_err(),
                "expected '{bad}' to be blocked"
            );
        }
    }

    #[test]
    fn rejects_structured_values() {
        let params = map(json!({"start_date": ["2024-01-01"]}));
        assert!(validate_params(lead_time_query(), &params).is_err());
    }
}
