//! Allowlisted query registry.
//!
//! The access layer never accepts free-form SQL: callers pick a query by id
//! and supply named parameters, which are validated by [`crate::params`]
//! before execution. SQL placeholders use SQLite numbered-parameter syntax
//! (`?N`, the only format sqlx's SQLite driver accepts); `?N` refers to the
//! N-th entry of `allowed_params`, and binds are applied in `allowed_params`
//! order (a repeated `?N` reuses one ordinal, which is how the
//! `(?N IS NULL OR col = ?N)` pattern stays a single bind).

use std::collections::BTreeMap;

use serde_json::{Map, Value, json};
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, SqlitePool, TypeInfo, ValueRef};

use crate::error::{StoreError, StoreResult};

/// One allowlisted query: id, parameter contract and the SQL it runs.
#[derive(Debug, Clone, Copy)]
pub struct QueryDefinition {
    pub query_id: &'static str,
    pub description: &'static str,
    /// Named parameters in placeholder first-occurrence order.
    pub allowed_params: &'static [&'static str],
    /// Subset of `allowed_params` that must be present and non-null.
    pub required_params: &'static [&'static str],
    pub sql: &'static str,
}

impl QueryDefinition {
    pub fn optional_params(&self) -> Vec<&'static str> {
        self.allowed_params
            .iter()
            .copied()
            .filter(|p| !self.required_params.contains(p))
            .collect()
    }
}

/// All allowlisted queries, in stable id order.
pub fn query_registry() -> &'static [QueryDefinition] {
    &[
        QueryDefinition {
            query_id: "ic_orders_lead_time_extract",
            description: "Lead-time extract for closed orders with part metadata. \
                          Use this as the primary input for lead-time forecasting.",
            allowed_params: &["start_date", "part_no"],
            required_params: &["start_date"],
            sql: r#"
                SELECT
                    o.order_no,
                    o.line_no,
                    o.part_no,
                    o.date_entered,
                    o.need_date,
                    o.org_start_date,
                    o.revised_start_date,
                    o.complete_date,
                    o.real_ship_date,
                    CAST((julianday(o.complete_date) - julianday(o.date_entered)) AS INTEGER)
                        AS lead_time_days,
                    o.division,
                    o.rowstate,
                    p.part_description,
                    p.part_category
                FROM ic_orders o
                LEFT JOIN part_master p
                    ON o.part_no = p.part_no
                WHERE
                    o.rowstate = 'Closed'
                    AND o.date_entered >= ?1
                    AND o.complete_date IS NOT NULL
                    AND o.complete_date > o.date_entered
                    AND (?2 IS NULL OR o.part_no = ?2)
                ORDER BY o.date_entered ASC
            "#,
        },
        QueryDefinition {
            query_id: "precomputed_forecast_values",
            description: "Reads forecast rows precomputed by the scheduler. \
                          Use for low-latency agent and reporting queries.",
            allowed_params: &["domain", "series_key"],
            required_params: &["domain", "series_key"],
            sql: r#"
                SELECT
                    domain,
                    series_key,
                    timestamp,
                    value,
                    p10,
                    p50,
                    p90,
                    generated_at,
                    model_version
                FROM forecast_outputs
                WHERE
                    domain = ?1
                    AND series_key = ?2
                ORDER BY generated_at DESC, timestamp DESC
            "#,
        },
        QueryDefinition {
            query_id: "sales_monthly_history",
            description: "Monthly part-level sales history from order quantity records.",
            allowed_params: &["start_date", "part_no"],
            required_params: &["start_date"],
            sql: r#"
                SELECT
                    s.part_no,
                    strftime('%Y-%m-01', s.sale_date) AS month_start,
                    SUM(s.quantity) AS quantity
                FROM sales_history s
                WHERE
                    s.sale_date >= ?1
                    AND (?2 IS NULL OR s.part_no = ?2)
                GROUP BY
                    s.part_no,
                    strftime('%Y-%m-01', s.sale_date)
                ORDER BY month_start ASC, s.part_no ASC
            "#,
        },
    ]
}

/// Look up an allowlisted query by id.
pub fn find_query(query_id: &str) -> StoreResult<&'static QueryDefinition> {
    query_registry()
        .iter()
        .find(|def| def.query_id == query_id)
        .ok_or_else(|| StoreError::UnknownQuery(query_id.to_string()))
}

/// Execute an allowlisted query with validated, normalized parameters.
///
/// `params` must already have passed [`crate::params::validate_params`].
/// Rows are serialized generically by column; the result is capped at
/// `limit` rows after the fetch, mirroring the registry SQL which carries
/// no limit clause of its own.
pub async fn execute_allowlisted_query(
    pool: &SqlitePool,
    definition: &QueryDefinition,
    params: &BTreeMap<String, Value>,
    limit: usize,
) -> StoreResult<Vec<Map<String, Value>>> {
    let mut query = sqlx::query(definition.sql);
    for name in definition.allowed_params {
        query = match params.get(*name) {
            Some(Value::String(s)) => query.bind(s.clone()),
            Some(Value::Number(n)) if n.is_i64() => query.bind(n.as_i64()),
            Some(Value::Number(n)) => query.bind(n.as_f64()),
            Some(Value::Bool(b)) => query.bind(*b),
            _ => query.bind(None::<String>),
        };
    }

    let rows = query.fetch_all(pool).await?;
    rows.iter().take(limit).map(row_to_json).collect()
}

fn row_to_json(row: &SqliteRow) -> StoreResult<Map<String, Value>> {
    let mut object = Map::with_capacity(row.columns().len());
    for (index, column) in row.columns().iter().enumerate() {
        let raw = row.try_get_raw(index)?;
        let value = if raw.is_null() {
            Value::Null
        } else {
            match raw.type_info().name() {
                "INTEGER" => json!(row.try_get::<i64, _>(index)?),
                "REAL" => json!(row.try_get::<f64, _>(index)?),
                _ => json!(row.try_get::<String, _>(index)?),
            }
        };
        object.insert(column.name().to_string(), value);
    }
    Ok(object)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_ids_are_unique_and_sorted() {
        let ids: Vec<&str> = query_registry().iter().map(|d| d.query_id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn required_params_are_a_subset_of_allowed() {
        for def in query_registry() {
            for required in def.required_params {
                assert!(
                    def.allowed_params.contains(required),
                    "{}: '{required}' required but not allowed",
                    def.query_id
                );
            }
        }
    }

    #[test]
    fn unknown_query_id_is_rejected() {
        assert!(matches!(
            find_query("drop_everything"),
            Err(StoreError::UnknownQuery(_))
        ));
    }
}
