//! Fact-feed loaders.
//!
//! Both loaders run against the job transaction's connection so the history
//! read and the destructive forecast write share one transactional scope.
//! Filters mirror what the aggregator expects: the lead-time feed is
//! restricted server-side to closed orders completed after entry, inside
//! the lookback window.

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{Row, SqliteConnection};

use forgecast_engine::{LeadTimeFact, SalesFact};

use crate::error::StoreResult;

/// Load closed lead-time order lines entered at or after `lookback_start`.
pub async fn load_lead_time_facts(
    conn: &mut SqliteConnection,
    lookback_start: NaiveDateTime,
) -> StoreResult<Vec<LeadTimeFact>> {
    let rows = sqlx::query(
        r#"
        SELECT part_no, date_entered, complete_date, rowstate
        FROM ic_orders
        WHERE date_entered >= ?
          AND complete_date IS NOT NULL
          AND complete_date > date_entered
          AND rowstate = 'Closed'
        ORDER BY date_entered ASC
        "#,
    )
    .bind(lookback_start)
    .fetch_all(&mut *conn)
    .await?;

    let mut facts = Vec::with_capacity(rows.len());
    for row in rows {
        facts.push(LeadTimeFact {
            part_no: row.try_get("part_no")?,
            entered_at: row.try_get("date_entered")?,
            completed_at: row.try_get("complete_date")?,
            row_state: row.try_get("rowstate")?,
        });
    }
    Ok(facts)
}

/// Load sales quantity records with a sale date at or after `lookback_start`.
pub async fn load_sales_facts(
    conn: &mut SqliteConnection,
    lookback_start: NaiveDate,
) -> StoreResult<Vec<SalesFact>> {
    let rows = sqlx::query(
        r#"
        SELECT part_no, sale_date, quantity
        FROM sales_history
        WHERE sale_date >= ?
        ORDER BY sale_date ASC
        "#,
    )
    .bind(lookback_start)
    .fetch_all(&mut *conn)
    .await?;

    let mut facts = Vec::with_capacity(rows.len());
    for row in rows {
        facts.push(SalesFact {
            part_no: row.try_get("part_no")?,
            sale_date: row.try_get("sale_date")?,
            quantity: row.try_get("quantity")?,
        });
    }
    Ok(facts)
}
