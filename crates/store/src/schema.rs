//! Idempotent schema bootstrap.
//!
//! The fact tables (`part_master`, `ic_orders`, `sales_history`) are owned
//! by an external feed and treated as read-only here; `forecast_outputs` is
//! the table this service writes. `ix_forecast_lookup` serves both reader
//! access patterns: max `generated_at` per `(domain, series_key)` and the
//! timestamp-ordered scan of one generation.

use sqlx::SqlitePool;

use crate::error::StoreResult;

const DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS part_master (
        part_no          TEXT PRIMARY KEY,
        part_description TEXT NOT NULL,
        part_category    TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS ic_orders (
        order_no           TEXT    NOT NULL,
        line_no            INTEGER NOT NULL,
        part_no            TEXT,
        date_entered       TEXT    NOT NULL,
        need_date          TEXT,
        org_start_date     TEXT,
        revised_start_date TEXT,
        complete_date      TEXT,
        real_ship_date     TEXT,
        division           TEXT,
        rowstate           TEXT    NOT NULL,
        PRIMARY KEY (order_no, line_no)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS sales_history (
        id        INTEGER PRIMARY KEY AUTOINCREMENT,
        part_no   TEXT,
        sale_date TEXT NOT NULL,
        quantity  REAL NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS forecast_outputs (
        id                  INTEGER PRIMARY KEY AUTOINCREMENT,
        domain              TEXT NOT NULL,
        series_key          TEXT NOT NULL,
        timestamp           TEXT NOT NULL,
        value               REAL NOT NULL,
        p10                 REAL,
        p50                 REAL,
        p90                 REAL,
        generated_at        TEXT NOT NULL,
        model_version       TEXT NOT NULL,
        source_window_start TEXT,
        source_window_end   TEXT,
        notes               TEXT
    )
    "#,
    "CREATE INDEX IF NOT EXISTS ix_ic_orders_part_entered ON ic_orders (part_no, date_entered)",
    "CREATE INDEX IF NOT EXISTS ix_sales_part_date ON sales_history (part_no, sale_date)",
    r#"
    CREATE INDEX IF NOT EXISTS ix_forecast_lookup
        ON forecast_outputs (domain, series_key, generated_at, timestamp)
    "#,
];

/// Create tables and indexes if they do not exist yet. Safe to call on
/// every process start and before every run.
pub async fn initialize_schema(pool: &SqlitePool) -> StoreResult<()> {
    for statement in DDL {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
