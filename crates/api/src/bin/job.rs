//! One-shot forecast run: execute a single job and print the run summary
//! as JSON. Exits non-zero on failure, leaving the previous generation in
//! place.

use sqlx::sqlite::SqlitePoolOptions;

use forgecast_api::settings::{Settings, ensure_sqlite_parent_dir};
use forgecast_api::telemetry;
use forgecast_store::run_forecast_job;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    telemetry::init();

    let settings = Settings::load();
    ensure_sqlite_parent_dir(&settings.database_url)?;
    let pool = SqlitePoolOptions::new()
        .connect(&settings.database_url)
        .await?;

    let summary = run_forecast_job(&pool, &settings.job_config(), None).await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
