use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;

use forgecast_api::app::build_app;
use forgecast_api::settings::{Settings, ensure_sqlite_parent_dir};
use forgecast_api::{scheduler, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    telemetry::init();

    let settings = Arc::new(Settings::load());

    // Bad cron is a fatal configuration error: fail before serving anything.
    let schedule = scheduler::parse_cron(&settings.forecast_cron).map_err(|e| {
        anyhow::anyhow!("invalid FORECAST_CRON '{}': {e}", settings.forecast_cron)
    })?;

    ensure_sqlite_parent_dir(&settings.database_url)?;
    let pool = SqlitePoolOptions::new()
        .connect(&settings.database_url)
        .await?;
    forgecast_store::initialize_schema(&pool).await?;

    tokio::spawn(scheduler::run(pool.clone(), settings.clone(), schedule));

    let app = build_app(pool, settings.clone());
    let listener =
        tokio::net::TcpListener::bind((settings.api_host.as_str(), settings.api_port)).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
