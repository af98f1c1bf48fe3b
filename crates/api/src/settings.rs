//! Process-wide configuration, resolved once from the environment.

use forgecast_store::ForecastJobConfig;

/// Immutable process configuration.
///
/// Resolved once at startup and passed explicitly into the scheduler and
/// the pipeline entry point, never read as ambient global state, so runs
/// stay parameterizable and testable in isolation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub api_host: String,
    pub api_port: u16,
    /// 5-field cron expression driving scheduled runs.
    pub forecast_cron: String,
    /// Execute one run immediately at process start, besides the schedule.
    pub forecast_run_on_start: bool,
    pub forecast_horizon_days: usize,
    pub forecast_horizon_months: usize,
    pub forecast_simulations: usize,
    pub forecast_random_seed: u64,
    pub history_lookback_days: i64,
    /// Server-side cap on rows returned by the query endpoints.
    pub allowed_query_row_limit: usize,
}

impl Settings {
    /// Load settings from the environment, falling back to defaults for
    /// unset or unparseable values.
    pub fn load() -> Self {
        Self {
            database_url: string_env("DATABASE_URL", "sqlite://data/forgecast.db?mode=rwc"),
            api_host: string_env("API_HOST", "0.0.0.0"),
            api_port: parsed_env("API_PORT", 8080),
            forecast_cron: string_env("FORECAST_CRON", "0 3 * * *"),
            forecast_run_on_start: bool_env("FORECAST_RUN_ON_START", true),
            forecast_horizon_days: parsed_env("FORECAST_HORIZON_DAYS", 30),
            forecast_horizon_months: parsed_env("FORECAST_HORIZON_MONTHS", 6),
            forecast_simulations: parsed_env("FORECAST_SIMULATIONS", 1000),
            forecast_random_seed: parsed_env("FORECAST_RANDOM_SEED", 42),
            history_lookback_days: parsed_env("HISTORY_LOOKBACK_DAYS", 1460),
            allowed_query_row_limit: parsed_env("ALLOWED_QUERY_ROW_LIMIT", 500),
        }
    }

    /// The per-run pipeline configuration slice of these settings.
    pub fn job_config(&self) -> ForecastJobConfig {
        ForecastJobConfig {
            horizon_days: self.forecast_horizon_days,
            horizon_months: self.forecast_horizon_months,
            simulations: self.forecast_simulations,
            base_seed: self.forecast_random_seed,
            lookback_days: self.history_lookback_days,
        }
    }
}

/// Create the parent directory of a `sqlite://` database path so a first
/// start on a fresh machine does not fail on open. In-memory URLs and
/// non-SQLite URLs are left alone.
pub fn ensure_sqlite_parent_dir(database_url: &str) -> std::io::Result<()> {
    let Some(path) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path == ":memory:" {
        return Ok(());
    }
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn string_env(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parsed_env<T: std::str::FromStr + Copy>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("{name}='{raw}' is not parseable; using default");
            default
        }),
        Err(_) => default,
    }
}

fn bool_env(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(raw) => matches!(
            raw.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "y" | "on"
        ),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var tests mutate process state; each test uses its own variable
    // name so they stay independent under the parallel test runner.

    #[test]
    fn parsed_env_falls_back_on_garbage() {
        unsafe { std::env::set_var("FORGECAST_TEST_PARSED", "not-a-number") };
        assert_eq!(parsed_env("FORGECAST_TEST_PARSED", 7usize), 7);
        unsafe { std::env::remove_var("FORGECAST_TEST_PARSED") };
    }

    #[test]
    fn parsed_env_reads_valid_values() {
        unsafe { std::env::set_var("FORGECAST_TEST_PARSED_OK", "123") };
        assert_eq!(parsed_env("FORGECAST_TEST_PARSED_OK", 7usize), 123);
        unsafe { std::env::remove_var("FORGECAST_TEST_PARSED_OK") };
    }

    #[test]
    fn bool_env_accepts_common_truthy_spellings() {
        for spelling in ["1", "true", "YES", "On", "y"] {
            unsafe { std::env::set_var("FORGECAST_TEST_BOOL", spelling) };
            assert!(bool_env("FORGECAST_TEST_BOOL", false), "{spelling}");
        }
        unsafe { std::env::set_var("FORGECAST_TEST_BOOL", "off") };
        assert!(!bool_env("FORGECAST_TEST_BOOL", true));
        unsafe { std::env::remove_var("FORGECAST_TEST_BOOL") };
    }
}
