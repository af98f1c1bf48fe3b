//! Cron-driven forecast runs.
//!
//! The scheduler drives `run_forecast_job` from a cron expression. At most
//! one run may be in flight: a trigger that fires while a run is active is
//! coalesced into a logged no-op instead of being queued, since concurrent
//! runs would race on the same destructive replace. Failed runs are logged
//! and not retried; the previously committed generation stays
//! authoritative.

use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use cron::Schedule;
use sqlx::SqlitePool;
use tracing::{error, info, warn};

use forgecast_store::run_forecast_job;

use crate::settings::Settings;

/// In-flight guard for forecast runs.
#[derive(Debug, Default)]
pub struct RunGuard {
    in_flight: AtomicBool,
}

impl RunGuard {
    /// Claim the run slot. Returns false when a run is already active.
    pub fn try_acquire(&self) -> bool {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn release(&self) {
        self.in_flight.store(false, Ordering::Release);
    }
}

/// Parse a cron expression, accepting the common 5-field form.
///
/// The `cron` crate expects a leading seconds field; a 5-field expression
/// (minute hour day-of-month month day-of-week) gets `0 ` prepended.
pub fn parse_cron(expression: &str) -> Result<Schedule, cron::error::Error> {
    Schedule::from_str(expression).or_else(|_| Schedule::from_str(&format!("0 {expression}")))
}

/// Scheduler loop: optional run at start, then one run per cron fire time.
pub async fn run(pool: SqlitePool, settings: Arc<Settings>, schedule: Schedule) {
    let guard = RunGuard::default();

    if settings.forecast_run_on_start {
        trigger_run(&pool, &settings, &guard).await;
    }

    info!(cron = %settings.forecast_cron, "forecast scheduler started");

    loop {
        let Some(next) = schedule.upcoming(Utc).next() else {
            warn!("cron schedule has no upcoming fire times; scheduler stopping");
            return;
        };
        let wait = (next - Utc::now()).to_std().unwrap_or_default();
        tokio::time::sleep(wait).await;
        trigger_run(&pool, &settings, &guard).await;
    }
}

/// Execute one run under the guard, coalescing overlapping triggers.
pub async fn trigger_run(pool: &SqlitePool, settings: &Settings, guard: &RunGuard) {
    if !guard.try_acquire() {
        warn!("forecast trigger coalesced: a run is already in flight");
        return;
    }

    match run_forecast_job(pool, &settings.job_config(), None).await {
        Ok(summary) => info!(
            run_id = %summary.run_id,
            rows_written = summary.rows_written,
            "scheduled forecast run completed"
        ),
        Err(err) => error!(
            error = %err,
            "forecast run failed; previous generation remains authoritative"
        ),
    }

    guard.release();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_five_field_cron_expressions() {
        // Classic crontab format: minute hour dom month dow.
        let schedule = parse_cron("0 3 * * *").unwrap();
        assert!(schedule.upcoming(Utc).next().is_some());
    }

    #[test]
    fn accepts_six_field_cron_expressions() {
        assert!(parse_cron("30 0 3 * * *").is_ok());
    }

    #[test]
    fn rejects_garbage_cron_expressions() {
        assert!(parse_cron("every day at three").is_err());
    }

    #[test]
    fn guard_coalesces_second_acquire() {
        let guard = RunGuard::default();
        assert!(guard.try_acquire());
        assert!(!guard.try_acquire());
        guard.release();
        assert!(guard.try_acquire());
    }
}
