//! Thin access layer over the forecast pipeline.
//!
//! HTTP routing, request schemas, process settings and the cron trigger
//! live here; all real work happens in `forgecast-engine` and
//! `forgecast-store`.

pub mod app;
pub mod scheduler;
pub mod settings;
pub mod telemetry;

pub use settings::Settings;
