//! SQLite persistence and the job orchestrator.
//!
//! Owns the schema, the fact-feed loaders, the atomic forecast replacement
//! (delete + bulk insert inside one transaction), the latest-forecast
//! reader, and the allowlisted query registry consumed by the access layer.

pub mod error;
pub mod facts;
pub mod jobs;
pub mod params;
pub mod reader;
pub mod registry;
pub mod schema;


pub use error::{StoreError, StoreResult};
pub use facts::{load_lead_time_facts, load_sales_facts};
pub use jobs::{ForecastJobConfig, run_forecast_job};
pub use params::validate_params;
pub use reader::{ForecastPoint, LatestForecast, latest_forecast};
pub use registry::{QueryDefinition, execute_allowlisted_query, query_registry};
pub use schema::initialize_schema;
