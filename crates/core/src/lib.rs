//! Domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure
//! concerns): the forecast domains, series keys, bucket frequencies and the
//! core error model shared by the pipeline and the access layer.

pub mod domain;
pub mod error;
pub mod frequency;
pub mod series;

pub use domain::ForecastDomain;
pub use error::{CoreError, CoreResult};
pub use frequency::BucketFrequency;
pub use series::SeriesKey;
