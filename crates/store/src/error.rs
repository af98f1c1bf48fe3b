//! Store-level error model.

use thiserror::Error;

use forgecast_core::{CoreError, ForecastDomain, SeriesKey};

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from the persistence layer and the job orchestrator.
///
/// Any error raised inside a job run aborts the enclosing transaction; the
/// previously committed forecast generation stays visible to readers.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Core(#[from] CoreError),

    /// Distinct "no forecast yet" outcome for the reader, so callers can
    /// map it to a not-found response instead of a server error.
    #[error("no forecast found for domain='{domain}', series_key='{series_key}'")]
    NoForecast {
        domain: ForecastDomain,
        series_key: SeriesKey,
    },

    #[error("unknown query_id '{0}'")]
    UnknownQuery(String),

    #[error("invalid query params: {0}")]
    InvalidParams(String),
}

impl StoreError {
    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::InvalidParams(msg.into())
    }
}
