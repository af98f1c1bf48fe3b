//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type CoreResult<T> = Result<T, CoreError>;

/// Domain-level error.
///
/// Keep this focused on deterministic validation/configuration failures.
/// Infrastructure concerns (database, transport) belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A bucket frequency value outside the supported set. This is a fatal
    /// configuration error; a run must abort before writing anything.
    #[error("unsupported bucket frequency '{0}'")]
    UnsupportedFrequency(String),

    /// A raw timestamp/date representation that is neither a native temporal
    /// value nor ISO-8601 text. Never silently coerced.
    #[error("malformed temporal value: {0}")]
    MalformedTimestamp(String),
}

impl CoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unsupported_frequency(raw: impl Into<String>) -> Self {
        Self::UnsupportedFrequency(raw.into())
    }

    pub fn malformed_timestamp(msg: impl Into<String>) -> Self {
        Self::MalformedTimestamp(msg.into())
    }
}
