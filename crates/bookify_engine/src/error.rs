// --- File: crates/bookify_engine/src/error.rs ---
use bookify_common::{BookifyError, StoreError};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors produced by the availability engine.
///
/// Two expected negative outcomes are deliberately *not* errors: a day with
/// no resolvable schedule and a date past the advance-booking limit both
/// come back as an unavailable [`crate::models::AvailabilityResult`] with a
/// message, since they are ordinary states rather than failures.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A commitment read failed. Retryable; the engine never reports
    /// "available" or "no conflict" on partial data.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The request was malformed and no query was issued.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// An interval did not satisfy `start < end`.
    #[error("invalid interval: start {start} is not before end {end}")]
    InvalidInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        EngineError::StorageUnavailable(err.to_string())
    }
}

impl From<EngineError> for BookifyError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::StorageUnavailable(msg) => BookifyError::StorageError(msg),
            EngineError::InvalidRequest(msg) => BookifyError::ValidationError(msg),
            EngineError::InvalidInterval { start, end } => BookifyError::ValidationError(format!(
                "interval start {} is not before end {}",
                start, end
            )),
        }
    }
}
