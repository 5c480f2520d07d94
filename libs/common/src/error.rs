//! Error taxonomy for the persisted store
//!
//! Connection failures are a blocking, retryable top-level condition.
//! Query and write failures belong to the single operation that issued
//! them and are surfaced to the immediate caller, never substituted with
//! cached or mock data.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Error type for operations against the persisted store
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store cannot be reached at all
    #[error("store connection error: {0}")]
    Connection(#[source] SqlxError),

    /// A remote read failed
    #[error("remote query failed: {0}")]
    Query(#[source] SqlxError),

    /// A remote mutation failed; no retry is attempted
    #[error("remote write failed: {0}")]
    Write(#[source] SqlxError),

    /// Configuration error
    #[error("store configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with StoreError
pub type StoreResult<T> = Result<T, StoreError>;
