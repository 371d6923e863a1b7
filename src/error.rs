//! Engine error types
//!
//! All errors are returned synchronously; the engine performs no I/O and
//! never retries. Degenerate-but-valid states (zero balance, zero rate,
//! zero cost basis) are handled by explicit branches, not errors.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors surfaced by the projection engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Rate below -100% or negative elapsed time. A programming or data
    /// error on the caller's side; not retryable.
    #[error("invalid rate input: annual rate {annual_rate} with elapsed {elapsed_seconds}s")]
    InvalidRate {
        annual_rate: Decimal,
        elapsed_seconds: i64,
    },

    /// No historical observations were supplied. Recoverable: the caller
    /// substitutes a synthetic zero-balance series.
    #[error("no balance observations in series")]
    EmptySeries,

    /// Unrecognized period token for the calling endpoint.
    #[error("unrecognized period token: {0:?}")]
    InvalidPeriod(String),
}
