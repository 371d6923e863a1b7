//! Yield Engine - balance history reconciliation and yield projection for lending pools
//!
//! This library provides:
//! - Daily-compounding rate model for base supply and token-emission yield
//! - Reconciliation of raw on-chain balance observations into a baseline series
//! - Forward projection of the live balance across historical/current/projected regimes
//! - Caller-scoped display windows with boundary interpolation and down-sampling
//! - Display-ready summary metrics (interest earned, APY, growth)

pub mod engine;
pub mod error;
pub mod period;
pub mod projection;
pub mod rates;
pub mod runner;
pub mod series;
pub mod summary;

// Re-export commonly used types
pub use engine::{BalanceEngine, ChartPayload, EngineConfig};
pub use error::EngineError;
pub use period::{ExplorePeriod, PeriodWindow, WalletPeriod};
pub use projection::{ChartPoint, Regime};
pub use rates::{RateHistory, RateQuote, RateSource};
pub use series::{BalanceObservation, ObservationKind, ReconciledSeries};
pub use summary::BalanceSummary;
