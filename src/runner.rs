//! Batch runner for efficient multi-wallet runs
//!
//! Pre-loads the rate history and engine configuration once, then runs many
//! wallet computations without re-reading inputs.

use chrono::{DateTime, Utc};

use crate::engine::{BalanceEngine, ChartPayload, EngineConfig};
use crate::error::EngineError;
use crate::period::PeriodWindow;
use crate::rates::RateHistory;
use crate::series::{BalanceObservation, WalletObservations};

/// Pre-loaded runner for batch chart computations
///
/// # Example
/// ```ignore
/// let runner = BatchRunner::new(rates);
///
/// for wallet in &wallets {
///     let payload = runner.run(&wallet.observations, period, now)?;
/// }
/// ```
pub struct BatchRunner {
    engine: BalanceEngine,
    rates: RateHistory,
}

impl BatchRunner {
    /// Create a runner with the default engine configuration
    pub fn new(rates: RateHistory) -> Self {
        Self::with_config(rates, EngineConfig::default())
    }

    /// Create a runner with a custom engine configuration
    pub fn with_config(rates: RateHistory, config: EngineConfig) -> Self {
        Self {
            engine: BalanceEngine::new(config),
            rates,
        }
    }

    /// Get a reference to the loaded rate history
    pub fn rates(&self) -> &RateHistory {
        &self.rates
    }

    /// Run the engine for one wallet
    pub fn run(
        &self,
        observations: &[BalanceObservation],
        window: impl Into<PeriodWindow>,
        now: DateTime<Utc>,
    ) -> Result<ChartPayload, EngineError> {
        self.engine.chart(observations, &self.rates, window, now)
    }

    /// Run the engine for a block of wallets with the same window
    pub fn run_batch(
        &self,
        wallets: &[WalletObservations],
        window: PeriodWindow,
        now: DateTime<Utc>,
    ) -> Vec<(String, Result<ChartPayload, EngineError>)> {
        wallets
            .iter()
            .map(|w| (w.wallet.clone(), self.run(&w.observations, window, now)))
            .collect()
    }
}
