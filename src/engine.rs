//! Engine facade
//!
//! Wires the pipeline: observations -> Series Reconciler -> Period Selector
//! -> Projector -> Summary Calculator -> {series, summary} payload.
//!
//! The engine is pure and synchronous: every call builds fresh entities from
//! its inputs and returns a new payload, so concurrent invocations for
//! different wallets need no coordination.

use chrono::{DateTime, Utc};
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::period::{PeriodSelector, PeriodWindow};
use crate::projection::{ChartPoint, ProjectionConfig, Projector, Regime};
use crate::rates::{RateHistory, RateSource};
use crate::series::{BalanceObservation, Reconciler, ReconcilerConfig};
use crate::summary::{summarize, BalanceSummary};

/// Configuration for one engine instance
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub reconciler: ReconcilerConfig,
    pub projection: ProjectionConfig,

    /// Display bound on the historical slice
    pub max_chart_points: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reconciler: ReconcilerConfig::default(),
            projection: ProjectionConfig::default(),
            max_chart_points: crate::period::DEFAULT_MAX_POINTS,
        }
    }
}

/// Final payload surfaced to the API layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPayload {
    pub series: Vec<ChartPoint>,
    pub summary: BalanceSummary,
}

impl ChartPayload {
    /// Fallback payload for a wallet with no recorded history: a single
    /// zero-balance `current` point and an all-zero summary, with the pool's
    /// APYs still populated
    pub fn zero(rates: &RateHistory, now: DateTime<Utc>) -> Self {
        Self {
            series: vec![ChartPoint::new(
                now.date_naive(),
                Decimal::ZERO,
                Decimal::ZERO,
                Regime::Current,
            )],
            summary: BalanceSummary {
                display_balance: "0".to_string(),
                raw_balance: Decimal::ZERO,
                base_apy_percentage: rates.current_rate(RateSource::Base)
                    * Decimal::ONE_HUNDRED,
                emission_apy_percentage: rates.current_rate(RateSource::Emission)
                    * Decimal::ONE_HUNDRED,
                interest_earned: Decimal::ZERO,
                annual_yield_estimate: Decimal::ZERO,
                growth_percentage: Decimal::ZERO,
            },
        }
    }
}

/// Balance & yield projection engine
pub struct BalanceEngine {
    config: EngineConfig,
}

impl BalanceEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Run the full pipeline for one wallet
    ///
    /// `now` anchors the window cutoff and the projection start; callers
    /// pass the wall clock (or a fixed instant in tests).
    pub fn chart(
        &self,
        observations: &[BalanceObservation],
        rates: &RateHistory,
        window: impl Into<PeriodWindow>,
        now: DateTime<Utc>,
    ) -> Result<ChartPayload, EngineError> {
        let window = window.into();

        let reconciler = Reconciler::new(self.config.reconciler.clone(), rates);
        let series = reconciler.reconcile(observations)?;

        let projector = Projector::new(self.config.projection.clone());
        let tail = projector.project(
            series.last_balance(),
            series.cost_basis,
            rates.current_combined_rate(),
            now,
            now + window.horizon,
        )?;

        let selector = PeriodSelector::new(self.config.max_chart_points);
        let points = selector.select(&series, window, now, &tail);

        let summary = summarize(&series, rates)?;

        debug!(
            "chart: {} observations -> {} points",
            observations.len(),
            points.len()
        );
        Ok(ChartPayload {
            series: points,
            summary,
        })
    }
}

impl Default for BalanceEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
