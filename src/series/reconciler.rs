//! Series Reconciler
//!
//! Turns an unordered set of balance observations into a single
//! monotonically-timestamped baseline series with a known cost basis:
//! - observations are sorted by timestamp (insertion order breaks ties)
//! - duplicate timestamps merge by summing deltas
//! - deposits and withdrawals move the cost basis; snapshot-only balance
//!   changes are yield and leave it untouched
//! - wide gaps between consecutive snapshots are densified with synthetic
//!   daily points accrued at the rate in effect on each day, so charts do
//!   not show stair-step artifacts where the wallet simply was not sampled

use chrono::{DateTime, Duration, Utc};
use log::debug;
use rust_decimal::Decimal;

use crate::error::EngineError;
use crate::rates::{growth_factor, RateHistory, SECONDS_PER_DAY};

use super::observation::{BalanceObservation, ObservationKind};

/// Configuration for series reconciliation
#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    /// Snapshot-to-snapshot gaps wider than this receive synthetic daily
    /// points
    pub gap_fill_threshold: Duration,

    /// Disable gap smoothing entirely; the series then holds observed points
    /// only
    pub fill_gaps: bool,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            gap_fill_threshold: Duration::days(1),
            fill_gaps: true,
        }
    }
}

/// One point of the reconciled baseline series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub timestamp: DateTime<Utc>,

    /// Total balance at this instant
    pub balance: Decimal,

    /// Net deposits up to and including this instant
    pub cost_basis: Decimal,

    /// Synthesized by gap smoothing rather than observed
    pub synthetic: bool,
}

/// Reconciled baseline series
///
/// Owned by one computation and never mutated after construction; rebuilt on
/// each request. Timestamps are strictly increasing.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledSeries {
    /// Net deposits over the whole series
    pub cost_basis: Decimal,

    /// Points with strictly increasing timestamps; never empty
    pub points: Vec<SeriesPoint>,
}

impl ReconciledSeries {
    /// Balance at the most recent point
    pub fn last_balance(&self) -> Decimal {
        self.points.last().map(|p| p.balance).unwrap_or(Decimal::ZERO)
    }

    /// Timestamp of the most recent point
    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.points.last().map(|p| p.timestamp)
    }
}

/// Reconciles raw observations against a rate history
pub struct Reconciler<'a> {
    config: ReconcilerConfig,
    rates: &'a RateHistory,
}

impl<'a> Reconciler<'a> {
    pub fn new(config: ReconcilerConfig, rates: &'a RateHistory) -> Self {
        Self { config, rates }
    }

    pub fn with_defaults(rates: &'a RateHistory) -> Self {
        Self::new(ReconcilerConfig::default(), rates)
    }

    /// Build the baseline series for one wallet
    pub fn reconcile(
        &self,
        observations: &[BalanceObservation],
    ) -> Result<ReconciledSeries, EngineError> {
        if observations.is_empty() {
            return Err(EngineError::EmptySeries);
        }

        let mut sorted: Vec<&BalanceObservation> = observations.iter().collect();
        // Stable sort: equal timestamps keep insertion order
        sorted.sort_by_key(|o| o.timestamp);

        let mut balance = Decimal::ZERO;
        let mut cost_basis = Decimal::ZERO;
        // (point, had a deposit/withdrawal at this timestamp)
        let mut merged: Vec<(SeriesPoint, bool)> = Vec::with_capacity(sorted.len());

        for (i, obs) in sorted.iter().enumerate() {
            match obs.kind {
                ObservationKind::Deposit => {
                    balance += obs.amount;
                    cost_basis += obs.amount;
                }
                ObservationKind::Withdrawal => {
                    balance -= obs.amount;
                    cost_basis -= obs.amount;
                }
                ObservationKind::Snapshot => {
                    // A first-ever snapshot is the opening deposit
                    if i == 0 {
                        cost_basis = obs.amount;
                    }
                    balance = obs.amount;
                }
            }

            let flow = obs.kind.is_flow();
            match merged.last_mut() {
                Some((last, last_flow)) if last.timestamp == obs.timestamp => {
                    last.balance = balance;
                    last.cost_basis = cost_basis;
                    *last_flow = *last_flow || flow;
                }
                _ => merged.push((
                    SeriesPoint {
                        timestamp: obs.timestamp,
                        balance,
                        cost_basis,
                        synthetic: false,
                    },
                    flow,
                )),
            }
        }

        let points = if self.config.fill_gaps {
            self.fill_gaps(merged)?
        } else {
            merged.into_iter().map(|(p, _)| p).collect()
        };

        Ok(ReconciledSeries { cost_basis, points })
    }

    /// Insert synthetic daily points across wide snapshot-to-snapshot gaps
    ///
    /// Only strictly-between points are added; observed balances are kept
    /// verbatim, so the observed endpoints anchor the accrued curve.
    fn fill_gaps(
        &self,
        merged: Vec<(SeriesPoint, bool)>,
    ) -> Result<Vec<SeriesPoint>, EngineError> {
        let mut out = Vec::with_capacity(merged.len());
        let mut inserted = 0usize;

        for i in 0..merged.len() {
            let (point, flow) = merged[i];
            out.push(point);

            let Some(&(next, next_flow)) = merged.get(i + 1) else {
                continue;
            };
            // Smoothing applies between pure snapshots only; principal moves
            // are real discontinuities
            if flow || next_flow {
                continue;
            }
            if next.timestamp - point.timestamp <= self.config.gap_fill_threshold {
                continue;
            }

            let mut balance = point.balance;
            let mut t = point.timestamp + Duration::days(1);
            while t < next.timestamp {
                let rate = self.rates.combined_rate_at(t - Duration::days(1));
                balance *= growth_factor(rate, SECONDS_PER_DAY)?;
                out.push(SeriesPoint {
                    timestamp: t,
                    balance,
                    cost_basis: point.cost_basis,
                    synthetic: true,
                });
                inserted += 1;
                t += Duration::days(1);
            }
        }

        if inserted > 0 {
            debug!("synthesized {} daily points across snapshot gaps", inserted);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn day(offset: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap() + Duration::days(offset)
    }

    fn no_rates() -> RateHistory {
        RateHistory::default()
    }

    #[test]
    fn test_empty_series_is_reported() {
        let rates = no_rates();
        let result = Reconciler::with_defaults(&rates).reconcile(&[]);
        assert_eq!(result.unwrap_err(), EngineError::EmptySeries);
    }

    #[test]
    fn test_single_snapshot_seeds_cost_basis() {
        let rates = no_rates();
        let series = Reconciler::with_defaults(&rates)
            .reconcile(&[BalanceObservation::snapshot(day(0), dec!(750))])
            .unwrap();

        assert_eq!(series.points.len(), 1);
        assert_eq!(series.cost_basis, dec!(750));
        assert_eq!(series.last_balance(), dec!(750));
    }

    #[test]
    fn test_snapshot_growth_is_yield_not_cost_basis() {
        let rates = no_rates();
        let series = Reconciler::with_defaults(&rates)
            .reconcile(&[
                BalanceObservation::deposit(day(0), dec!(1000)),
                BalanceObservation::snapshot(day(1), dec!(1002.5)),
            ])
            .unwrap();

        assert_eq!(series.cost_basis, dec!(1000));
        assert_eq!(series.last_balance(), dec!(1002.5));
    }

    #[test]
    fn test_withdrawal_reduces_cost_basis() {
        let rates = no_rates();
        let series = Reconciler::with_defaults(&rates)
            .reconcile(&[
                BalanceObservation::deposit(day(0), dec!(1000)),
                BalanceObservation::withdrawal(day(1), dec!(400)),
            ])
            .unwrap();

        assert_eq!(series.cost_basis, dec!(600));
        assert_eq!(series.last_balance(), dec!(600));
    }

    #[test]
    fn test_unordered_observations_are_sorted() {
        let rates = no_rates();
        let series = Reconciler::with_defaults(&rates)
            .reconcile(&[
                BalanceObservation::snapshot(day(1), dec!(1001)),
                BalanceObservation::deposit(day(0), dec!(1000)),
            ])
            .unwrap();

        assert_eq!(series.points[0].timestamp, day(0));
        assert_eq!(series.points[0].balance, dec!(1000));
        assert_eq!(series.last_balance(), dec!(1001));
    }

    #[test]
    fn test_duplicate_timestamps_merge_by_summing_deltas() {
        let rates = no_rates();
        let series = Reconciler::with_defaults(&rates)
            .reconcile(&[
                BalanceObservation::deposit(day(0), dec!(300)),
                BalanceObservation::deposit(day(0), dec!(200)),
            ])
            .unwrap();

        assert_eq!(series.points.len(), 1);
        assert_eq!(series.last_balance(), dec!(500));
        assert_eq!(series.cost_basis, dec!(500));
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let rates = RateHistory::flat(dec!(0.08), dec!(0.02), day(-30));
        let observations = [
            BalanceObservation::deposit(day(0), dec!(1000)),
            BalanceObservation::snapshot(day(3), dec!(1001)),
            BalanceObservation::snapshot(day(10), dec!(1003)),
        ];

        let reconciler = Reconciler::with_defaults(&rates);
        let first = reconciler.reconcile(&observations).unwrap();
        let second = reconciler.reconcile(&observations).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_gap_fill_densifies_snapshot_gaps() {
        let rates = RateHistory::flat(dec!(0.10), dec!(0.02), day(-30));
        let series = Reconciler::with_defaults(&rates)
            .reconcile(&[
                BalanceObservation::snapshot(day(0), dec!(1000)),
                BalanceObservation::snapshot(day(5), dec!(1001.7)),
            ])
            .unwrap();

        // 2 observed + 4 synthetic daily points strictly between them
        assert_eq!(series.points.len(), 6);
        assert_eq!(series.points[0].balance, dec!(1000));
        assert_eq!(series.points[5].balance, dec!(1001.7));
        assert!(series.points[1..5].iter().all(|p| p.synthetic));

        // Synthetic balances accrue upward from the left endpoint
        for pair in series.points[..5].windows(2) {
            assert!(pair[1].balance > pair[0].balance);
            assert!(pair[1].timestamp - pair[0].timestamp == Duration::days(1));
        }
    }

    #[test]
    fn test_gap_fill_skips_flows() {
        let rates = RateHistory::flat(dec!(0.10), dec!(0.02), day(-30));
        let series = Reconciler::with_defaults(&rates)
            .reconcile(&[
                BalanceObservation::deposit(day(0), dec!(1000)),
                BalanceObservation::snapshot(day(5), dec!(1001.4)),
            ])
            .unwrap();

        // No smoothing against a deposit endpoint
        assert_eq!(series.points.len(), 2);
    }

    #[test]
    fn test_gap_fill_disabled() {
        let rates = RateHistory::flat(dec!(0.10), dec!(0.02), day(-30));
        let config = ReconcilerConfig {
            fill_gaps: false,
            ..Default::default()
        };
        let series = Reconciler::new(config, &rates)
            .reconcile(&[
                BalanceObservation::snapshot(day(0), dec!(1000)),
                BalanceObservation::snapshot(day(10), dec!(1003)),
            ])
            .unwrap();

        assert_eq!(series.points.len(), 2);
    }

    #[test]
    fn test_timestamps_strictly_increasing() {
        let rates = RateHistory::flat(dec!(0.05), dec!(0.01), day(-30));
        let series = Reconciler::with_defaults(&rates)
            .reconcile(&[
                BalanceObservation::deposit(day(0), dec!(500)),
                BalanceObservation::snapshot(day(0), dec!(500)),
                BalanceObservation::snapshot(day(4), dec!(500.3)),
                BalanceObservation::snapshot(day(9), dec!(500.9)),
            ])
            .unwrap();

        for pair in series.points.windows(2) {
            assert!(pair[0].timestamp < pair[1].timestamp);
        }
    }
}
