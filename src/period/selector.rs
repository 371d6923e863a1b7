//! Period Selector
//!
//! Slices the reconciled series to the requested window, synthesizes a
//! boundary point at the cutoff, collapses to calendar days, bounds the
//! display density, and appends the projector's current + projected tail.

use chrono::{DateTime, Duration, Utc};
use log::debug;
use rust_decimal::Decimal;

use crate::projection::{ChartPoint, Regime};
use crate::series::{ReconciledSeries, SeriesPoint};

use super::PeriodWindow;

/// Default display density: daily resolution over the longest window
pub const DEFAULT_MAX_POINTS: usize = 180;

/// Selects and bounds the displayed slice of a reconciled series
#[derive(Debug, Clone)]
pub struct PeriodSelector {
    max_points: usize,
}

impl PeriodSelector {
    pub fn new(max_points: usize) -> Self {
        Self { max_points }
    }

    /// Produce the chronologically ordered chart for one window
    ///
    /// `tail` is the projector output; its first point is the `current`
    /// regime point and wins over same-day history.
    pub fn select(
        &self,
        series: &ReconciledSeries,
        window: PeriodWindow,
        now: DateTime<Utc>,
        tail: &[ChartPoint],
    ) -> Vec<ChartPoint> {
        let cutoff = if window.lookback > Duration::zero() {
            now - window.lookback
        } else {
            now
        };

        let mut slice: Vec<SeriesPoint> = series
            .points
            .iter()
            .filter(|p| p.timestamp >= cutoff)
            .copied()
            .collect();

        // Synthesize the cutoff boundary unless an observed point sits on it
        let on_cutoff = slice.first().is_some_and(|p| p.timestamp == cutoff);
        if !on_cutoff {
            if let Some(boundary) = Self::boundary_point(series, cutoff) {
                slice.insert(0, boundary);
            }
        }

        // Collapse to calendar days; the last value of a day wins
        let mut chart: Vec<ChartPoint> = Vec::with_capacity(slice.len());
        for p in &slice {
            let point = ChartPoint::new(
                p.timestamp.date_naive(),
                p.balance,
                p.cost_basis,
                Regime::Historical,
            );
            match chart.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => chart.push(point),
            }
        }

        let mut merged = Self::downsample(chart, self.max_points);

        // The current point is the source of truth for "now"; same-day (or
        // later) history yields to the tail
        if let Some(first_tail) = tail.first() {
            while merged.last().is_some_and(|p| p.date >= first_tail.date) {
                merged.pop();
            }
        }
        merged.extend_from_slice(tail);

        debug!(
            "selected {} chart points (cutoff {})",
            merged.len(),
            cutoff
        );
        merged
    }

    /// Balance at the cutoff instant
    ///
    /// Balances interpolate linearly between the bracketing points; the cost
    /// basis is a step function and carries the preceding value. When nothing
    /// follows the cutoff, the last balance carries flat.
    fn boundary_point(series: &ReconciledSeries, cutoff: DateTime<Utc>) -> Option<SeriesPoint> {
        let prev = series.points.iter().rev().find(|p| p.timestamp < cutoff)?;
        let next = series.points.iter().find(|p| p.timestamp > cutoff);

        let balance = match next {
            Some(next) => {
                let span = (next.timestamp - prev.timestamp).num_seconds();
                let into = (cutoff - prev.timestamp).num_seconds();
                if span <= 0 {
                    prev.balance
                } else {
                    prev.balance
                        + (next.balance - prev.balance) * Decimal::from(into)
                            / Decimal::from(span)
                }
            }
            None => prev.balance,
        };

        Some(SeriesPoint {
            timestamp: cutoff,
            balance,
            cost_basis: prev.cost_basis,
            synthetic: true,
        })
    }

    /// Bound the historical slice to `max_points`, keeping the endpoints
    fn downsample(points: Vec<ChartPoint>, max_points: usize) -> Vec<ChartPoint> {
        if max_points < 2 || points.len() <= max_points {
            return points;
        }

        let last = points.len() - 1;
        let mut kept = Vec::with_capacity(max_points);
        let mut prev_idx = usize::MAX;
        for i in 0..max_points {
            let idx = i * last / (max_points - 1);
            if idx != prev_idx {
                kept.push(points[idx]);
                prev_idx = idx;
            }
        }
        kept
    }
}

impl Default for PeriodSelector {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_POINTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn at(day: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap() + Duration::days(day)
    }

    fn point(day: i64, balance: Decimal, cost_basis: Decimal) -> SeriesPoint {
        SeriesPoint {
            timestamp: at(day),
            balance,
            cost_basis,
            synthetic: false,
        }
    }

    fn series(points: Vec<SeriesPoint>) -> ReconciledSeries {
        let cost_basis = points.last().map(|p| p.cost_basis).unwrap_or(Decimal::ZERO);
        ReconciledSeries { cost_basis, points }
    }

    fn current_tail(day: i64, balance: Decimal, cost_basis: Decimal) -> Vec<ChartPoint> {
        vec![ChartPoint::new(
            at(day).date_naive(),
            balance,
            cost_basis,
            Regime::Current,
        )]
    }

    #[test]
    fn test_full_window_keeps_all_days() {
        let s = series(vec![
            point(0, dec!(1000), dec!(1000)),
            point(1, dec!(1001), dec!(1000)),
            point(2, dec!(1002), dec!(1000)),
        ]);
        let tail = current_tail(3, dec!(1002), dec!(1000));

        let chart = PeriodSelector::default().select(
            &s,
            PeriodWindow::lookback_only(Duration::days(7)),
            at(3),
            &tail,
        );

        assert_eq!(chart.len(), 4);
        assert!(chart[..3].iter().all(|p| p.regime == Regime::Historical));
        assert_eq!(chart[3].regime, Regime::Current);
    }

    #[test]
    fn test_boundary_interpolates_between_brackets() {
        // Points at day 0 and day 2; cutoff lands exactly between them
        let s = series(vec![
            point(0, dec!(1000), dec!(1000)),
            point(2, dec!(1200), dec!(1000)),
        ]);
        let tail = current_tail(3, dec!(1200), dec!(1000));

        let chart = PeriodSelector::default().select(
            &s,
            PeriodWindow::lookback_only(Duration::days(2)),
            at(3),
            &tail,
        );

        // Boundary at day 1 interpolated halfway, observed day 2, current day 3
        assert_eq!(chart.len(), 3);
        assert_eq!(chart[0].date, at(1).date_naive());
        assert_eq!(chart[0].balance, dec!(1100));
        assert_eq!(chart[1].balance, dec!(1200));
    }

    #[test]
    fn test_observed_point_on_cutoff_wins() {
        let s = series(vec![
            point(0, dec!(1000), dec!(1000)),
            point(1, dec!(1050), dec!(1000)),
            point(2, dec!(1100), dec!(1000)),
        ]);
        let tail = current_tail(3, dec!(1100), dec!(1000));

        let chart = PeriodSelector::default().select(
            &s,
            PeriodWindow::lookback_only(Duration::days(2)),
            at(3),
            &tail,
        );

        // No synthesized boundary: day 1 is already observed
        assert_eq!(chart.len(), 3);
        assert_eq!(chart[0].balance, dec!(1050));
    }

    #[test]
    fn test_stale_series_carries_flat_to_cutoff() {
        // Single observation three days before now; a 24h window still
        // returns one historical point plus the current point
        let s = series(vec![point(0, dec!(800), dec!(800))]);
        let tail = current_tail(3, dec!(800), dec!(800));

        let chart = PeriodSelector::default().select(
            &s,
            PeriodWindow::lookback_only(Duration::days(1)),
            at(3),
            &tail,
        );

        assert_eq!(chart.len(), 2);
        assert_eq!(chart[0].regime, Regime::Historical);
        assert_eq!(chart[0].date, at(2).date_naive());
        assert_eq!(chart[0].balance, dec!(800));
        assert_eq!(chart[1].regime, Regime::Current);
    }

    #[test]
    fn test_intraday_points_collapse_to_last() {
        let mut early = point(1, dec!(1000), dec!(1000));
        early.timestamp = at(1) + Duration::hours(3);
        let mut late = point(1, dec!(1020), dec!(1000));
        late.timestamp = at(1) + Duration::hours(20);

        let s = series(vec![point(0, dec!(990), dec!(990)), early, late]);
        let tail = current_tail(2, dec!(1020), dec!(1000));

        let chart = PeriodSelector::default().select(
            &s,
            PeriodWindow::lookback_only(Duration::days(7)),
            at(2),
            &tail,
        );

        let day1: Vec<_> = chart
            .iter()
            .filter(|p| p.date == at(1).date_naive())
            .collect();
        assert_eq!(day1.len(), 1);
        assert_eq!(day1[0].balance, dec!(1020));
    }

    #[test]
    fn test_zero_lookback_returns_tail_only() {
        let s = series(vec![
            point(0, dec!(1000), dec!(1000)),
            point(1, dec!(1001), dec!(1000)),
        ]);
        let tail = current_tail(1, dec!(1001), dec!(1000));

        let chart = PeriodSelector::default().select(
            &s,
            PeriodWindow::lookback_only(Duration::zero()),
            at(1) + Duration::hours(6),
            &tail,
        );

        assert_eq!(chart.len(), 1);
        assert_eq!(chart[0].regime, Regime::Current);
    }

    #[test]
    fn test_downsample_keeps_endpoints() {
        let points: Vec<SeriesPoint> = (0..100)
            .map(|i| point(i, dec!(1000) + Decimal::from(i), dec!(1000)))
            .collect();
        let s = series(points);
        let tail = current_tail(100, dec!(1099), dec!(1000));

        let chart = PeriodSelector::new(10).select(
            &s,
            PeriodWindow::lookback_only(Duration::days(365)),
            at(100),
            &tail,
        );

        // 10 historical points plus the current point
        assert_eq!(chart.len(), 11);
        assert_eq!(chart[0].balance, dec!(1000));
        assert_eq!(chart[9].balance, dec!(1099));
        for pair in chart.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
    }
}
