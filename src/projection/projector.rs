//! Projector
//!
//! Compounds the reconciled last balance forward at the combined current
//! rate, one fixed step per point, until the horizon is reached.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::error::EngineError;
use crate::rates::growth_factor;

use super::chart::{ChartPoint, Regime};

/// Configuration for forward projection
#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    /// Compounding step between projected points; must be positive
    pub step: Duration,

    /// Hard cap on how far past "now" the projection extends
    pub max_horizon: Duration,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            step: Duration::days(1),
            max_horizon: Duration::days(365),
        }
    }
}

/// Produces the current point plus the projected tail of the chart
pub struct Projector {
    config: ProjectionConfig,
}

impl Projector {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    /// Project the last balance forward from `now` to `horizon`
    ///
    /// The first point is always the `current` regime point carrying
    /// `last_balance` exactly; every further point compounds the previous
    /// one by one step. The tail is non-decreasing for non-negative rates
    /// and strictly increasing for a positive rate on a positive balance.
    pub fn project(
        &self,
        last_balance: Decimal,
        cost_basis: Decimal,
        annual_rate: Decimal,
        now: DateTime<Utc>,
        horizon: DateTime<Utc>,
    ) -> Result<Vec<ChartPoint>, EngineError> {
        debug_assert!(self.config.step > Duration::zero());

        let horizon = horizon.min(now + self.config.max_horizon);
        let factor = growth_factor(annual_rate, self.config.step.num_seconds())?;

        let mut points = vec![ChartPoint::new(
            now.date_naive(),
            last_balance,
            cost_basis,
            Regime::Current,
        )];

        let mut balance = last_balance;
        let mut t = now + self.config.step;
        while t <= horizon {
            balance *= factor;
            points.push(ChartPoint::new(
                t.date_naive(),
                balance,
                cost_basis,
                Regime::Projected,
            ));
            t += self.config.step;
        }

        Ok(points)
    }
}

impl Default for Projector {
    fn default() -> Self {
        Self::new(ProjectionConfig::default())
    }
}
