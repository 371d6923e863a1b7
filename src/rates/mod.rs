//! Yield rate quotes and the daily-compounding rate model

mod model;
pub mod loader;

pub use model::{accrue, growth_factor, inverse_duration, DAYS_PER_YEAR, SECONDS_PER_DAY};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Source of an annualized yield rate
///
/// Base supply interest and token-emission yield accrue independently on the
/// same principal; the projector treats them as additive over one daily step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateSource {
    /// Supply interest paid by the pool
    Base,
    /// Secondary token-emission yield
    Emission,
}

impl RateSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateSource::Base => "base",
            RateSource::Emission => "emission",
        }
    }
}

/// An annualized yield rate in effect from a given instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateQuote {
    /// Which yield source the quote belongs to
    pub source: RateSource,

    /// Annual rate as a decimal fraction (0.08 = 8%)
    pub annual_rate: Decimal,

    /// Instant from which this quote applies
    pub effective_from: DateTime<Utc>,
}

/// Quote history for both yield sources
///
/// Historical accrual uses the quote in effect at each point; forward
/// projection uses the most recent quote. An empty history quotes zero.
#[derive(Debug, Clone, Default)]
pub struct RateHistory {
    /// Base quotes ordered by effective_from
    base: Vec<RateQuote>,
    /// Emission quotes ordered by effective_from
    emission: Vec<RateQuote>,
}

impl RateHistory {
    /// Build a history from quotes in any order
    pub fn new(mut quotes: Vec<RateQuote>) -> Self {
        quotes.sort_by_key(|q| q.effective_from);
        let (base, emission) = quotes
            .into_iter()
            .partition(|q| q.source == RateSource::Base);
        Self { base, emission }
    }

    /// Single quote pair effective from one instant
    pub fn flat(
        base_rate: Decimal,
        emission_rate: Decimal,
        effective_from: DateTime<Utc>,
    ) -> Self {
        Self::new(vec![
            RateQuote {
                source: RateSource::Base,
                annual_rate: base_rate,
                effective_from,
            },
            RateQuote {
                source: RateSource::Emission,
                annual_rate: emission_rate,
                effective_from,
            },
        ])
    }

    fn quotes(&self, source: RateSource) -> &[RateQuote] {
        match source {
            RateSource::Base => &self.base,
            RateSource::Emission => &self.emission,
        }
    }

    /// Rate in effect at the given instant; zero before the first quote
    pub fn rate_at(&self, source: RateSource, at: DateTime<Utc>) -> Decimal {
        self.quotes(source)
            .iter()
            .rev()
            .find(|q| q.effective_from <= at)
            .map(|q| q.annual_rate)
            .unwrap_or(Decimal::ZERO)
    }

    /// Base + emission rate in effect at the given instant
    pub fn combined_rate_at(&self, at: DateTime<Utc>) -> Decimal {
        self.rate_at(RateSource::Base, at) + self.rate_at(RateSource::Emission, at)
    }

    /// Most recent quote for one source; zero when the history is empty
    pub fn current_rate(&self, source: RateSource) -> Decimal {
        self.quotes(source)
            .last()
            .map(|q| q.annual_rate)
            .unwrap_or(Decimal::ZERO)
    }

    /// Most recent base + emission rate
    pub fn current_combined_rate(&self) -> Decimal {
        self.current_rate(RateSource::Base) + self.current_rate(RateSource::Emission)
    }
}
