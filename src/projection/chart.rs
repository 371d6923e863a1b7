//! Display-ready chart rows
//!
//! The selector and projector both emit these; the API layer serializes
//! them verbatim as {date, balance, deposit, yield, type}.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which regime a chart point belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    /// Observed on-chain history
    Historical,
    /// The live value at request time
    Current,
    /// Forward-looking compounded estimate
    Projected,
}

impl Regime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Regime::Historical => "historical",
            Regime::Current => "current",
            Regime::Projected => "projected",
        }
    }
}

/// A single point of the balance chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Calendar day, normalized to UTC
    pub date: NaiveDate,

    /// Total balance
    pub balance: Decimal,

    /// Cost-basis component of the balance
    pub deposit: Decimal,

    /// Yield component (balance minus deposit), serialized as `yield`
    #[serde(rename = "yield")]
    pub earned: Decimal,

    /// Regime label, serialized as `type`
    #[serde(rename = "type")]
    pub regime: Regime,
}

impl ChartPoint {
    /// Build a point, deriving the yield component
    pub fn new(date: NaiveDate, balance: Decimal, deposit: Decimal, regime: Regime) -> Self {
        Self {
            date,
            balance,
            deposit,
            earned: balance - deposit,
            regime,
        }
    }
}
