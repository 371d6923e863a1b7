//! Display periods accepted by the engine's callers
//!
//! Two caller-scoped vocabularies exist: wallet-balance endpoints request
//! 24h/7d/1mo, explore/APY endpoints request current/7d/30d/90d/180d. Both
//! resolve to a `PeriodWindow` before reaching the selector.

mod selector;

pub use selector::{PeriodSelector, DEFAULT_MAX_POINTS};

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Period tokens for the wallet-balance caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalletPeriod {
    #[serde(rename = "24h")]
    Day,
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "1mo")]
    Month,
}

impl WalletPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            WalletPeriod::Day => "24h",
            WalletPeriod::Week => "7d",
            WalletPeriod::Month => "1mo",
        }
    }

    /// How far back into history the window reaches
    pub fn lookback(&self) -> Duration {
        match self {
            WalletPeriod::Day => Duration::days(1),
            WalletPeriod::Week => Duration::days(7),
            WalletPeriod::Month => Duration::days(30),
        }
    }
}

impl FromStr for WalletPeriod {
    type Err = EngineError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "24h" => Ok(WalletPeriod::Day),
            "7d" => Ok(WalletPeriod::Week),
            "1mo" => Ok(WalletPeriod::Month),
            other => Err(EngineError::InvalidPeriod(other.to_string())),
        }
    }
}

impl fmt::Display for WalletPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Period tokens for the explore/APY caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplorePeriod {
    /// No lookback; the chart is the live value only
    #[serde(rename = "current")]
    Current,
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
    #[serde(rename = "180d")]
    HalfYear,
}

impl ExplorePeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExplorePeriod::Current => "current",
            ExplorePeriod::Week => "7d",
            ExplorePeriod::Month => "30d",
            ExplorePeriod::Quarter => "90d",
            ExplorePeriod::HalfYear => "180d",
        }
    }

    /// How far back into history the window reaches; zero for `current`
    pub fn lookback(&self) -> Duration {
        match self {
            ExplorePeriod::Current => Duration::zero(),
            ExplorePeriod::Week => Duration::days(7),
            ExplorePeriod::Month => Duration::days(30),
            ExplorePeriod::Quarter => Duration::days(90),
            ExplorePeriod::HalfYear => Duration::days(180),
        }
    }
}

impl FromStr for ExplorePeriod {
    type Err = EngineError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "current" => Ok(ExplorePeriod::Current),
            "7d" => Ok(ExplorePeriod::Week),
            "30d" => Ok(ExplorePeriod::Month),
            "90d" => Ok(ExplorePeriod::Quarter),
            "180d" => Ok(ExplorePeriod::HalfYear),
            other => Err(EngineError::InvalidPeriod(other.to_string())),
        }
    }
}

impl fmt::Display for ExplorePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved display window
///
/// `lookback` bounds the historical slice; `horizon` is the forward portion
/// appended from the projector. Every current period token resolves to a
/// zero horizon; non-zero horizons are reserved for future tokens and for
/// direct engine callers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodWindow {
    pub lookback: Duration,
    pub horizon: Duration,
}

impl PeriodWindow {
    pub fn lookback_only(lookback: Duration) -> Self {
        Self {
            lookback,
            horizon: Duration::zero(),
        }
    }
}

impl From<WalletPeriod> for PeriodWindow {
    fn from(period: WalletPeriod) -> Self {
        Self::lookback_only(period.lookback())
    }
}

impl From<ExplorePeriod> for PeriodWindow {
    fn from(period: ExplorePeriod) -> Self {
        Self::lookback_only(period.lookback())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_tokens_round_trip() {
        for period in [WalletPeriod::Day, WalletPeriod::Week, WalletPeriod::Month] {
            assert_eq!(period.as_str().parse::<WalletPeriod>().unwrap(), period);
        }
    }

    #[test]
    fn test_explore_tokens_round_trip() {
        for period in [
            ExplorePeriod::Current,
            ExplorePeriod::Week,
            ExplorePeriod::Month,
            ExplorePeriod::Quarter,
            ExplorePeriod::HalfYear,
        ] {
            assert_eq!(period.as_str().parse::<ExplorePeriod>().unwrap(), period);
        }
    }

    #[test]
    fn test_vocabularies_are_caller_scoped() {
        // Wallet tokens are not explore tokens and vice versa
        assert!(matches!(
            "1mo".parse::<ExplorePeriod>(),
            Err(EngineError::InvalidPeriod(_))
        ));
        assert!(matches!(
            "90d".parse::<WalletPeriod>(),
            Err(EngineError::InvalidPeriod(_))
        ));
        assert!(matches!(
            "current".parse::<WalletPeriod>(),
            Err(EngineError::InvalidPeriod(_))
        ));
    }

    #[test]
    fn test_unknown_token_is_rejected() {
        let err = "fortnight".parse::<WalletPeriod>().unwrap_err();
        assert_eq!(err, EngineError::InvalidPeriod("fortnight".to_string()));
    }

    #[test]
    fn test_current_resolves_to_zero_window() {
        let window = PeriodWindow::from(ExplorePeriod::Current);
        assert_eq!(window.lookback, Duration::zero());
        assert_eq!(window.horizon, Duration::zero());
    }
}
