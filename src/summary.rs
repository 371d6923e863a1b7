//! Summary Calculator
//!
//! Derives the scalar display metrics from the reconciled series and the
//! current rate quotes.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::rates::{accrue, RateHistory, RateSource, DAYS_PER_YEAR, SECONDS_PER_DAY};
use crate::series::ReconciledSeries;

/// Balances below this display with escalated precision
const DUST_THRESHOLD: Decimal = dec!(0.01);

/// Scalar display metrics for a wallet's pool balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSummary {
    /// Balance rounded for display; dust balances keep 6 decimals
    pub display_balance: String,

    /// Exact balance
    pub raw_balance: Decimal,

    /// Base supply APY, in percent
    pub base_apy_percentage: Decimal,

    /// Token-emission APY, in percent
    pub emission_apy_percentage: Decimal,

    /// lastBalance minus costBasis; negative on realized principal loss and
    /// rendered as-is
    pub interest_earned: Decimal,

    /// Interest the current balance would accrue over the next 365 days at
    /// the combined current rate
    pub annual_yield_estimate: Decimal,

    /// interest_earned over cost_basis, in percent; zero when the cost basis
    /// is zero
    pub growth_percentage: Decimal,
}

/// Derive the summary for one reconciled series
pub fn summarize(
    series: &ReconciledSeries,
    rates: &RateHistory,
) -> Result<BalanceSummary, EngineError> {
    let last_balance = series.last_balance();
    let cost_basis = series.cost_basis;

    let interest_earned = last_balance - cost_basis;
    let growth_percentage = if cost_basis > Decimal::ZERO {
        interest_earned / cost_basis * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };

    let base_rate = rates.current_rate(RateSource::Base);
    let emission_rate = rates.current_rate(RateSource::Emission);
    let annual_yield_estimate = accrue(
        last_balance,
        base_rate + emission_rate,
        SECONDS_PER_DAY * i64::from(DAYS_PER_YEAR),
    )?;

    Ok(BalanceSummary {
        display_balance: display_balance(last_balance),
        raw_balance: last_balance,
        base_apy_percentage: base_rate * Decimal::ONE_HUNDRED,
        emission_apy_percentage: emission_rate * Decimal::ONE_HUNDRED,
        interest_earned,
        annual_yield_estimate,
        growth_percentage,
    })
}

/// Display rounding: 2 decimals, escalated to 6 for nonzero dust balances
fn display_balance(balance: Decimal) -> String {
    let decimals = if !balance.is_zero() && balance.abs() < DUST_THRESHOLD {
        6
    } else {
        2
    };
    balance
        .round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
        .to_string()
}
