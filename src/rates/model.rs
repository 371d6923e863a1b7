//! Daily-compounding rate model
//!
//! The forward formula shared by historical smoothing, projection, and the
//! annual yield estimate:
//!
//!   interest = principal * ((1 + rate/365)^(elapsed/86400) - 1)
//!
//! The inverse (elapsed time to reach a target interest) exists for
//! diagnostics and symmetry; the core flow never calls it.

use num_traits::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};

use crate::error::EngineError;

/// Seconds in one compounding period (a day)
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Compounding periods per year
pub const DAYS_PER_YEAR: u32 = 365;

fn validate(annual_rate: Decimal, elapsed_seconds: i64) -> Result<(), EngineError> {
    if annual_rate < -Decimal::ONE || elapsed_seconds < 0 {
        return Err(EngineError::InvalidRate {
            annual_rate,
            elapsed_seconds,
        });
    }
    Ok(())
}

/// Growth factor (1 + rate/365)^(elapsed/86400) applied to a unit principal
pub fn growth_factor(annual_rate: Decimal, elapsed_seconds: i64) -> Result<Decimal, EngineError> {
    validate(annual_rate, elapsed_seconds)?;

    if annual_rate.is_zero() || elapsed_seconds == 0 {
        return Ok(Decimal::ONE);
    }

    let daily_base = Decimal::ONE + annual_rate / Decimal::from(DAYS_PER_YEAR);
    let exponent = elapsed_seconds as f64 / SECONDS_PER_DAY as f64;

    daily_base
        .checked_powf(exponent)
        .ok_or(EngineError::InvalidRate {
            annual_rate,
            elapsed_seconds,
        })
}

/// Interest accrued by `principal` at `annual_rate` over `elapsed_seconds`
///
/// Zero for a zero rate or a non-positive principal: there is no
/// negative-balance interest. Negative rates above -100% accrue negative
/// interest.
pub fn accrue(
    principal: Decimal,
    annual_rate: Decimal,
    elapsed_seconds: i64,
) -> Result<Decimal, EngineError> {
    validate(annual_rate, elapsed_seconds)?;

    if principal <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }

    Ok(principal * (growth_factor(annual_rate, elapsed_seconds)? - Decimal::ONE))
}

/// Elapsed seconds for `principal` to accrue `target_interest`
///
/// Solves the accrual formula for time:
///
///   elapsed = 86400 * ln(1 + target/principal) / ln(1 + rate/365)
///
/// Returns 0 for a non-positive target and infinity when the target can
/// never be reached (zero or negative rate, or no principal).
pub fn inverse_duration(
    principal: Decimal,
    annual_rate: Decimal,
    target_interest: Decimal,
) -> Result<f64, EngineError> {
    validate(annual_rate, 0)?;

    if target_interest <= Decimal::ZERO {
        return Ok(0.0);
    }
    if principal <= Decimal::ZERO || annual_rate <= Decimal::ZERO {
        return Ok(f64::INFINITY);
    }

    let ratio = (Decimal::ONE + target_interest / principal).to_f64();
    let daily_base = (Decimal::ONE + annual_rate / Decimal::from(DAYS_PER_YEAR)).to_f64();

    match (ratio, daily_base) {
        (Some(r), Some(d)) if d > 1.0 => Ok(SECONDS_PER_DAY as f64 * r.ln() / d.ln()),
        _ => Ok(f64::INFINITY),
    }
}
