//! Solvency math.
//!
//! Pure fixed-point functions over `U256` with 18-decimal working precision.
//! Every step truncates toward zero and every multiplication is checked, so
//! results are bit-exact with plain unsigned integer arithmetic and overflow
//! surfaces as [`DhcError::MathOverflow`] instead of wrapping.
//!
//! Health factor:
//!
//! ```text
//! hf = (collateral_usd * LIQUIDATION_THRESHOLD / LIQUIDATION_PRECISION) * PRECISION / debt
//! ```
//!
//! The threshold scaling happens before the precision scaling. Reordering the
//! two divisions changes rounding.

use odra::casper_types::U256;
use crate::errors::{DhcError, EngineError, EngineResult};

/// Working precision (1e18)
pub const PRECISION: u128 = 1_000_000_000_000_000_000;

/// Price feeds answer with 8 decimals
pub const FEED_PRECISION: u128 = 100_000_000;

/// Rescales an 8-decimal feed answer to working precision (1e10)
pub const ADDITIONAL_FEED_PRECISION: u128 = 10_000_000_000;

/// Collateral counts at 50% of its value (200% over-collateralization)
pub const LIQUIDATION_THRESHOLD: u64 = 50;

/// Denominator for threshold and bonus percentages
pub const LIQUIDATION_PRECISION: u64 = 100;

/// Extra collateral paid to liquidators, in percent
pub const LIQUIDATION_BONUS: u64 = 10;

/// Positions below this health factor are liquidatable (1.0)
pub const MIN_HEALTH_FACTOR: u128 = 1_000_000_000_000_000_000;

fn mul(a: U256, b: U256) -> EngineResult<U256> {
    a.checked_mul(b).ok_or(EngineError::Rejected(DhcError::MathOverflow))
}

/// Price in working precision. Zero prices are rejected here so no later
/// division can hit zero.
fn working_price(feed_price: U256) -> EngineResult<U256> {
    if feed_price.is_zero() {
        return Err(DhcError::InvalidPrice.into());
    }
    mul(feed_price, U256::from(ADDITIONAL_FEED_PRECISION))
}

/// USD value (18 decimals) of `amount` tokens at an 8-decimal feed price.
pub fn usd_value(feed_price: U256, amount: U256) -> EngineResult<U256> {
    let price = working_price(feed_price)?;
    Ok(mul(price, amount)? / U256::from(PRECISION))
}

/// Token amount worth `usd_amount` at an 8-decimal feed price.
///
/// Inverse of [`usd_value`] for the same price sample.
pub fn token_amount_from_usd(feed_price: U256, usd_amount: U256) -> EngineResult<U256> {
    let price = working_price(feed_price)?;
    Ok(mul(usd_amount, U256::from(PRECISION))? / price)
}

/// Health factor for a position. Zero debt is infinitely healthy.
pub fn health_factor(total_debt: U256, collateral_value_usd: U256) -> EngineResult<U256> {
    if total_debt.is_zero() {
        return Ok(U256::MAX);
    }
    let adjusted = mul(collateral_value_usd, U256::from(LIQUIDATION_THRESHOLD))?
        / U256::from(LIQUIDATION_PRECISION);
    Ok(mul(adjusted, U256::from(PRECISION))? / total_debt)
}

/// Bonus collateral on top of `seized` for a liquidator.
pub fn liquidation_bonus(seized: U256) -> EngineResult<U256> {
    Ok(mul(seized, U256::from(LIQUIDATION_BONUS))? / U256::from(LIQUIDATION_PRECISION))
}

/// Fails with the factor attached if it is below [`MIN_HEALTH_FACTOR`].
pub fn check_health_factor(factor: U256) -> EngineResult<()> {
    if factor < U256::from(MIN_HEALTH_FACTOR) {
        return Err(EngineError::BreaksHealthFactor(factor));
    }
    Ok(())
}

/// Checked sum of collateral values.
pub fn add_usd(total: U256, value: U256) -> EngineResult<U256> {
    total
        .checked_add(value)
        .ok_or(EngineError::Rejected(DhcError::MathOverflow))
}
