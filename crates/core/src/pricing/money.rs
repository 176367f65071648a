//! Decimal helpers shared by the pricing stages.
//!
//! Arithmetic saturates instead of panicking: coerced external input can be
//! arbitrarily large, and pricing must never abort a recalculation.

use rust_decimal::{Decimal, RoundingStrategy};

pub const MONEY_DP: u32 = 2;

pub fn rounding_step() -> Decimal {
    Decimal::ONE_HUNDRED
}

pub fn product(factors: &[Decimal]) -> Decimal {
    factors.iter().fold(Decimal::ONE, |acc, factor| acc.saturating_mul(*factor))
}

pub fn total<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    amounts.into_iter().fold(Decimal::ZERO, |acc, amount| acc.saturating_add(amount))
}

/// `amount × pct / 100`.
pub fn percent_of(amount: Decimal, pct: Decimal) -> Decimal {
    amount.saturating_mul(pct).checked_div(Decimal::ONE_HUNDRED).unwrap_or(Decimal::ZERO)
}

/// Rounds up to the next multiple of 100; exact multiples and zero are unchanged.
pub fn round_up_to_hundred(amount: Decimal) -> Decimal {
    let step = rounding_step();
    amount
        .checked_div(step)
        .and_then(|steps| steps.ceil().checked_mul(step))
        .unwrap_or(amount)
}

/// `amount / divisor` at money precision, or zero when the divisor is not positive.
pub fn per_unit(amount: Decimal, divisor: Decimal) -> Decimal {
    if divisor <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    amount
        .checked_div(divisor)
        .map(round_money)
        .unwrap_or(Decimal::ZERO)
}

pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}
