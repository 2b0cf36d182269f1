use anchor_lang::prelude::*;

use crate::errors::OtcError;

pub fn pow10(exp: u32) -> u128 {
    10u128.pow(exp)
}

pub fn mul_div_u128(a: u128, b: u128, d: u128) -> Result<u128> {
    a.checked_mul(b)
        .and_then(|x| x.checked_div(d))
        .ok_or(OtcError::Overflow.into())
}

/// Ceiling division so the desk is never under-paid by a rounded quote.
pub fn mul_div_ceil_u128(a: u128, b: u128, d: u128) -> Result<u128> {
    require!(d > 0, OtcError::Overflow);
    let prod = a.checked_mul(b).ok_or(OtcError::Overflow)?;
    let q = prod / d;
    let r = prod % d;
    Ok(if r == 0 { q } else { q + 1 })
}

pub fn to_u64(v: u128) -> Result<u64> {
    u64::try_from(v).map_err(|_| OtcError::Overflow.into())
}

/// Convert an exponent-scaled oracle price to the 8-decimal USD format.
/// Feed prices are i64 with exponent (price=50000000, expo=-8 means $0.50).
pub fn convert_feed_price(price: i64, exponent: i32) -> Result<u64> {
    require!(price > 0, OtcError::BadPrice);

    // Value is price * 10^exponent; rescaling to 8 decimals multiplies by
    // 10^(8 + exponent).
    let scale = 8i32 + exponent;
    require!((-38..=38).contains(&scale), OtcError::BadPrice);

    let price_u128 = price as u128;
    let result = if scale >= 0 {
        price_u128
            .checked_mul(pow10(scale as u32))
            .ok_or(OtcError::Overflow)?
    } else {
        price_u128 / pow10((-scale) as u32)
    };

    to_u64(result)
}

/// Absolute move of `new` vs `old` must stay within `max_deviation_bps`.
/// A zero bound or an unset previous price disables the check.
pub fn check_price_deviation(old: u64, new: u64, max_deviation_bps: u16) -> Result<()> {
    if old == 0 || max_deviation_bps == 0 {
        return Ok(());
    }
    let diff = if new > old { new - old } else { old - new };
    let max_deviation = (old as u128 * max_deviation_bps as u128) / 10_000u128;
    require!(diff as u128 <= max_deviation, OtcError::PriceDeviationTooLarge);
    Ok(())
}
