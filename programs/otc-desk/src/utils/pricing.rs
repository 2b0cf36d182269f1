use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::OtcError;
use crate::state::Currency;
use crate::utils::math::*;

/// USD value of a quote with the discount applied, 8 decimals.
pub fn quote_usd_8d(
    token_amount: u64,
    price_usd_8d: u64,
    token_decimals: u8,
    discount_bps: u16,
) -> Result<u64> {
    require!(discount_bps as u64 <= BPS_DENOMINATOR, OtcError::Discount);
    let gross = mul_div_u128(
        token_amount as u128,
        price_usd_8d as u128,
        pow10(token_decimals as u32),
    )?;
    let net = gross
        .checked_mul((BPS_DENOMINATOR - discount_bps as u64) as u128)
        .ok_or(OtcError::Overflow)?
        / BPS_DENOMINATOR as u128;
    to_u64(net)
}

/// The one place payment amounts are computed; both settlement paths
/// dispatch on the currency tag here so rounding cannot drift between them.
/// Stable amounts round up to the smallest unit; native amounts round up
/// to the lamport.
pub fn required_payment(currency: Currency, usd_8d: u64, native_usd_8d: u64) -> Result<u64> {
    match currency {
        Currency::Stable => to_u64(mul_div_ceil_u128(
            usd_8d as u128,
            pow10(STABLE_DECIMALS as u32),
            pow10(PRICE_DECIMALS),
        )?),
        Currency::Native => {
            require!(native_usd_8d > 0, OtcError::NoPrice);
            to_u64(mul_div_ceil_u128(
                usd_8d as u128,
                LAMPORTS_PER_NATIVE as u128,
                native_usd_8d as u128,
            )?)
        }
    }
}

/// Excess native value sent with a fulfillment; returned to the payer in the
/// same transaction, never retained.
pub fn overpayment_refund(value: u64, required: u64) -> Result<u64> {
    value.checked_sub(required).ok_or(OtcError::AmountRange.into())
}

/// Resolve a USD price from a manual override plus the last feed reading.
/// A set manual price wins while fresh and is rejected once past its TTL;
/// otherwise the feed price applies, subject to the desk's max feed age.
pub fn resolve_price(
    manual_8d: u64,
    manual_updated_at: i64,
    feed_8d: u64,
    feed_updated_at: i64,
    now: i64,
    max_feed_age_secs: i64,
) -> Result<u64> {
    if manual_8d > 0 {
        require!(
            now.saturating_sub(manual_updated_at) <= MANUAL_PRICE_TTL_SECS,
            OtcError::ManualPriceTooOld
        );
        return Ok(manual_8d);
    }
    require!(feed_8d > 0, OtcError::NoPrice);
    require!(
        now.saturating_sub(feed_updated_at) <= max_feed_age_secs,
        OtcError::StalePrice
    );
    Ok(feed_8d)
}

pub fn validate_token_price_bounds(usd_8d: u64) -> Result<()> {
    require!(usd_8d > 0 && usd_8d <= TOKEN_PRICE_MAX_8D, OtcError::BadPrice);
    Ok(())
}

pub fn validate_native_price_bounds(usd_8d: u64) -> Result<()> {
    require!(
        usd_8d >= NATIVE_PRICE_MIN_8D && usd_8d <= NATIVE_PRICE_MAX_8D,
        OtcError::BadPrice
    );
    Ok(())
}
