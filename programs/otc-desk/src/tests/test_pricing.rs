use proptest::prelude::*;

use super::*;
use crate::errors::OtcError;
use crate::utils::math::*;
use crate::utils::{overpayment_refund, quote_usd_8d, required_payment, resolve_price};
use crate::utils::{validate_native_price_bounds, validate_token_price_bounds};

#[test]
fn quote_applies_discount() {
    // 1,000 tokens (6 decimals) at $0.50 with a 10% discount: $450.
    let usd = quote_usd_8d(1_000_000_000, 50_000_000, 6, 1_000).unwrap();
    assert_eq!(usd, 45_000_000_000);
}

#[test]
fn quote_zero_discount_is_gross() {
    let usd = quote_usd_8d(1_000_000_000, 50_000_000, 6, 0).unwrap();
    assert_eq!(usd, 50_000_000_000);
}

#[test]
fn quote_full_discount_is_free() {
    let usd = quote_usd_8d(1_000_000_000, 50_000_000, 6, 10_000).unwrap();
    assert_eq!(usd, 0);
}

#[test]
fn quote_rejects_discount_above_denominator() {
    assert_otc_err(
        quote_usd_8d(1_000_000_000, 50_000_000, 6, 10_001),
        OtcError::Discount,
    );
}

#[test]
fn stable_payment_scales_to_six_decimals() {
    // $450.00000000 -> 450_000_000 stable base units.
    let amount = required_payment(Currency::Stable, 45_000_000_000, 0).unwrap();
    assert_eq!(amount, 450_000_000);
}

#[test]
fn stable_payment_rounds_up() {
    // $0.00000123 is 1.23 stable base units; the desk collects 2.
    let amount = required_payment(Currency::Stable, 123, 0).unwrap();
    assert_eq!(amount, 2);
}

#[test]
fn native_payment_converts_at_native_price() {
    // $450 at $200 per native unit: 2.25 native, in lamports.
    let lamports = required_payment(Currency::Native, 45_000_000_000, 20_000_000_000).unwrap();
    assert_eq!(lamports, 2_250_000_000);
}

#[test]
fn native_payment_rounds_up() {
    let lamports = required_payment(Currency::Native, 1, 3).unwrap();
    assert_eq!(lamports, 333_333_334);
}

#[test]
fn native_payment_needs_a_price() {
    assert_otc_err(
        required_payment(Currency::Native, 45_000_000_000, 0),
        OtcError::NoPrice,
    );
}

#[test]
fn overpayment_refund_math() {
    assert_eq!(overpayment_refund(100, 100).unwrap(), 0);
    assert_eq!(overpayment_refund(150, 100).unwrap(), 50);
    assert_otc_err(overpayment_refund(99, 100), OtcError::AmountRange);
}

#[test]
fn manual_price_wins_while_fresh() {
    let price = resolve_price(42, 1_000, 99, 1_000, 1_500, 3_600).unwrap();
    assert_eq!(price, 42);
}

#[test]
fn manual_price_expires_even_with_fresh_feed() {
    // A stale override is an error, not a silent fallback to the feed.
    let res = resolve_price(42, 0, 99, 5_000, MANUAL_PRICE_TTL_SECS + 1, 3_600);
    assert_otc_err(res, OtcError::ManualPriceTooOld);
}

#[test]
fn feed_price_applies_without_override() {
    let price = resolve_price(0, 0, 99, 1_000, 1_500, 3_600).unwrap();
    assert_eq!(price, 99);
}

#[test]
fn feed_price_staleness() {
    assert_otc_err(
        resolve_price(0, 0, 99, 1_000, 1_000 + 3_601, 3_600),
        OtcError::StalePrice,
    );
}

#[test]
fn no_price_at_all() {
    assert_otc_err(resolve_price(0, 0, 0, 0, 1_000, 3_600), OtcError::NoPrice);
}

#[test]
fn feed_conversion_to_8_decimals() {
    // $0.50 in three exponent encodings and a whole-dollar one.
    assert_eq!(convert_feed_price(50_000_000, -8).unwrap(), 50_000_000);
    assert_eq!(convert_feed_price(5, -1).unwrap(), 50_000_000);
    assert_eq!(convert_feed_price(50_000, -5).unwrap(), 50_000_000);
    assert_eq!(convert_feed_price(3, 0).unwrap(), 300_000_000);
    assert_eq!(convert_feed_price(12_345_678_900, -10).unwrap(), 123_456_789);
}

#[test]
fn feed_conversion_rejects_non_positive() {
    assert_otc_err(convert_feed_price(0, -8), OtcError::BadPrice);
    assert_otc_err(convert_feed_price(-1, -8), OtcError::BadPrice);
}

#[test]
fn deviation_check() {
    // 5% move against a 10% bound passes; 11% fails.
    check_price_deviation(10_000, 10_500, 1_000).unwrap();
    check_price_deviation(10_000, 9_500, 1_000).unwrap();
    assert_otc_err(
        check_price_deviation(10_000, 11_100, 1_000),
        OtcError::PriceDeviationTooLarge,
    );
    // No previous price or no bound disables the check.
    check_price_deviation(0, 11_100, 1_000).unwrap();
    check_price_deviation(10_000, 99_999, 0).unwrap();
}

#[test]
fn price_bounds() {
    validate_token_price_bounds(1).unwrap();
    validate_token_price_bounds(TOKEN_PRICE_MAX_8D).unwrap();
    assert_otc_err(validate_token_price_bounds(0), OtcError::BadPrice);
    assert_otc_err(
        validate_token_price_bounds(TOKEN_PRICE_MAX_8D + 1),
        OtcError::BadPrice,
    );

    validate_native_price_bounds(NATIVE_PRICE_MIN_8D).unwrap();
    validate_native_price_bounds(NATIVE_PRICE_MAX_8D).unwrap();
    assert_otc_err(
        validate_native_price_bounds(NATIVE_PRICE_MIN_8D - 1),
        OtcError::BadPrice,
    );
    assert_otc_err(
        validate_native_price_bounds(NATIVE_PRICE_MAX_8D + 1),
        OtcError::BadPrice,
    );
}

proptest! {
    #[test]
    fn ceil_div_never_underpays(a in 0u64..u64::MAX, b in 1u64..1_000_000_000, d in 1u64..1_000_000_000) {
        let ceil = mul_div_ceil_u128(a as u128, b as u128, d as u128).unwrap();
        let floor = mul_div_u128(a as u128, b as u128, d as u128).unwrap();
        prop_assert!(ceil >= floor);
        prop_assert!(ceil - floor <= 1);
        prop_assert!(ceil * d as u128 >= a as u128 * b as u128);
    }

    #[test]
    fn stable_payment_covers_the_quote(usd_8d in 0u64..1_000_000_000_000_000) {
        let amount = required_payment(Currency::Stable, usd_8d, 0).unwrap();
        // Paid value, re-expressed at 8 decimals, covers the quote.
        prop_assert!(amount as u128 * 100 >= usd_8d as u128);
    }
}
