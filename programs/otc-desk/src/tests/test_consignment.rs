use super::*;
use crate::errors::OtcError;

#[test]
fn negotiable_terms_within_bounds() {
    let c = test_consignment(Pubkey::new_unique());
    c.validate_offer_terms(1_000 * 1_000_000, 1_000, 30 * SECONDS_PER_DAY)
        .unwrap();
    // Bound values are inclusive.
    c.validate_offer_terms(c.min_deal_amount, c.min_discount_bps, 0)
        .unwrap();
    c.validate_offer_terms(c.max_deal_amount, c.max_discount_bps, 60 * SECONDS_PER_DAY)
        .unwrap();
}

#[test]
fn negotiable_terms_out_of_bounds() {
    let c = test_consignment(Pubkey::new_unique());

    assert_otc_err(
        c.validate_offer_terms(c.min_deal_amount - 1, 1_000, 0),
        OtcError::AmountRange,
    );
    assert_otc_err(
        c.validate_offer_terms(c.max_deal_amount + 1, 1_000, 0),
        OtcError::AmountRange,
    );
    assert_otc_err(
        c.validate_offer_terms(c.min_deal_amount, c.min_discount_bps - 1, 0),
        OtcError::Discount,
    );
    assert_otc_err(
        c.validate_offer_terms(c.min_deal_amount, c.max_discount_bps + 1, 0),
        OtcError::Discount,
    );
    assert_otc_err(
        c.validate_offer_terms(c.min_deal_amount, 1_000, 61 * SECONDS_PER_DAY),
        OtcError::LockupOutOfRange,
    );
    assert_otc_err(
        c.validate_offer_terms(c.min_deal_amount, 1_000, -1),
        OtcError::LockupOutOfRange,
    );
}

#[test]
fn terms_respect_remaining_inventory() {
    let mut c = test_consignment(Pubkey::new_unique());
    c.remaining_amount = 500 * 1_000_000;
    assert_otc_err(
        c.validate_offer_terms(1_000 * 1_000_000, 1_000, 0),
        OtcError::InsufficientInventory,
    );
}

#[test]
fn fixed_terms_must_match_exactly() {
    let mut c = test_consignment(Pubkey::new_unique());
    c.is_negotiable = false;
    c.fixed_discount_bps = 1_500;
    c.fixed_lockup_days = 90;

    c.validate_offer_terms(1_000 * 1_000_000, 1_500, 90 * SECONDS_PER_DAY)
        .unwrap();
    assert_otc_err(
        c.validate_offer_terms(1_000 * 1_000_000, 1_400, 90 * SECONDS_PER_DAY),
        OtcError::FixedTermsRequired,
    );
    assert_otc_err(
        c.validate_offer_terms(1_000 * 1_000_000, 1_500, 89 * SECONDS_PER_DAY),
        OtcError::FixedTermsRequired,
    );
}

#[test]
fn reserve_release_round_trip() {
    let mut c = test_consignment(Pubkey::new_unique());
    let start = c.remaining_amount;

    c.reserve(3_000 * 1_000_000).unwrap();
    assert_eq!(c.remaining_amount, start - 3_000 * 1_000_000);
    c.release(3_000 * 1_000_000).unwrap();
    assert_eq!(c.remaining_amount, start);
}

#[test]
fn reserve_cannot_exceed_remaining() {
    let mut c = test_consignment(Pubkey::new_unique());
    assert_otc_err(c.reserve(c.remaining_amount + 1), OtcError::Overflow);
}

#[test]
fn release_cannot_exceed_total() {
    let mut c = test_consignment(Pubkey::new_unique());
    assert_otc_err(c.release(1), OtcError::Overflow);
}

#[test]
fn private_listing_gates_buyers() {
    let mut c = test_consignment(Pubkey::new_unique());
    let buyer = Pubkey::new_unique();
    let stranger = Pubkey::new_unique();

    assert!(c.allows_buyer(&stranger));

    c.is_private = true;
    c.allowed_buyers.push(buyer);
    assert!(c.allows_buyer(&buyer));
    assert!(c.allows_buyer(&c.consigner.clone()));
    assert!(!c.allows_buyer(&stranger));
}

#[test]
fn registry_reservation_accounting() {
    let desk = test_desk();
    let mut registry = test_registry(&desk);

    registry.reserve(700).unwrap();
    registry.reserve(300).unwrap();
    assert_eq!(registry.reserved_amount, 1_000);

    registry.release(1_000).unwrap();
    assert_eq!(registry.reserved_amount, 0);
    assert_otc_err(registry.release(1), OtcError::Overflow);
}

#[test]
fn p2p_pool_is_owner_deposits_only() {
    // A treasury full of consignment escrow contributes nothing to the pool,
    // so with zero deposits no desk-level offer can book inventory.
    let mut desk = test_desk();
    assert_otc_err(desk.draw_deposited(1), OtcError::InsufficientInventory);

    desk.token_deposited = 5_000;
    desk.draw_deposited(3_000).unwrap();
    assert_eq!(desk.token_deposited, 2_000);
    assert_otc_err(desk.draw_deposited(2_001), OtcError::InsufficientInventory);

    desk.return_deposited(3_000).unwrap();
    assert_eq!(desk.token_deposited, 5_000);
}
