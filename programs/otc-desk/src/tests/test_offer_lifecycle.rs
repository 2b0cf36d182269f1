use super::*;
use crate::errors::OtcError;
use crate::instructions::create_offer::init_offer;
use crate::instructions::emergency::validate_emergency_refund;
use crate::instructions::fulfill_offer::validate_fulfill;

#[test]
fn new_offer_records_desk_and_derived_times() {
    let desk_key = Pubkey::new_unique();
    let mint = Pubkey::new_unique();
    let beneficiary = Pubkey::new_unique();
    let mut offer = test_offer(Pubkey::new_unique(), Currency::Stable);

    init_offer(
        &mut offer,
        desk_key,
        600,
        7,
        3,
        mint,
        6,
        beneficiary,
        1_000 * 1_000_000,
        1_000,
        Currency::Stable,
        30 * SECONDS_PER_DAY,
        50_000_000,
        0,
        0,
        true,
        2_000,
        254,
    )
    .unwrap();

    assert_eq!(offer.desk, desk_key);
    assert_eq!(offer.id, 7);
    assert_eq!(offer.consignment_id, 3);
    assert_eq!(offer.beneficiary, beneficiary);
    assert_eq!(offer.unlock_time, 2_000 + 30 * SECONDS_PER_DAY);
    assert_eq!(offer.expires_at, 2_600);
    assert!(offer.auto_approved);
    assert!(!offer.approved && !offer.paid && !offer.is_terminal());
    assert!(offer.approvals.is_empty());
}

#[test]
fn state_predicates() {
    let desk = test_desk();
    let mut offer = test_offer(desk.owner, Currency::Stable);

    assert!(!offer.is_terminal());
    assert!(!offer.is_payable());

    offer.approved = true;
    assert!(offer.is_payable());

    offer.paid = true;
    assert!(!offer.is_payable());
    assert!(!offer.is_terminal());

    offer.fulfilled = true;
    assert!(offer.is_terminal());

    let mut refunded = test_offer(desk.owner, Currency::Stable);
    refunded.refunded = true;
    assert!(refunded.is_terminal());
}

#[test]
fn stable_offer_payment_amount() {
    let desk = test_desk();
    let offer = test_offer(desk.owner, Currency::Stable);

    // 1,000 tokens at $0.50 less 10%: $450, collected as 450 USDC.
    assert_eq!(offer.total_usd_8d().unwrap(), 45_000_000_000);
    assert_eq!(offer.required_stable_amount().unwrap(), 450_000_000);
    assert_otc_err(offer.required_native_lamports(), OtcError::NotNative);
}

#[test]
fn native_offer_payment_amount() {
    let desk = test_desk();
    let offer = test_offer(desk.owner, Currency::Native);

    // $450 at $200 per native unit: 2.25 native.
    assert_eq!(offer.required_native_lamports().unwrap(), 2_250_000_000);
    assert_otc_err(offer.required_stable_amount(), OtcError::NotStable);
}

#[test]
fn payment_amount_dispatches_on_currency() {
    let desk = test_desk();
    let stable = test_offer(desk.owner, Currency::Stable);
    let native = test_offer(desk.owner, Currency::Native);
    assert_eq!(
        stable.required_payment_amount().unwrap(),
        stable.required_stable_amount().unwrap()
    );
    assert_eq!(
        native.required_payment_amount().unwrap(),
        native.required_native_lamports().unwrap()
    );
}

#[test]
fn fulfill_gate_happy_path() {
    let desk = test_desk();
    let mut offer = test_offer(desk.owner, Currency::Stable);
    offer.approved = true;
    let payer = Pubkey::new_unique();

    validate_fulfill(&desk, &offer, &payer, 1_500).unwrap();

    // Auto-approval is enough on its own.
    offer.approved = false;
    offer.auto_approved = true;
    validate_fulfill(&desk, &offer, &payer, 1_500).unwrap();
}

#[test]
fn fulfill_gate_rejections() {
    let mut desk = test_desk();
    let mut offer = test_offer(desk.owner, Currency::Stable);
    let payer = Pubkey::new_unique();

    assert_otc_err(
        validate_fulfill(&desk, &offer, &payer, 1_500),
        OtcError::NotApproved,
    );

    offer.approved = true;
    assert_otc_err(
        validate_fulfill(&desk, &offer, &payer, offer.expires_at + 1),
        OtcError::Expired,
    );
    // The expiry instant itself is still payable.
    validate_fulfill(&desk, &offer, &payer, offer.expires_at).unwrap();

    desk.paused = true;
    assert_otc_err(validate_fulfill(&desk, &offer, &payer, 1_500), OtcError::Paused);
    desk.paused = false;

    offer.paid = true;
    assert_otc_err(
        validate_fulfill(&desk, &offer, &payer, 1_500),
        OtcError::BadState,
    );
    offer.paid = false;

    offer.cancelled = true;
    assert_otc_err(
        validate_fulfill(&desk, &offer, &payer, 1_500),
        OtcError::BadState,
    );
}

#[test]
fn fulfill_restriction_modes() {
    let mut desk = test_desk();
    let approver = Pubkey::new_unique();
    desk.approvers.push(approver);
    let mut offer = test_offer(desk.owner, Currency::Stable);
    offer.approved = true;
    let stranger = Pubkey::new_unique();

    // Open mode: anyone can pay.
    validate_fulfill(&desk, &offer, &stranger, 1_500).unwrap();

    // Restricted mode: beneficiary and operators only.
    desk.restrict_fulfill = true;
    validate_fulfill(&desk, &offer, &offer.beneficiary.clone(), 1_500).unwrap();
    validate_fulfill(&desk, &offer, &desk.agent.clone(), 1_500).unwrap();
    validate_fulfill(&desk, &offer, &desk.owner.clone(), 1_500).unwrap();
    assert_otc_err(
        validate_fulfill(&desk, &offer, &stranger, 1_500),
        OtcError::FulfillRestricted,
    );

    // Approver-only mode overrides: even the beneficiary is shut out.
    desk.require_approver_to_fulfill = true;
    validate_fulfill(&desk, &offer, &approver, 1_500).unwrap();
    validate_fulfill(&desk, &offer, &desk.agent.clone(), 1_500).unwrap();
    assert_otc_err(
        validate_fulfill(&desk, &offer, &offer.beneficiary.clone(), 1_500),
        OtcError::FulfillApproverOnly,
    );
}

fn refund_fixture() -> (Desk, Offer) {
    let mut desk = test_desk();
    desk.emergency_refund_enabled = true;
    desk.emergency_refund_deadline_secs = 10_000;
    let mut offer = test_offer(desk.owner, Currency::Stable);
    offer.paid = true;
    offer.payer = Pubkey::new_unique();
    (desk, offer)
}

#[test]
fn emergency_refund_timing() {
    let (desk, offer) = refund_fixture();
    let payer = offer.payer;
    let deadline = offer.created_at + desk.emergency_refund_deadline_secs;

    assert_otc_err(
        validate_emergency_refund(&desk, &offer, &payer, deadline - 1),
        OtcError::TooEarlyForRefund,
    );
    validate_emergency_refund(&desk, &offer, &payer, deadline).unwrap();
}

#[test]
fn emergency_refund_unlock_grace_path() {
    // A long creation deadline is bypassed once the lockup matured 30 days ago.
    let (mut desk, mut offer) = refund_fixture();
    desk.emergency_refund_deadline_secs = 1_000_000_000;
    offer.unlock_time = 2_000;
    let payer = offer.payer;

    let grace_end = offer.unlock_time + REFUND_UNLOCK_GRACE_SECS;
    assert_otc_err(
        validate_emergency_refund(&desk, &offer, &payer, grace_end - 1),
        OtcError::TooEarlyForRefund,
    );
    validate_emergency_refund(&desk, &offer, &payer, grace_end).unwrap();
}

#[test]
fn emergency_refund_callers() {
    let (mut desk, offer) = refund_fixture();
    let approver = Pubkey::new_unique();
    desk.approvers.push(approver);
    let late = offer.created_at + desk.emergency_refund_deadline_secs;

    validate_emergency_refund(&desk, &offer, &offer.payer.clone(), late).unwrap();
    validate_emergency_refund(&desk, &offer, &offer.beneficiary.clone(), late).unwrap();
    validate_emergency_refund(&desk, &offer, &desk.owner.clone(), late).unwrap();
    validate_emergency_refund(&desk, &offer, &desk.agent.clone(), late).unwrap();
    validate_emergency_refund(&desk, &offer, &approver, late).unwrap();
    assert_otc_err(
        validate_emergency_refund(&desk, &offer, &Pubkey::new_unique(), late),
        OtcError::NotOwner,
    );
}

#[test]
fn emergency_refund_requires_enabled_and_paid() {
    let (mut desk, mut offer) = refund_fixture();
    let payer = offer.payer;
    let late = offer.created_at + desk.emergency_refund_deadline_secs;

    desk.emergency_refund_enabled = false;
    assert_otc_err(
        validate_emergency_refund(&desk, &offer, &payer, late),
        OtcError::BadState,
    );
    desk.emergency_refund_enabled = true;

    offer.paid = false;
    assert_otc_err(
        validate_emergency_refund(&desk, &offer, &payer, late),
        OtcError::BadState,
    );
    offer.paid = true;

    offer.fulfilled = true;
    assert_otc_err(
        validate_emergency_refund(&desk, &offer, &payer, late),
        OtcError::BadState,
    );
}

#[test]
fn native_price_freshness_on_desk() {
    let mut desk = test_desk();
    assert_otc_err(desk.native_price(1_000), OtcError::NoPrice);

    desk.native_usd_price_8d = 20_000_000_000;
    desk.native_price_updated_at = 1_000;
    assert_eq!(desk.native_price(1_000 + desk.max_price_age_secs).unwrap(), 20_000_000_000);
    assert_otc_err(
        desk.native_price(1_000 + desk.max_price_age_secs + 1),
        OtcError::StalePrice,
    );
}
