//! Unit tests over the pure state and pricing layer. Instruction handlers are
//! thin orchestration around these paths, so the invariants of the settlement
//! engine are testable without a validator.

mod test_consignment;
mod test_offer_lifecycle;
mod test_pricing;

pub use anchor_lang::prelude::*;

pub use crate::constants::*;
pub use crate::state::{Consignment, Currency, Desk, Offer, TokenRegistry};

pub fn test_desk() -> Desk {
    Desk {
        owner: Pubkey::new_unique(),
        agent: Pubkey::new_unique(),
        stable_mint: Pubkey::new_unique(),
        stable_decimals: STABLE_DECIMALS,
        token_mint: Pubkey::new_unique(),
        token_decimals: 6,
        token_deposited: 0,
        min_usd_amount_8d: 1,
        max_token_per_order: 1_000_000 * 1_000_000,
        max_discount_bps: 5_000,
        quote_expiry_secs: 600,
        max_lockup_secs: 365 * SECONDS_PER_DAY,
        restrict_fulfill: false,
        require_approver_to_fulfill: false,
        emergency_refund_enabled: false,
        emergency_refund_deadline_secs: 30 * SECONDS_PER_DAY,
        approvers: Vec::new(),
        required_approvals: 1,
        paused: false,
        native_price_feed_id: [0u8; 32],
        native_usd_price_8d: 0,
        native_price_updated_at: 0,
        max_price_age_secs: 3_600,
        next_consignment_id: 1,
        next_offer_id: 1,
        open_offers: Vec::new(),
        bump: 255,
    }
}

pub fn test_registry(desk: &Desk) -> TokenRegistry {
    TokenRegistry {
        desk: desk.owner, // placeholder key; tests that care set their own
        token_mint: desk.token_mint,
        decimals: 6,
        is_active: true,
        price_feed_id: [0u8; 32],
        usd_price_8d: 0,
        price_updated_at: 0,
        manual_usd_price_8d: 0,
        manual_price_updated_at: 0,
        reserved_amount: 0,
        bump: 255,
    }
}

/// Negotiable listing of 10,000 tokens (6 decimals): discount 5-20%, lockup
/// 0-60 days, deal bounds 100-5,000 tokens.
pub fn test_consignment(desk_key: Pubkey) -> Consignment {
    Consignment {
        desk: desk_key,
        id: 1,
        token_mint: Pubkey::new_unique(),
        consigner: Pubkey::new_unique(),
        total_amount: 10_000 * 1_000_000,
        remaining_amount: 10_000 * 1_000_000,
        is_negotiable: true,
        fixed_discount_bps: 0,
        fixed_lockup_days: 0,
        min_discount_bps: 500,
        max_discount_bps: 2_000,
        min_lockup_days: 0,
        max_lockup_days: 60,
        min_deal_amount: 100 * 1_000_000,
        max_deal_amount: 5_000 * 1_000_000,
        is_fractionalized: true,
        is_private: false,
        allowed_buyers: Vec::new(),
        max_price_volatility_bps: 0,
        max_time_to_execute_secs: 0,
        is_active: true,
        created_at: 0,
        bump: 255,
    }
}

pub fn test_offer(desk_key: Pubkey, currency: Currency) -> Offer {
    Offer {
        desk: desk_key,
        id: 1,
        consignment_id: 1,
        token_mint: Pubkey::new_unique(),
        token_decimals: 6,
        beneficiary: Pubkey::new_unique(),
        token_amount: 1_000 * 1_000_000,
        discount_bps: 1_000,
        lockup_secs: 0,
        price_usd_per_token_8d: 50_000_000, // $0.50
        native_usd_price_8d: if currency == Currency::Native {
            20_000_000_000 // $200
        } else {
            0
        },
        max_price_deviation_bps: 0,
        currency,
        approvals: Vec::new(),
        approved: false,
        auto_approved: false,
        paid: false,
        fulfilled: false,
        cancelled: false,
        refunded: false,
        payer: Pubkey::default(),
        amount_paid: 0,
        created_at: 1_000,
        unlock_time: 1_000,
        expires_at: 1_600,
        bump: 255,
    }
}

pub fn assert_otc_err<T: std::fmt::Debug>(res: Result<T>, expected: crate::errors::OtcError) {
    assert_eq!(res.unwrap_err(), anchor_lang::error::Error::from(expected));
}
