use anchor_lang::prelude::*;

use crate::state::Currency;

/// Events for off-chain indexing of the desk lifecycle.

#[event]
pub struct DeskInitialized {
    pub desk: Pubkey,
    pub owner: Pubkey,
    pub agent: Pubkey,
    pub stable_mint: Pubkey,
    pub token_mint: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct TokenRegistered {
    pub desk: Pubkey,
    pub registry: Pubkey,
    pub token_mint: Pubkey,
    pub decimals: u8,
    pub price_feed_id: [u8; 32],
}

#[event]
pub struct ConsignmentCreated {
    pub desk: Pubkey,
    pub consignment: Pubkey,
    pub consignment_id: u64,
    pub consigner: Pubkey,
    pub token_mint: Pubkey,
    pub amount: u64,
    pub is_negotiable: bool,
    pub timestamp: i64,
}

#[event]
pub struct ConsignmentWithdrawn {
    pub desk: Pubkey,
    pub consignment: Pubkey,
    pub consigner: Pubkey,
    pub amount: u64,
    pub timestamp: i64,
}

#[event]
pub struct OfferCreated {
    pub desk: Pubkey,
    pub offer: Pubkey,
    pub offer_id: u64,
    pub consignment_id: u64,
    pub beneficiary: Pubkey,
    pub token_amount: u64,
    pub discount_bps: u16,
    pub currency: Currency,
    pub auto_approved: bool,
    pub unlock_time: i64,
    pub expires_at: i64,
}

#[event]
pub struct OfferApproved {
    pub offer: Pubkey,
    pub approver: Pubkey,
    pub approvals: u8,
    pub approved: bool,
}

#[event]
pub struct OfferCancelled {
    pub offer: Pubkey,
    pub by: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct OfferPaid {
    pub offer: Pubkey,
    pub payer: Pubkey,
    pub amount_paid: u64,
    pub refunded_excess: u64,
    pub currency: Currency,
}

#[event]
pub struct TokensClaimed {
    pub offer: Pubkey,
    pub beneficiary: Pubkey,
    pub amount: u64,
    pub timestamp: i64,
}

#[event]
pub struct OfferRefunded {
    pub offer: Pubkey,
    pub payer: Pubkey,
    pub amount_refunded: u64,
    pub currency: Currency,
    pub timestamp: i64,
}

#[event]
pub struct AdminEmergencyWithdrawn {
    pub offer: Pubkey,
    pub owner: Pubkey,
    pub token_amount: u64,
    pub timestamp: i64,
}

#[event]
pub struct OffersCleaned {
    pub desk: Pubkey,
    pub removed: u64,
    pub remaining: u64,
}

#[event]
pub struct LimitsUpdated {
    pub min_usd_amount_8d: u64,
    pub max_token_per_order: u64,
    pub max_discount_bps: u16,
    pub quote_expiry_secs: i64,
    pub max_lockup_secs: i64,
}

#[event]
pub struct PricesUpdated {
    pub desk: Pubkey,
    pub token_mint: Option<Pubkey>,
    pub usd_price_8d: u64,
    pub updated_at: i64,
    pub manual: bool,
}

#[event]
pub struct FeedsUpdated {
    pub desk: Pubkey,
    pub token_mint: Option<Pubkey>,
    pub feed_id: [u8; 32],
}

#[event]
pub struct ApproverUpdated {
    pub desk: Pubkey,
    pub approver: Pubkey,
    pub allowed: bool,
}

#[event]
pub struct RequiredApprovalsUpdated {
    pub desk: Pubkey,
    pub required_approvals: u8,
}

#[event]
pub struct RestrictFulfillUpdated {
    pub restrict_fulfill: bool,
    pub require_approver_to_fulfill: bool,
}

#[event]
pub struct EmergencyRefundConfigUpdated {
    pub enabled: bool,
    pub deadline_secs: i64,
}

#[event]
pub struct Paused {
    pub paused: bool,
}
