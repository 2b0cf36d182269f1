use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::OtcError;
use crate::utils::{quote_usd_8d, required_payment, resolve_price};

/// Payment currency for an offer. A single tagged variant so the two
/// settlement paths share one payment computation.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Currency {
    Native,
    Stable,
}

/// Global configuration and custody root. One per owner, PDA
/// `[b"desk", owner]`; every other account carries this desk's key and is
/// re-validated against it on each call.
#[account]
pub struct Desk {
    pub owner: Pubkey,
    pub agent: Pubkey,

    pub stable_mint: Pubkey,
    pub stable_decimals: u8,

    /// Default token for desk-level P2P offers.
    pub token_mint: Pubkey,
    pub token_decimals: u8,
    pub token_deposited: u64,

    pub min_usd_amount_8d: u64,
    pub max_token_per_order: u64,
    pub max_discount_bps: u16,
    pub quote_expiry_secs: i64,
    pub max_lockup_secs: i64,

    pub restrict_fulfill: bool,
    pub require_approver_to_fulfill: bool,

    pub emergency_refund_enabled: bool,
    pub emergency_refund_deadline_secs: i64,

    pub approvers: Vec<Pubkey>,
    pub required_approvals: u8,
    pub paused: bool,

    pub native_price_feed_id: [u8; 32],
    pub native_usd_price_8d: u64,
    pub native_price_updated_at: i64,
    pub max_price_age_secs: i64,

    pub next_consignment_id: u64,
    pub next_offer_id: u64,

    /// Bounded index of open offer ids for cheap enumeration.
    pub open_offers: Vec<OpenOfferEntry>,

    pub bump: u8,
}

impl Desk {
    pub const SPACE: usize = 8 + // discriminator
        32 + // owner
        32 + // agent
        32 + // stable_mint
        1 + // stable_decimals
        32 + // token_mint
        1 + // token_decimals
        8 + // token_deposited
        8 + // min_usd_amount_8d
        8 + // max_token_per_order
        2 + // max_discount_bps
        8 + // quote_expiry_secs
        8 + // max_lockup_secs
        1 + // restrict_fulfill
        1 + // require_approver_to_fulfill
        1 + // emergency_refund_enabled
        8 + // emergency_refund_deadline_secs
        (4 + MAX_APPROVERS * 32) + // approvers
        1 + // required_approvals
        1 + // paused
        32 + // native_price_feed_id
        8 + // native_usd_price_8d
        8 + // native_price_updated_at
        8 + // max_price_age_secs
        8 + // next_consignment_id
        8 + // next_offer_id
        (4 + OPEN_OFFER_CAPACITY * OpenOfferEntry::SERIALIZED_LEN) + // open_offers
        1; // bump

    pub fn is_approver(&self, who: &Pubkey) -> bool {
        self.approvers.contains(who)
    }

    /// Agent counts as an approver for operational calls.
    pub fn is_approver_or_agent(&self, who: &Pubkey) -> bool {
        *who == self.agent || self.is_approver(who)
    }

    pub fn is_operator(&self, who: &Pubkey) -> bool {
        *who == self.owner || self.is_approver_or_agent(who)
    }

    /// Fulfillment gate for the configured restriction mode.
    pub fn check_fulfill_allowed(&self, caller: &Pubkey, beneficiary: &Pubkey) -> Result<()> {
        if self.require_approver_to_fulfill {
            require!(self.is_approver_or_agent(caller), OtcError::FulfillApproverOnly);
            return Ok(());
        }
        if self.restrict_fulfill {
            require!(
                caller == beneficiary || self.is_operator(caller),
                OtcError::FulfillRestricted
            );
        }
        Ok(())
    }

    pub fn native_price(&self, now: i64) -> Result<u64> {
        require!(self.native_usd_price_8d > 0, OtcError::NoPrice);
        require!(
            now.saturating_sub(self.native_price_updated_at) <= self.max_price_age_secs,
            OtcError::StalePrice
        );
        Ok(self.native_usd_price_8d)
    }

    pub fn open_offer_ids(&self) -> Vec<u64> {
        self.open_offers.iter().map(|e| e.id).collect()
    }

    /// Draw from the owner-deposited pool backing desk-level P2P offers.
    /// Consignment escrow shares the treasury but never enters this pool.
    pub fn draw_deposited(&mut self, amount: u64) -> Result<()> {
        self.token_deposited = self
            .token_deposited
            .checked_sub(amount)
            .ok_or(OtcError::InsufficientInventory)?;
        Ok(())
    }

    /// Return a cancelled or refunded P2P reservation to the pool.
    pub fn return_deposited(&mut self, amount: u64) -> Result<()> {
        self.token_deposited = self
            .token_deposited
            .checked_add(amount)
            .ok_or(OtcError::Overflow)?;
        Ok(())
    }

    /// Append a new offer id, compacting closed entries first when the index
    /// is at capacity. A full index of still-open offers is the per-desk cap
    /// on outstanding offers.
    pub fn push_open_offer(&mut self, id: u64, now: i64) -> Result<()> {
        if self.open_offers.len() >= OPEN_OFFER_CAPACITY {
            self.compact_open_offers(now, OPEN_OFFER_CAPACITY);
        }
        require!(
            self.open_offers.len() < OPEN_OFFER_CAPACITY,
            OtcError::OpenOfferIndexFull
        );
        self.open_offers.push(OpenOfferEntry {
            id,
            created_at: now,
            cancelled: false,
            fulfilled: false,
        });
        Ok(())
    }

    /// Mirror a terminal transition into the index so compaction never has to
    /// read other offer accounts.
    pub fn mark_open_offer(&mut self, id: u64, cancelled: bool, fulfilled: bool) {
        if let Some(entry) = self.open_offers.iter_mut().find(|e| e.id == id) {
            entry.cancelled |= cancelled;
            entry.fulfilled |= fulfilled;
        }
    }

    /// Swap-remove closed entries, scanning at most `max` slots. Moves the
    /// last element into each freed slot rather than leaving holes. Returns
    /// the number of removed entries; open entries are never dropped.
    pub fn compact_open_offers(&mut self, now: i64, max: usize) -> usize {
        let mut removed = 0;
        let mut i = 0;
        let mut scanned = 0;
        while i < self.open_offers.len() && scanned < max {
            scanned += 1;
            if self.open_offers[i].is_removable(now) {
                self.open_offers.swap_remove(i);
                removed += 1;
            } else {
                i += 1;
            }
        }
        removed
    }
}

/// One slot of the open-offer index. Flags are written by the same
/// transaction that closes the offer.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct OpenOfferEntry {
    pub id: u64,
    pub created_at: i64,
    pub cancelled: bool,
    pub fulfilled: bool,
}

impl OpenOfferEntry {
    pub const SERIALIZED_LEN: usize = 8 + 8 + 1 + 1;

    /// Fulfilled entries go immediately; cancelled ones only after the grace
    /// period so recent cancellations stay enumerable for indexers.
    pub fn is_removable(&self, now: i64) -> bool {
        self.fulfilled
            || (self.cancelled && now.saturating_sub(self.created_at) >= CLEANUP_GRACE_SECS)
    }
}

/// Per-token record binding a mint to its price state and reserved-inventory
/// counter. PDA `[b"registry", desk, mint]`.
#[account]
pub struct TokenRegistry {
    /// Owning desk; checked on every mutating call.
    pub desk: Pubkey,
    pub token_mint: Pubkey,
    pub decimals: u8,
    pub is_active: bool,

    pub price_feed_id: [u8; 32],
    pub usd_price_8d: u64,
    pub price_updated_at: i64,

    /// Admin override with its own TTL.
    pub manual_usd_price_8d: u64,
    pub manual_price_updated_at: i64,

    /// Inventory committed to live offers of this token.
    pub reserved_amount: u64,

    pub bump: u8,
}

impl TokenRegistry {
    pub const SPACE: usize = 8 + // discriminator
        32 + // desk
        32 + // token_mint
        1 + // decimals
        1 + // is_active
        32 + // price_feed_id
        8 + // usd_price_8d
        8 + // price_updated_at
        8 + // manual_usd_price_8d
        8 + // manual_price_updated_at
        8 + // reserved_amount
        1; // bump

    pub fn current_price(&self, now: i64, max_feed_age_secs: i64) -> Result<u64> {
        resolve_price(
            self.manual_usd_price_8d,
            self.manual_price_updated_at,
            self.usd_price_8d,
            self.price_updated_at,
            now,
            max_feed_age_secs,
        )
    }

    pub fn reserve(&mut self, amount: u64) -> Result<()> {
        self.reserved_amount = self
            .reserved_amount
            .checked_add(amount)
            .ok_or(OtcError::Overflow)?;
        Ok(())
    }

    pub fn release(&mut self, amount: u64) -> Result<()> {
        self.reserved_amount = self
            .reserved_amount
            .checked_sub(amount)
            .ok_or(OtcError::Overflow)?;
        Ok(())
    }
}

/// A seller's escrowed inventory listing with negotiable or fixed terms.
/// PDA `[b"consignment", desk, id]`.
#[account]
pub struct Consignment {
    pub desk: Pubkey,
    pub id: u64,
    pub token_mint: Pubkey,
    pub consigner: Pubkey,

    pub total_amount: u64,
    pub remaining_amount: u64,

    pub is_negotiable: bool,
    pub fixed_discount_bps: u16,
    pub fixed_lockup_days: u32,
    pub min_discount_bps: u16,
    pub max_discount_bps: u16,
    pub min_lockup_days: u32,
    pub max_lockup_days: u32,

    pub min_deal_amount: u64,
    pub max_deal_amount: u64,

    pub is_fractionalized: bool,
    pub is_private: bool,
    pub allowed_buyers: Vec<Pubkey>,

    pub max_price_volatility_bps: u16,
    pub max_time_to_execute_secs: i64,

    pub is_active: bool,
    pub created_at: i64,
    pub bump: u8,
}

impl Consignment {
    pub const SPACE: usize = 8 + // discriminator
        32 + // desk
        8 + // id
        32 + // token_mint
        32 + // consigner
        8 + // total_amount
        8 + // remaining_amount
        1 + // is_negotiable
        2 + // fixed_discount_bps
        4 + // fixed_lockup_days
        2 + // min_discount_bps
        2 + // max_discount_bps
        4 + // min_lockup_days
        4 + // max_lockup_days
        8 + // min_deal_amount
        8 + // max_deal_amount
        1 + // is_fractionalized
        1 + // is_private
        (4 + MAX_ALLOWED_BUYERS * 32) + // allowed_buyers
        2 + // max_price_volatility_bps
        8 + // max_time_to_execute_secs
        1 + // is_active
        8 + // created_at
        1; // bump

    pub fn allows_buyer(&self, who: &Pubkey) -> bool {
        !self.is_private || *who == self.consigner || self.allowed_buyers.contains(who)
    }

    /// Validate a proposed deal against this consignment's bounds, or against
    /// its fixed terms when non-negotiable.
    pub fn validate_offer_terms(
        &self,
        amount: u64,
        discount_bps: u16,
        lockup_secs: i64,
    ) -> Result<()> {
        require!(
            amount >= self.min_deal_amount && amount <= self.max_deal_amount,
            OtcError::AmountRange
        );
        require!(amount <= self.remaining_amount, OtcError::InsufficientInventory);
        require!(lockup_secs >= 0, OtcError::LockupOutOfRange);
        let lockup_days = lockup_secs / SECONDS_PER_DAY;
        if self.is_negotiable {
            require!(
                discount_bps >= self.min_discount_bps && discount_bps <= self.max_discount_bps,
                OtcError::Discount
            );
            require!(
                lockup_days >= self.min_lockup_days as i64
                    && lockup_days <= self.max_lockup_days as i64,
                OtcError::LockupOutOfRange
            );
        } else {
            require!(discount_bps == self.fixed_discount_bps, OtcError::FixedTermsRequired);
            require!(
                lockup_secs == self.fixed_lockup_days as i64 * SECONDS_PER_DAY,
                OtcError::FixedTermsRequired
            );
        }
        Ok(())
    }

    pub fn reserve(&mut self, amount: u64) -> Result<()> {
        self.remaining_amount = self
            .remaining_amount
            .checked_sub(amount)
            .ok_or(OtcError::Overflow)?;
        Ok(())
    }

    pub fn release(&mut self, amount: u64) -> Result<()> {
        let after = self
            .remaining_amount
            .checked_add(amount)
            .ok_or(OtcError::Overflow)?;
        require!(after <= self.total_amount, OtcError::Overflow);
        self.remaining_amount = after;
        Ok(())
    }
}

/// A buyer's negotiated instance drawn from a consignment (or from the desk's
/// default inventory when `consignment_id == 0`). PDA `[b"offer", desk, id]`.
#[account]
pub struct Offer {
    pub desk: Pubkey,
    pub id: u64,
    /// 0 for desk-level P2P offers.
    pub consignment_id: u64,
    pub token_mint: Pubkey,
    pub token_decimals: u8,
    pub beneficiary: Pubkey,

    pub token_amount: u64,
    pub discount_bps: u16,
    pub lockup_secs: i64,
    pub price_usd_per_token_8d: u64,
    pub native_usd_price_8d: u64,
    pub max_price_deviation_bps: u16,
    pub currency: Currency,

    /// Distinct approvers who have signed off.
    pub approvals: Vec<Pubkey>,
    pub approved: bool,
    /// Set at creation for non-negotiable consignments (P2P fast path).
    pub auto_approved: bool,

    pub paid: bool,
    pub fulfilled: bool,
    pub cancelled: bool,
    /// Terminal emergency-refund state: distinct from `cancelled` so a
    /// post-payment unwind stays auditable. `paid` remains true.
    pub refunded: bool,

    pub payer: Pubkey,
    pub amount_paid: u64,

    pub created_at: i64,
    pub unlock_time: i64,
    pub expires_at: i64,
    pub bump: u8,
}

impl Offer {
    pub const SPACE: usize = 8 + // discriminator
        32 + // desk
        8 + // id
        8 + // consignment_id
        32 + // token_mint
        1 + // token_decimals
        32 + // beneficiary
        8 + // token_amount
        2 + // discount_bps
        8 + // lockup_secs
        8 + // price_usd_per_token_8d
        8 + // native_usd_price_8d
        2 + // max_price_deviation_bps
        1 + // currency
        (4 + MAX_REQUIRED_APPROVALS as usize * 32) + // approvals
        1 + // approved
        1 + // auto_approved
        1 + // paid
        1 + // fulfilled
        1 + // cancelled
        1 + // refunded
        32 + // payer
        8 + // amount_paid
        8 + // created_at
        8 + // unlock_time
        8 + // expires_at
        1; // bump

    pub fn is_terminal(&self) -> bool {
        self.fulfilled || self.cancelled || self.refunded
    }

    pub fn is_payable(&self) -> bool {
        (self.approved || self.auto_approved) && !self.paid && !self.is_terminal()
    }

    /// Record one approver's sign-off. Idempotence per approver: a duplicate
    /// signature fails and leaves the count unchanged. Flips `approved` once
    /// distinct approvals reach the threshold.
    pub fn register_approval(&mut self, approver: Pubkey, required_approvals: u8) -> Result<bool> {
        require!(!self.paid && !self.is_terminal(), OtcError::BadState);
        // A met threshold is a state condition, not a duplicate signature.
        require!(!self.approved, OtcError::BadState);
        require!(!self.approvals.contains(&approver), OtcError::AlreadyApproved);
        self.approvals.push(approver);
        if self.approvals.len() >= required_approvals as usize {
            self.approved = true;
        }
        Ok(self.approved)
    }

    pub fn total_usd_8d(&self) -> Result<u64> {
        quote_usd_8d(
            self.token_amount,
            self.price_usd_per_token_8d,
            self.token_decimals,
            self.discount_bps,
        )
    }

    /// Required stablecoin payment in base units; rejects native offers.
    pub fn required_stable_amount(&self) -> Result<u64> {
        require!(self.currency == Currency::Stable, OtcError::NotStable);
        required_payment(Currency::Stable, self.total_usd_8d()?, 0)
    }

    /// Required native payment in lamports; rejects stablecoin offers.
    pub fn required_native_lamports(&self) -> Result<u64> {
        require!(self.currency == Currency::Native, OtcError::NotNative);
        required_payment(Currency::Native, self.total_usd_8d()?, self.native_usd_price_8d)
    }

    pub fn required_payment_amount(&self) -> Result<u64> {
        required_payment(self.currency, self.total_usd_8d()?, self.native_usd_price_8d)
    }
}
