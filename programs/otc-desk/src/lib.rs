pub mod constants;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod state;
pub mod utils;

#[cfg(test)]
mod tests;

use anchor_lang::prelude::*;

use crate::state::Currency;
pub use instructions::*;

declare_id!("8X2wDShtcJ5mFrcsJPjK8tQCD16zBqzsUGwhSCM4ggko");

#[program]
pub mod otc_desk {
    use super::*;

    // ---- Desk lifecycle & admin ----

    pub fn init_desk(
        ctx: Context<InitDesk>,
        min_usd_amount_8d: u64,
        quote_expiry_secs: i64,
    ) -> Result<()> {
        instructions::init_desk::init_desk(ctx, min_usd_amount_8d, quote_expiry_secs)
    }

    pub fn set_agent(ctx: Context<OnlyOwnerDesk>, new_agent: Pubkey) -> Result<()> {
        instructions::admin::set_agent(ctx, new_agent)
    }

    pub fn set_approver(ctx: Context<OnlyOwnerDesk>, who: Pubkey, allowed: bool) -> Result<()> {
        instructions::admin::set_approver(ctx, who, allowed)
    }

    pub fn set_required_approvals(ctx: Context<OnlyOwnerDesk>, required: u8) -> Result<()> {
        instructions::admin::set_required_approvals(ctx, required)
    }

    pub fn set_limits(
        ctx: Context<OnlyOwnerDesk>,
        min_usd_amount_8d: u64,
        max_token_per_order: u64,
        max_discount_bps: u16,
        quote_expiry_secs: i64,
        max_lockup_secs: i64,
    ) -> Result<()> {
        instructions::admin::set_limits(
            ctx,
            min_usd_amount_8d,
            max_token_per_order,
            max_discount_bps,
            quote_expiry_secs,
            max_lockup_secs,
        )
    }

    pub fn set_feeds(ctx: Context<OnlyOwnerDesk>, native_feed_id: [u8; 32]) -> Result<()> {
        instructions::admin::set_feeds(ctx, native_feed_id)
    }

    pub fn set_max_feed_age(ctx: Context<OnlyOwnerDesk>, max_age_secs: i64) -> Result<()> {
        instructions::admin::set_max_feed_age(ctx, max_age_secs)
    }

    pub fn set_restrict_fulfill(ctx: Context<OnlyOwnerDesk>, enabled: bool) -> Result<()> {
        instructions::admin::set_restrict_fulfill(ctx, enabled)
    }

    pub fn set_require_approver_to_fulfill(
        ctx: Context<OnlyOwnerDesk>,
        enabled: bool,
    ) -> Result<()> {
        instructions::admin::set_require_approver_to_fulfill(ctx, enabled)
    }

    pub fn set_emergency_refund(
        ctx: Context<OnlyOwnerDesk>,
        enabled: bool,
        deadline_secs: i64,
    ) -> Result<()> {
        instructions::admin::set_emergency_refund(ctx, enabled, deadline_secs)
    }

    pub fn set_manual_native_price(ctx: Context<OnlyOwnerDesk>, native_usd_8d: u64) -> Result<()> {
        instructions::admin::set_manual_native_price(ctx, native_usd_8d)
    }

    pub fn pause(ctx: Context<OnlyOwnerDesk>) -> Result<()> {
        instructions::admin::pause(ctx)
    }

    pub fn unpause(ctx: Context<OnlyOwnerDesk>) -> Result<()> {
        instructions::admin::unpause(ctx)
    }

    // ---- Token registry & prices ----

    pub fn register_token(ctx: Context<RegisterToken>, price_feed_id: [u8; 32]) -> Result<()> {
        instructions::register_token::register_token(ctx, price_feed_id)
    }

    pub fn set_token_active(ctx: Context<MutateRegistry>, is_active: bool) -> Result<()> {
        instructions::register_token::set_token_active(ctx, is_active)
    }

    pub fn set_token_feed(ctx: Context<MutateRegistry>, price_feed_id: [u8; 32]) -> Result<()> {
        instructions::register_token::set_token_feed(ctx, price_feed_id)
    }

    pub fn set_token_manual_price(ctx: Context<SetTokenManualPrice>, usd_8d: u64) -> Result<()> {
        instructions::update_prices::set_token_manual_price(ctx, usd_8d)
    }

    pub fn update_token_price_from_feed(
        ctx: Context<UpdateTokenPriceFromFeed>,
        max_price_deviation_bps: u16,
    ) -> Result<()> {
        instructions::update_prices::update_token_price_from_feed(ctx, max_price_deviation_bps)
    }

    pub fn update_native_price_from_feed(
        ctx: Context<UpdateNativePriceFromFeed>,
        max_price_deviation_bps: u16,
    ) -> Result<()> {
        instructions::update_prices::update_native_price_from_feed(ctx, max_price_deviation_bps)
    }

    // ---- Treasury ----

    pub fn deposit_tokens(ctx: Context<DepositTokens>, amount: u64) -> Result<()> {
        instructions::treasury::deposit_tokens(ctx, amount)
    }

    pub fn withdraw_tokens(ctx: Context<WithdrawTokens>, amount: u64) -> Result<()> {
        instructions::treasury::withdraw_tokens(ctx, amount)
    }

    pub fn withdraw_stable(ctx: Context<WithdrawStable>, amount: u64) -> Result<()> {
        instructions::treasury::withdraw_stable(ctx, amount)
    }

    pub fn withdraw_native(ctx: Context<WithdrawNative>, lamports: u64) -> Result<()> {
        instructions::treasury::withdraw_native(ctx, lamports)
    }

    // ---- Consignments ----

    #[allow(clippy::too_many_arguments)]
    pub fn create_consignment(
        ctx: Context<CreateConsignment>,
        consignment_id: u64,
        amount: u64,
        is_negotiable: bool,
        fixed_discount_bps: u16,
        fixed_lockup_days: u32,
        min_discount_bps: u16,
        max_discount_bps: u16,
        min_lockup_days: u32,
        max_lockup_days: u32,
        min_deal_amount: u64,
        max_deal_amount: u64,
        is_fractionalized: bool,
        is_private: bool,
        allowed_buyers: Vec<Pubkey>,
        max_price_volatility_bps: u16,
        max_time_to_execute_secs: i64,
    ) -> Result<()> {
        instructions::create_consignment::create_consignment(
            ctx,
            consignment_id,
            amount,
            is_negotiable,
            fixed_discount_bps,
            fixed_lockup_days,
            min_discount_bps,
            max_discount_bps,
            min_lockup_days,
            max_lockup_days,
            min_deal_amount,
            max_deal_amount,
            is_fractionalized,
            is_private,
            allowed_buyers,
            max_price_volatility_bps,
            max_time_to_execute_secs,
        )
    }

    pub fn withdraw_consignment(
        ctx: Context<WithdrawConsignment>,
        consignment_id: u64,
    ) -> Result<()> {
        instructions::withdraw_consignment::withdraw_consignment(ctx, consignment_id)
    }

    // ---- Offers ----

    pub fn create_offer_from_consignment(
        ctx: Context<CreateOfferFromConsignment>,
        offer_id: u64,
        token_amount: u64,
        discount_bps: u16,
        currency: Currency,
        lockup_secs: i64,
    ) -> Result<()> {
        instructions::create_offer::create_offer_from_consignment(
            ctx,
            offer_id,
            token_amount,
            discount_bps,
            currency,
            lockup_secs,
        )
    }

    pub fn create_offer(
        ctx: Context<CreateOffer>,
        offer_id: u64,
        token_amount: u64,
        discount_bps: u16,
        currency: Currency,
        lockup_secs: i64,
    ) -> Result<()> {
        instructions::create_offer::create_offer(
            ctx,
            offer_id,
            token_amount,
            discount_bps,
            currency,
            lockup_secs,
        )
    }

    pub fn approve_offer(ctx: Context<ApproveOffer>, offer_id: u64) -> Result<()> {
        instructions::approve_offer::approve_offer(ctx, offer_id)
    }

    pub fn cancel_offer(ctx: Context<CancelOffer>, offer_id: u64) -> Result<()> {
        instructions::cancel_offer::cancel_offer(ctx, offer_id)
    }

    pub fn fulfill_offer_stable(ctx: Context<FulfillOfferStable>, offer_id: u64) -> Result<()> {
        instructions::fulfill_offer::fulfill_offer_stable(ctx, offer_id)
    }

    pub fn fulfill_offer_native(
        ctx: Context<FulfillOfferNative>,
        offer_id: u64,
        value: u64,
    ) -> Result<()> {
        instructions::fulfill_offer::fulfill_offer_native(ctx, offer_id, value)
    }

    pub fn claim(ctx: Context<Claim>, offer_id: u64) -> Result<()> {
        instructions::claim::claim(ctx, offer_id)
    }

    pub fn auto_claim<'info>(
        ctx: Context<'_, '_, 'info, 'info, AutoClaim<'info>>,
        offer_ids: Vec<u64>,
    ) -> Result<()> {
        instructions::auto_claim::auto_claim(ctx, offer_ids)
    }

    // ---- Emergency recovery & housekeeping ----

    pub fn emergency_refund_stable(
        ctx: Context<EmergencyRefundStable>,
        offer_id: u64,
    ) -> Result<()> {
        instructions::emergency::emergency_refund_stable(ctx, offer_id)
    }

    pub fn emergency_refund_native(
        ctx: Context<EmergencyRefundNative>,
        offer_id: u64,
    ) -> Result<()> {
        instructions::emergency::emergency_refund_native(ctx, offer_id)
    }

    pub fn admin_emergency_withdraw(
        ctx: Context<AdminEmergencyWithdraw>,
        offer_id: u64,
    ) -> Result<()> {
        instructions::emergency::admin_emergency_withdraw(ctx, offer_id)
    }

    pub fn cleanup_expired_offers(
        ctx: Context<CleanupExpiredOffers>,
        max_to_process: u8,
    ) -> Result<()> {
        instructions::cleanup::cleanup_expired_offers(ctx, max_to_process)
    }
}
