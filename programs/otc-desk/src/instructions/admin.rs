use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::OtcError;
use crate::events::*;
use crate::state::Desk;
use crate::utils::validate_native_price_bounds;

/// Owner-gated setters. Each one is validate-then-replace on the desk
/// aggregate; nothing here touches escrowed funds.

pub fn set_agent(ctx: Context<OnlyOwnerDesk>, new_agent: Pubkey) -> Result<()> {
    ctx.accounts.desk.agent = new_agent;
    Ok(())
}

pub fn set_approver(ctx: Context<OnlyOwnerDesk>, who: Pubkey, allowed: bool) -> Result<()> {
    let desk = &mut ctx.accounts.desk;
    if allowed {
        if !desk.approvers.contains(&who) {
            require!(desk.approvers.len() < MAX_APPROVERS, OtcError::TooManyApprovers);
            desk.approvers.push(who);
        }
    } else if let Some(i) = desk.approvers.iter().position(|x| *x == who) {
        desk.approvers.remove(i);
        require!(
            desk.approvers.len() >= desk.required_approvals as usize,
            OtcError::TooFewApprovers
        );
    }
    emit!(ApproverUpdated { desk: desk.key(), approver: who, allowed });
    Ok(())
}

pub fn set_required_approvals(ctx: Context<OnlyOwnerDesk>, required: u8) -> Result<()> {
    let desk = &mut ctx.accounts.desk;
    require!(
        required >= 1 && required <= MAX_REQUIRED_APPROVALS,
        OtcError::AmountRange
    );
    require!(
        desk.approvers.len() >= required as usize,
        OtcError::TooFewApprovers
    );
    desk.required_approvals = required;
    emit!(RequiredApprovalsUpdated { desk: desk.key(), required_approvals: required });
    Ok(())
}

pub fn set_limits(
    ctx: Context<OnlyOwnerDesk>,
    min_usd_amount_8d: u64,
    max_token_per_order: u64,
    max_discount_bps: u16,
    quote_expiry_secs: i64,
    max_lockup_secs: i64,
) -> Result<()> {
    require!(min_usd_amount_8d > 0, OtcError::AmountRange);
    require!(max_token_per_order > 0, OtcError::AmountRange);
    require!(max_discount_bps as u64 <= BPS_DENOMINATOR, OtcError::Discount);
    require!(quote_expiry_secs >= MIN_QUOTE_EXPIRY_SECS, OtcError::QuoteExpiryTooShort);
    require!(max_lockup_secs >= 0, OtcError::LockupOutOfRange);

    let desk = &mut ctx.accounts.desk;
    desk.min_usd_amount_8d = min_usd_amount_8d;
    desk.max_token_per_order = max_token_per_order;
    desk.max_discount_bps = max_discount_bps;
    desk.quote_expiry_secs = quote_expiry_secs;
    desk.max_lockup_secs = max_lockup_secs;
    emit!(LimitsUpdated {
        min_usd_amount_8d,
        max_token_per_order,
        max_discount_bps,
        quote_expiry_secs,
        max_lockup_secs,
    });
    Ok(())
}

pub fn set_feeds(ctx: Context<OnlyOwnerDesk>, native_feed_id: [u8; 32]) -> Result<()> {
    let desk = &mut ctx.accounts.desk;
    desk.native_price_feed_id = native_feed_id;
    emit!(FeedsUpdated { desk: desk.key(), token_mint: None, feed_id: native_feed_id });
    Ok(())
}

pub fn set_max_feed_age(ctx: Context<OnlyOwnerDesk>, max_age_secs: i64) -> Result<()> {
    require!(max_age_secs > 0, OtcError::AmountRange);
    ctx.accounts.desk.max_price_age_secs = max_age_secs;
    Ok(())
}

pub fn set_restrict_fulfill(ctx: Context<OnlyOwnerDesk>, enabled: bool) -> Result<()> {
    let desk = &mut ctx.accounts.desk;
    desk.restrict_fulfill = enabled;
    emit!(RestrictFulfillUpdated {
        restrict_fulfill: desk.restrict_fulfill,
        require_approver_to_fulfill: desk.require_approver_to_fulfill,
    });
    Ok(())
}

pub fn set_require_approver_to_fulfill(ctx: Context<OnlyOwnerDesk>, enabled: bool) -> Result<()> {
    let desk = &mut ctx.accounts.desk;
    desk.require_approver_to_fulfill = enabled;
    emit!(RestrictFulfillUpdated {
        restrict_fulfill: desk.restrict_fulfill,
        require_approver_to_fulfill: desk.require_approver_to_fulfill,
    });
    Ok(())
}

pub fn set_emergency_refund(
    ctx: Context<OnlyOwnerDesk>,
    enabled: bool,
    deadline_secs: i64,
) -> Result<()> {
    require!(deadline_secs >= 0, OtcError::AmountRange);
    let desk = &mut ctx.accounts.desk;
    desk.emergency_refund_enabled = enabled;
    desk.emergency_refund_deadline_secs = deadline_secs;
    emit!(EmergencyRefundConfigUpdated { enabled, deadline_secs });
    Ok(())
}

/// Manual native-currency price; its freshness is governed by the same feed
/// age the oracle path uses.
pub fn set_manual_native_price(ctx: Context<OnlyOwnerDesk>, native_usd_8d: u64) -> Result<()> {
    validate_native_price_bounds(native_usd_8d)?;
    let now = Clock::get()?.unix_timestamp;
    let desk = &mut ctx.accounts.desk;
    desk.native_usd_price_8d = native_usd_8d;
    desk.native_price_updated_at = now;
    emit!(PricesUpdated {
        desk: desk.key(),
        token_mint: None,
        usd_price_8d: native_usd_8d,
        updated_at: now,
        manual: true,
    });
    Ok(())
}

pub fn pause(ctx: Context<OnlyOwnerDesk>) -> Result<()> {
    ctx.accounts.desk.paused = true;
    emit!(Paused { paused: true });
    Ok(())
}

pub fn unpause(ctx: Context<OnlyOwnerDesk>) -> Result<()> {
    ctx.accounts.desk.paused = false;
    emit!(Paused { paused: false });
    Ok(())
}

#[derive(Accounts)]
pub struct OnlyOwnerDesk<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        has_one = owner @ OtcError::NotOwner,
        seeds = [DESK_SEED, owner.key().as_ref()],
        bump = desk.bump
    )]
    pub desk: Account<'info, Desk>,
}
