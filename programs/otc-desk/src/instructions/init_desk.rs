use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::errors::OtcError;
use crate::events::DeskInitialized;
use crate::state::Desk;

/// Create the desk: the configuration aggregate and custody root every other
/// operation validates against.
pub fn init_desk(
    ctx: Context<InitDesk>,
    min_usd_amount_8d: u64,
    quote_expiry_secs: i64,
) -> Result<()> {
    require!(
        ctx.accounts.stable_mint.decimals == STABLE_DECIMALS,
        OtcError::StableDecimals
    );
    require!(quote_expiry_secs >= MIN_QUOTE_EXPIRY_SECS, OtcError::QuoteExpiryTooShort);

    let clock = Clock::get()?;
    let desk = &mut ctx.accounts.desk;
    desk.owner = ctx.accounts.owner.key();
    desk.agent = ctx.accounts.agent.key();
    desk.stable_mint = ctx.accounts.stable_mint.key();
    desk.stable_decimals = ctx.accounts.stable_mint.decimals;
    desk.token_mint = ctx.accounts.token_mint.key();
    desk.token_decimals = ctx.accounts.token_mint.decimals;
    desk.token_deposited = 0;
    desk.min_usd_amount_8d = min_usd_amount_8d;
    desk.max_token_per_order = 10_000 * 10u64.pow(desk.token_decimals as u32);
    desk.max_discount_bps = 5_000;
    desk.quote_expiry_secs = quote_expiry_secs;
    desk.max_lockup_secs = 365 * SECONDS_PER_DAY;
    desk.restrict_fulfill = false;
    desk.require_approver_to_fulfill = false;
    desk.emergency_refund_enabled = false;
    desk.emergency_refund_deadline_secs = 30 * SECONDS_PER_DAY;
    desk.approvers = Vec::new();
    desk.required_approvals = 1;
    desk.paused = false;
    desk.native_price_feed_id = [0u8; 32];
    desk.native_usd_price_8d = 0;
    desk.native_price_updated_at = 0;
    desk.max_price_age_secs = 3_600;
    desk.next_consignment_id = 1;
    desk.next_offer_id = 1;
    desk.open_offers = Vec::new();
    desk.bump = ctx.bumps.desk;

    emit!(DeskInitialized {
        desk: desk.key(),
        owner: desk.owner,
        agent: desk.agent,
        stable_mint: desk.stable_mint,
        token_mint: desk.token_mint,
        timestamp: clock.unix_timestamp,
    });
    Ok(())
}

#[derive(Accounts)]
pub struct InitDesk<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    pub owner: Signer<'info>,

    /// CHECK: operational agent; any address the owner designates
    pub agent: UncheckedAccount<'info>,

    pub stable_mint: Account<'info, Mint>,

    /// Default token for desk-level P2P offers.
    pub token_mint: Account<'info, Mint>,

    #[account(
        init,
        payer = payer,
        space = Desk::SPACE,
        seeds = [DESK_SEED, owner.key().as_ref()],
        bump
    )]
    pub desk: Account<'info, Desk>,

    #[account(
        init,
        payer = payer,
        token::mint = stable_mint,
        token::authority = desk,
        seeds = [STABLE_TREASURY_SEED, desk.key().as_ref()],
        bump
    )]
    pub stable_treasury: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}
