use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::errors::OtcError;
use crate::events::ConsignmentCreated;
use crate::state::{Consignment, Desk, TokenRegistry};

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
    let desk = &mut ctx.accounts.desk;
    require!(!desk.paused, OtcError::Paused);
    require!(amount > 0, OtcError::AmountRange);
    require!(min_deal_amount <= max_deal_amount, OtcError::AmountRange);
    require!(min_discount_bps <= max_discount_bps, OtcError::Discount);
    require!(max_discount_bps as u64 <= BPS_DENOMINATOR, OtcError::Discount);
    require!(min_lockup_days <= max_lockup_days, OtcError::LockupOutOfRange);
    require!(allowed_buyers.len() <= MAX_ALLOWED_BUYERS, OtcError::TooManyAllowedBuyers);
    require!(ctx.accounts.token_registry.is_active, OtcError::BadState);
    require!(consignment_id == desk.next_consignment_id, OtcError::BadState);

    // Escrow the full listing into desk custody up front.
    let cpi_accounts = Transfer {
        from: ctx.accounts.consigner_token_ata.to_account_info(),
        to: ctx.accounts.desk_token_treasury.to_account_info(),
        authority: ctx.accounts.consigner.to_account_info(),
    };
    let cpi_ctx = CpiContext::new(ctx.accounts.token_program.to_account_info(), cpi_accounts);
    token::transfer(cpi_ctx, amount)?;

    desk.next_consignment_id = consignment_id.checked_add(1).ok_or(OtcError::Overflow)?;

    let clock = Clock::get()?;
    let consignment = &mut ctx.accounts.consignment;
    consignment.desk = desk.key();
    consignment.id = consignment_id;
    consignment.token_mint = ctx.accounts.token_mint.key();
    consignment.consigner = ctx.accounts.consigner.key();
    consignment.total_amount = amount;
    consignment.remaining_amount = amount;
    consignment.is_negotiable = is_negotiable;
    consignment.fixed_discount_bps = fixed_discount_bps;
    consignment.fixed_lockup_days = fixed_lockup_days;
    consignment.min_discount_bps = min_discount_bps;
    consignment.max_discount_bps = max_discount_bps;
    consignment.min_lockup_days = min_lockup_days;
    consignment.max_lockup_days = max_lockup_days;
    consignment.min_deal_amount = min_deal_amount;
    consignment.max_deal_amount = max_deal_amount;
    consignment.is_fractionalized = is_fractionalized;
    consignment.is_private = is_private;
    consignment.allowed_buyers = allowed_buyers;
    consignment.max_price_volatility_bps = max_price_volatility_bps;
    consignment.max_time_to_execute_secs = max_time_to_execute_secs;
    consignment.is_active = true;
    consignment.created_at = clock.unix_timestamp;
    consignment.bump = ctx.bumps.consignment;

    emit!(ConsignmentCreated {
        desk: consignment.desk,
        consignment: consignment.key(),
        consignment_id,
        consigner: consignment.consigner,
        token_mint: consignment.token_mint,
        amount,
        is_negotiable,
        timestamp: clock.unix_timestamp,
    });
    Ok(())
}

#[derive(Accounts)]
#[instruction(consignment_id: u64)]
pub struct CreateConsignment<'info> {
    #[account(
        mut,
        seeds = [DESK_SEED, desk.owner.as_ref()],
        bump = desk.bump
    )]
    pub desk: Account<'info, Desk>,

    #[account(mut)]
    pub consigner: Signer<'info>,

    pub token_mint: Account<'info, Mint>,

    #[account(
        constraint = token_registry.desk == desk.key() @ OtcError::DeskMismatch,
        constraint = token_registry.token_mint == token_mint.key() @ OtcError::BadState
    )]
    pub token_registry: Account<'info, TokenRegistry>,

    #[account(
        mut,
        constraint = consigner_token_ata.mint == token_mint.key(),
        constraint = consigner_token_ata.owner == consigner.key()
    )]
    pub consigner_token_ata: Account<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [TREASURY_SEED, desk.key().as_ref(), token_mint.key().as_ref()],
        bump
    )]
    pub desk_token_treasury: Account<'info, TokenAccount>,

    #[account(
        init,
        payer = consigner,
        space = Consignment::SPACE,
        seeds = [CONSIGNMENT_SEED, desk.key().as_ref(), consignment_id.to_le_bytes().as_ref()],
        bump
    )]
    pub consignment: Account<'info, Consignment>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}
