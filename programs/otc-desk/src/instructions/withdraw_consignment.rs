use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::errors::OtcError;
use crate::events::ConsignmentWithdrawn;
use crate::state::{Consignment, Desk};

/// Return the unreserved remainder to the consigner and deactivate the
/// listing. A second withdrawal fails on the active check.
pub fn withdraw_consignment(ctx: Context<WithdrawConsignment>, _consignment_id: u64) -> Result<()> {
    let desk = &ctx.accounts.desk;
    require!(!desk.paused, OtcError::Paused);

    let consignment = &mut ctx.accounts.consignment;
    require!(
        consignment.consigner == ctx.accounts.consigner.key(),
        OtcError::NotConsigner
    );
    require!(consignment.is_active, OtcError::BadState);
    let withdraw_amount = consignment.remaining_amount;
    require!(withdraw_amount > 0, OtcError::AmountRange);

    consignment.is_active = false;
    consignment.remaining_amount = 0;

    let owner = desk.owner;
    let seeds: &[&[u8]] = &[DESK_SEED, owner.as_ref(), &[desk.bump]];
    let signer = &[seeds];
    let cpi_accounts = Transfer {
        from: ctx.accounts.desk_token_treasury.to_account_info(),
        to: ctx.accounts.consigner_token_ata.to_account_info(),
        authority: ctx.accounts.desk.to_account_info(),
    };
    let cpi_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        cpi_accounts,
        signer,
    );
    token::transfer(cpi_ctx, withdraw_amount)?;

    emit!(ConsignmentWithdrawn {
        desk: desk.key(),
        consignment: ctx.accounts.consignment.key(),
        consigner: ctx.accounts.consigner.key(),
        amount: withdraw_amount,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}

#[derive(Accounts)]
pub struct WithdrawConsignment<'info> {
    #[account(
        seeds = [DESK_SEED, desk.owner.as_ref()],
        bump = desk.bump
    )]
    pub desk: Account<'info, Desk>,

    #[account(
        mut,
        constraint = consignment.desk == desk.key() @ OtcError::DeskMismatch
    )]
    pub consignment: Account<'info, Consignment>,

    #[account(mut)]
    pub consigner: Signer<'info>,

    #[account(
        mut,
        seeds = [TREASURY_SEED, desk.key().as_ref(), consignment.token_mint.as_ref()],
        bump
    )]
    pub desk_token_treasury: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = consigner_token_ata.mint == consignment.token_mint,
        constraint = consigner_token_ata.owner == consigner.key()
    )]
    pub consigner_token_ata: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}
