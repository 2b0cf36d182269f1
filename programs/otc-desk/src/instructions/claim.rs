use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::errors::OtcError;
use crate::events::TokensClaimed;
use crate::state::{Desk, Offer, TokenRegistry};

/// Release escrowed tokens to the beneficiary once the lockup has matured.
/// Permissionless to call; the tokens only ever go to the beneficiary.
pub fn claim(ctx: Context<Claim>, _offer_id: u64) -> Result<()> {
    let desk = &mut ctx.accounts.desk;
    require!(!desk.paused, OtcError::Paused);

    let now = Clock::get()?.unix_timestamp;
    let offer = &mut ctx.accounts.offer;
    require!(offer.paid && !offer.is_terminal(), OtcError::BadState);
    require!(now >= offer.unlock_time, OtcError::Locked);

    let owner = desk.owner;
    let seeds: &[&[u8]] = &[DESK_SEED, owner.as_ref(), &[desk.bump]];
    let signer = &[seeds];
    let cpi_accounts = Transfer {
        from: ctx.accounts.desk_token_treasury.to_account_info(),
        to: ctx.accounts.beneficiary_token_ata.to_account_info(),
        authority: desk.to_account_info(),
    };
    let cpi_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        cpi_accounts,
        signer,
    );
    token::transfer(cpi_ctx, offer.token_amount)?;

    ctx.accounts.token_registry.release(offer.token_amount)?;
    offer.fulfilled = true;
    desk.mark_open_offer(offer.id, false, true);

    emit!(TokensClaimed {
        offer: offer.key(),
        beneficiary: offer.beneficiary,
        amount: offer.token_amount,
        timestamp: now,
    });
    Ok(())
}

#[derive(Accounts)]
pub struct Claim<'info> {
    #[account(
        mut,
        seeds = [DESK_SEED, desk.owner.as_ref()],
        bump = desk.bump
    )]
    pub desk: Account<'info, Desk>,

    #[account(
        mut,
        constraint = offer.desk == desk.key() @ OtcError::DeskMismatch
    )]
    pub offer: Account<'info, Offer>,

    #[account(
        mut,
        constraint = token_registry.desk == desk.key() @ OtcError::DeskMismatch,
        constraint = token_registry.token_mint == offer.token_mint @ OtcError::BadState
    )]
    pub token_registry: Account<'info, TokenRegistry>,

    #[account(
        mut,
        seeds = [TREASURY_SEED, desk.key().as_ref(), offer.token_mint.as_ref()],
        bump
    )]
    pub desk_token_treasury: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = beneficiary_token_ata.mint == offer.token_mint,
        constraint = beneficiary_token_ata.owner == offer.beneficiary
    )]
    pub beneficiary_token_ata: Account<'info, TokenAccount>,

    pub caller: Signer<'info>,

    pub token_program: Program<'info, Token>,
}
