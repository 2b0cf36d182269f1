use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::errors::OtcError;
use crate::events::{FeedsUpdated, TokenRegistered};
use crate::state::{Desk, TokenRegistry};

/// Register a token with the desk: binds the mint to its oracle feed and
/// creates the escrow treasury for it. Once per token per desk (the PDA
/// enforces uniqueness).
pub fn register_token(ctx: Context<RegisterToken>, price_feed_id: [u8; 32]) -> Result<()> {
    let registry = &mut ctx.accounts.token_registry;
    registry.desk = ctx.accounts.desk.key();
    registry.token_mint = ctx.accounts.token_mint.key();
    registry.decimals = ctx.accounts.token_mint.decimals;
    registry.is_active = true;
    registry.price_feed_id = price_feed_id;
    registry.usd_price_8d = 0;
    registry.price_updated_at = 0;
    registry.manual_usd_price_8d = 0;
    registry.manual_price_updated_at = 0;
    registry.reserved_amount = 0;
    registry.bump = ctx.bumps.token_registry;

    emit!(TokenRegistered {
        desk: registry.desk,
        registry: registry.key(),
        token_mint: registry.token_mint,
        decimals: registry.decimals,
        price_feed_id,
    });
    Ok(())
}

pub fn set_token_active(ctx: Context<MutateRegistry>, is_active: bool) -> Result<()> {
    ctx.accounts.token_registry.is_active = is_active;
    Ok(())
}

pub fn set_token_feed(ctx: Context<MutateRegistry>, price_feed_id: [u8; 32]) -> Result<()> {
    let registry = &mut ctx.accounts.token_registry;
    registry.price_feed_id = price_feed_id;
    emit!(FeedsUpdated {
        desk: registry.desk,
        token_mint: Some(registry.token_mint),
        feed_id: price_feed_id,
    });
    Ok(())
}

#[derive(Accounts)]
pub struct RegisterToken<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        has_one = owner @ OtcError::NotOwner,
        seeds = [DESK_SEED, owner.key().as_ref()],
        bump = desk.bump
    )]
    pub desk: Account<'info, Desk>,

    pub token_mint: Account<'info, Mint>,

    #[account(
        init,
        payer = owner,
        space = TokenRegistry::SPACE,
        seeds = [REGISTRY_SEED, desk.key().as_ref(), token_mint.key().as_ref()],
        bump
    )]
    pub token_registry: Account<'info, TokenRegistry>,

    #[account(
        init,
        payer = owner,
        token::mint = token_mint,
        token::authority = desk,
        seeds = [TREASURY_SEED, desk.key().as_ref(), token_mint.key().as_ref()],
        bump
    )]
    pub desk_token_treasury: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct MutateRegistry<'info> {
    pub owner: Signer<'info>,

    #[account(
        has_one = owner @ OtcError::NotOwner,
        seeds = [DESK_SEED, owner.key().as_ref()],
        bump = desk.bump
    )]
    pub desk: Account<'info, Desk>,

    #[account(
        mut,
        constraint = token_registry.desk == desk.key() @ OtcError::DeskMismatch
    )]
    pub token_registry: Account<'info, TokenRegistry>,
}
