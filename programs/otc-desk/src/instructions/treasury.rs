use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::errors::OtcError;
use crate::state::{Desk, TokenRegistry};

/// Owner funding of the desk's default-token inventory, backing desk-level
/// P2P offers.
pub fn deposit_tokens(ctx: Context<DepositTokens>, amount: u64) -> Result<()> {
    require!(!ctx.accounts.desk.paused, OtcError::Paused);
    require!(amount > 0, OtcError::AmountRange);

    let cpi_accounts = Transfer {
        from: ctx.accounts.owner_token_ata.to_account_info(),
        to: ctx.accounts.desk_token_treasury.to_account_info(),
        authority: ctx.accounts.owner.to_account_info(),
    };
    let cpi_ctx = CpiContext::new(ctx.accounts.token_program.to_account_info(), cpi_accounts);
    token::transfer(cpi_ctx, amount)?;

    let desk = &mut ctx.accounts.desk;
    desk.token_deposited = desk
        .token_deposited
        .checked_add(amount)
        .ok_or(OtcError::Overflow)?;
    Ok(())
}

/// Withdraw from the owner-deposited pool. Never digs into amounts committed
/// to live offers or escrowed by consigners in the same treasury.
pub fn withdraw_tokens(ctx: Context<WithdrawTokens>, amount: u64) -> Result<()> {
    let desk = &mut ctx.accounts.desk;
    desk.draw_deposited(amount)?;
    let after = ctx
        .accounts
        .desk_token_treasury
        .amount
        .checked_sub(amount)
        .ok_or(OtcError::Overflow)?;
    require!(
        after >= ctx.accounts.token_registry.reserved_amount,
        OtcError::InsufficientInventory
    );

    let owner = desk.owner;
    let seeds: &[&[u8]] = &[DESK_SEED, owner.as_ref(), &[desk.bump]];
    let signer = &[seeds];
    let cpi_accounts = Transfer {
        from: ctx.accounts.desk_token_treasury.to_account_info(),
        to: ctx.accounts.owner_token_ata.to_account_info(),
        authority: desk.to_account_info(),
    };
    let cpi_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        cpi_accounts,
        signer,
    );
    token::transfer(cpi_ctx, amount)
}

/// Sweep collected stablecoin payments.
pub fn withdraw_stable(ctx: Context<WithdrawStable>, amount: u64) -> Result<()> {
    let desk = &ctx.accounts.desk;
    let owner = desk.owner;
    let seeds: &[&[u8]] = &[DESK_SEED, owner.as_ref(), &[desk.bump]];
    let signer = &[seeds];
    let cpi_accounts = Transfer {
        from: ctx.accounts.desk_stable_treasury.to_account_info(),
        to: ctx.accounts.to_stable_ata.to_account_info(),
        authority: desk.to_account_info(),
    };
    let cpi_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        cpi_accounts,
        signer,
    );
    token::transfer(cpi_ctx, amount)
}

/// Sweep collected native payments, keeping the desk rent-exempt.
pub fn withdraw_native(ctx: Context<WithdrawNative>, lamports: u64) -> Result<()> {
    let desk_info = ctx.accounts.desk.to_account_info();
    let rent = Rent::get()?;
    let min_rent = rent.minimum_balance(Desk::SPACE);
    let after = desk_info
        .lamports()
        .checked_sub(lamports)
        .ok_or(OtcError::Overflow)?;
    require!(after >= min_rent, OtcError::BadState);

    **desk_info.try_borrow_mut_lamports()? -= lamports;
    **ctx.accounts.to.to_account_info().try_borrow_mut_lamports()? += lamports;
    Ok(())
}

#[derive(Accounts)]
pub struct DepositTokens<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        mut,
        has_one = owner @ OtcError::NotOwner,
        seeds = [DESK_SEED, owner.key().as_ref()],
        bump = desk.bump
    )]
    pub desk: Account<'info, Desk>,

    #[account(
        mut,
        constraint = owner_token_ata.mint == desk.token_mint,
        constraint = owner_token_ata.owner == owner.key()
    )]
    pub owner_token_ata: Account<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [TREASURY_SEED, desk.key().as_ref(), desk.token_mint.as_ref()],
        bump
    )]
    pub desk_token_treasury: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct WithdrawTokens<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        has_one = owner @ OtcError::NotOwner,
        seeds = [DESK_SEED, owner.key().as_ref()],
        bump = desk.bump
    )]
    pub desk: Account<'info, Desk>,

    #[account(
        constraint = token_registry.desk == desk.key() @ OtcError::DeskMismatch,
        constraint = token_registry.token_mint == desk.token_mint @ OtcError::BadState
    )]
    pub token_registry: Account<'info, TokenRegistry>,

    #[account(
        mut,
        seeds = [TREASURY_SEED, desk.key().as_ref(), desk.token_mint.as_ref()],
        bump
    )]
    pub desk_token_treasury: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = owner_token_ata.mint == desk.token_mint,
        constraint = owner_token_ata.owner == owner.key()
    )]
    pub owner_token_ata: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct WithdrawStable<'info> {
    pub owner: Signer<'info>,

    #[account(
        has_one = owner @ OtcError::NotOwner,
        seeds = [DESK_SEED, owner.key().as_ref()],
        bump = desk.bump
    )]
    pub desk: Account<'info, Desk>,

    #[account(
        mut,
        seeds = [STABLE_TREASURY_SEED, desk.key().as_ref()],
        bump
    )]
    pub desk_stable_treasury: Account<'info, TokenAccount>,

    #[account(mut, constraint = to_stable_ata.mint == desk.stable_mint)]
    pub to_stable_ata: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct WithdrawNative<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        has_one = owner @ OtcError::NotOwner,
        seeds = [DESK_SEED, owner.key().as_ref()],
        bump = desk.bump
    )]
    pub desk: Account<'info, Desk>,

    /// CHECK: destination chosen by the owner
    #[account(mut)]
    pub to: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}
