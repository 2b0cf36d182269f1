use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::errors::OtcError;
use crate::events::OfferPaid;
use crate::state::{Currency, Desk, Offer};
use crate::utils::overpayment_refund;

/// Shared settlement gate for both payment paths.
pub(crate) fn validate_fulfill(desk: &Desk, offer: &Offer, caller: &Pubkey, now: i64) -> Result<()> {
    require!(!desk.paused, OtcError::Paused);
    require!(!offer.paid && !offer.is_terminal(), OtcError::BadState);
    require!(offer.approved || offer.auto_approved, OtcError::NotApproved);
    require!(now <= offer.expires_at, OtcError::Expired);
    desk.check_fulfill_allowed(caller, &offer.beneficiary)
}

/// Collect a stablecoin payment. Pulls exactly the ceiling-rounded amount so
/// the desk is never under-paid by rounding.
pub fn fulfill_offer_stable(ctx: Context<FulfillOfferStable>, _offer_id: u64) -> Result<()> {
    let desk = &ctx.accounts.desk;
    let offer = &mut ctx.accounts.offer;
    let payer = ctx.accounts.payer.key();
    let now = Clock::get()?.unix_timestamp;

    validate_fulfill(desk, offer, &payer, now)?;
    let required = offer.required_stable_amount()?;

    let cpi_accounts = Transfer {
        from: ctx.accounts.payer_stable_ata.to_account_info(),
        to: ctx.accounts.desk_stable_treasury.to_account_info(),
        authority: ctx.accounts.payer.to_account_info(),
    };
    let cpi_ctx = CpiContext::new(ctx.accounts.token_program.to_account_info(), cpi_accounts);
    token::transfer(cpi_ctx, required)?;

    offer.paid = true;
    offer.payer = payer;
    offer.amount_paid = required;

    emit!(OfferPaid {
        offer: offer.key(),
        payer,
        amount_paid: required,
        refunded_excess: 0,
        currency: Currency::Stable,
    });
    Ok(())
}

/// Collect a native-currency payment of `value` lamports. Anything above the
/// required amount is returned to the payer in the same transaction;
/// `amount_paid` records the required amount, never the raw value sent.
pub fn fulfill_offer_native(
    ctx: Context<FulfillOfferNative>,
    _offer_id: u64,
    value: u64,
) -> Result<()> {
    let desk_info = ctx.accounts.desk.to_account_info();
    let desk = &ctx.accounts.desk;
    let offer = &mut ctx.accounts.offer;
    let payer = ctx.accounts.payer.key();
    let now = Clock::get()?.unix_timestamp;

    validate_fulfill(desk, offer, &payer, now)?;
    let required = offer.required_native_lamports()?;
    let refund = overpayment_refund(value, required)?;

    let ix = anchor_lang::solana_program::system_instruction::transfer(
        &payer,
        &desk_info.key(),
        value,
    );
    anchor_lang::solana_program::program::invoke(
        &ix,
        &[
            ctx.accounts.payer.to_account_info(),
            desk_info.clone(),
            ctx.accounts.system_program.to_account_info(),
        ],
    )?;

    if refund > 0 {
        // Desk is program-owned, so the excess moves back by direct lamport
        // arithmetic rather than a system transfer.
        **desk_info.try_borrow_mut_lamports()? -= refund;
        **ctx.accounts.payer.to_account_info().try_borrow_mut_lamports()? += refund;
    }

    offer.paid = true;
    offer.payer = payer;
    offer.amount_paid = required;

    emit!(OfferPaid {
        offer: offer.key(),
        payer,
        amount_paid: required,
        refunded_excess: refund,
        currency: Currency::Native,
    });
    Ok(())
}

#[derive(Accounts)]
pub struct FulfillOfferStable<'info> {
    #[account(
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
        seeds = [STABLE_TREASURY_SEED, desk.key().as_ref()],
        bump
    )]
    pub desk_stable_treasury: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = payer_stable_ata.mint == desk.stable_mint,
        constraint = payer_stable_ata.owner == payer.key()
    )]
    pub payer_stable_ata: Account<'info, TokenAccount>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct FulfillOfferNative<'info> {
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

    #[account(mut)]
    pub payer: Signer<'info>,

    pub system_program: Program<'info, System>,
}
