use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::errors::OtcError;
use crate::events::{AdminEmergencyWithdrawn, OfferRefunded};
use crate::state::{Consignment, Currency, Desk, Offer, TokenRegistry};

/// Emergency paths deliberately skip the pause gate: a paused desk must not
/// be able to trap paid-but-unclaimed funds.

pub(crate) fn validate_emergency_refund(
    desk: &Desk,
    offer: &Offer,
    caller: &Pubkey,
    now: i64,
) -> Result<()> {
    require!(desk.emergency_refund_enabled, OtcError::BadState);
    require!(offer.paid && !offer.is_terminal(), OtcError::BadState);

    let deadline = offer
        .created_at
        .checked_add(desk.emergency_refund_deadline_secs)
        .ok_or(OtcError::Overflow)?;
    let unlock_deadline = offer
        .unlock_time
        .checked_add(REFUND_UNLOCK_GRACE_SECS)
        .ok_or(OtcError::Overflow)?;
    require!(now >= deadline || now >= unlock_deadline, OtcError::TooEarlyForRefund);

    require!(
        *caller == offer.payer || *caller == offer.beneficiary || desk.is_operator(caller),
        OtcError::NotOwner
    );
    Ok(())
}

/// Release the reservation held by a refunded offer. The consignment (or the
/// desk's P2P pool) gets its inventory back and can be listed again.
fn release_refunded_inventory(
    desk: &mut Desk,
    offer: &Offer,
    registry: &mut TokenRegistry,
    consignment: Option<&mut Account<Consignment>>,
) -> Result<()> {
    registry.release(offer.token_amount)?;
    if offer.consignment_id != 0 {
        let consignment = consignment.ok_or(OtcError::BadState)?;
        require!(consignment.id == offer.consignment_id, OtcError::BadState);
        consignment.release(offer.token_amount)?;
    } else {
        desk.return_deposited(offer.token_amount)?;
    }
    Ok(())
}

pub fn emergency_refund_stable(ctx: Context<EmergencyRefundStable>, _offer_id: u64) -> Result<()> {
    let desk = &mut ctx.accounts.desk;
    let now = Clock::get()?.unix_timestamp;
    let caller = ctx.accounts.caller.key();

    let offer = &mut ctx.accounts.offer;
    require!(offer.currency == Currency::Stable, OtcError::NotStable);
    validate_emergency_refund(desk, offer, &caller, now)?;

    release_refunded_inventory(
        desk,
        offer,
        &mut ctx.accounts.token_registry,
        ctx.accounts.consignment.as_mut(),
    )?;
    offer.refunded = true;
    desk.mark_open_offer(offer.id, true, false);

    let owner = desk.owner;
    let seeds: &[&[u8]] = &[DESK_SEED, owner.as_ref(), &[desk.bump]];
    let signer = &[seeds];
    let cpi_accounts = Transfer {
        from: ctx.accounts.desk_stable_treasury.to_account_info(),
        to: ctx.accounts.payer_stable_ata.to_account_info(),
        authority: desk.to_account_info(),
    };
    let cpi_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        cpi_accounts,
        signer,
    );
    token::transfer(cpi_ctx, offer.amount_paid)?;

    emit!(OfferRefunded {
        offer: offer.key(),
        payer: offer.payer,
        amount_refunded: offer.amount_paid,
        currency: Currency::Stable,
        timestamp: now,
    });
    Ok(())
}

pub fn emergency_refund_native(ctx: Context<EmergencyRefundNative>, _offer_id: u64) -> Result<()> {
    let desk_info = ctx.accounts.desk.to_account_info();
    let desk = &mut ctx.accounts.desk;
    let now = Clock::get()?.unix_timestamp;
    let caller = ctx.accounts.caller.key();

    let offer = &mut ctx.accounts.offer;
    require!(offer.currency == Currency::Native, OtcError::NotNative);
    validate_emergency_refund(desk, offer, &caller, now)?;

    release_refunded_inventory(
        desk,
        offer,
        &mut ctx.accounts.token_registry,
        ctx.accounts.consignment.as_mut(),
    )?;
    offer.refunded = true;
    desk.mark_open_offer(offer.id, true, false);

    // Keep the desk rent-exempt after paying out.
    let rent = Rent::get()?;
    let min_rent = rent.minimum_balance(Desk::SPACE);
    let after = desk_info
        .lamports()
        .checked_sub(offer.amount_paid)
        .ok_or(OtcError::Overflow)?;
    require!(after >= min_rent, OtcError::BadState);

    **desk_info.try_borrow_mut_lamports()? -= offer.amount_paid;
    **ctx.accounts.payer_refund.to_account_info().try_borrow_mut_lamports()? +=
        offer.amount_paid;

    emit!(OfferRefunded {
        offer: offer.key(),
        payer: offer.payer,
        amount_refunded: offer.amount_paid,
        currency: Currency::Native,
        timestamp: now,
    });
    Ok(())
}

/// Last-resort owner recovery of a matured offer nobody claimed. The paid
/// funds stay with the desk; the escrowed tokens sweep back to the owner.
pub fn admin_emergency_withdraw(
    ctx: Context<AdminEmergencyWithdraw>,
    _offer_id: u64,
) -> Result<()> {
    let desk = &mut ctx.accounts.desk;
    let now = Clock::get()?.unix_timestamp;

    let offer = &mut ctx.accounts.offer;
    require!(offer.paid && !offer.is_terminal(), OtcError::BadState);
    let sweep_time = offer
        .unlock_time
        .checked_add(ADMIN_WITHDRAW_GRACE_SECS)
        .ok_or(OtcError::Overflow)?;
    require!(now >= sweep_time, OtcError::TooEarlyForRefund);

    ctx.accounts.token_registry.release(offer.token_amount)?;
    // Terminal close: the escrow is consumed, so the offer counts as
    // fulfilled for bookkeeping even though the tokens went to the owner.
    offer.fulfilled = true;
    desk.mark_open_offer(offer.id, false, true);

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
    token::transfer(cpi_ctx, offer.token_amount)?;

    emit!(AdminEmergencyWithdrawn {
        offer: offer.key(),
        owner,
        token_amount: offer.token_amount,
        timestamp: now,
    });
    Ok(())
}

#[derive(Accounts)]
pub struct EmergencyRefundStable<'info> {
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
        constraint = consignment.desk == desk.key() @ OtcError::DeskMismatch
    )]
    pub consignment: Option<Account<'info, Consignment>>,

    #[account(
        mut,
        seeds = [STABLE_TREASURY_SEED, desk.key().as_ref()],
        bump
    )]
    pub desk_stable_treasury: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = payer_stable_ata.mint == desk.stable_mint,
        constraint = payer_stable_ata.owner == offer.payer
    )]
    pub payer_stable_ata: Account<'info, TokenAccount>,

    pub caller: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct EmergencyRefundNative<'info> {
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
        constraint = consignment.desk == desk.key() @ OtcError::DeskMismatch
    )]
    pub consignment: Option<Account<'info, Consignment>>,

    /// CHECK: refund destination, pinned to the recorded payer
    #[account(
        mut,
        constraint = payer_refund.key() == offer.payer @ OtcError::BadState
    )]
    pub payer_refund: UncheckedAccount<'info>,

    pub caller: Signer<'info>,
}

#[derive(Accounts)]
pub struct AdminEmergencyWithdraw<'info> {
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
        constraint = owner_token_ata.mint == offer.token_mint,
        constraint = owner_token_ata.owner == owner.key()
    )]
    pub owner_token_ata: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}
