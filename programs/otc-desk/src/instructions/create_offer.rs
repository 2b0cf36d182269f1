use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::OtcError;
use crate::events::OfferCreated;
use crate::state::{Consignment, Currency, Desk, Offer, TokenRegistry};
use crate::utils::quote_usd_8d;

/// Draw a negotiated offer against a consignment. Reserves inventory in the
/// same transaction that validates terms and snapshots prices, so two
/// concurrent offers can never overbook the same listing.
pub fn create_offer_from_consignment(
    ctx: Context<CreateOfferFromConsignment>,
    offer_id: u64,
    token_amount: u64,
    discount_bps: u16,
    currency: Currency,
    lockup_secs: i64,
) -> Result<()> {
    let desk = &mut ctx.accounts.desk;
    require!(!desk.paused, OtcError::Paused);
    require!(offer_id == desk.next_offer_id, OtcError::BadState);

    let consignment = &mut ctx.accounts.consignment;
    require!(consignment.is_active, OtcError::BadState);
    require!(
        consignment.allows_buyer(&ctx.accounts.beneficiary.key()),
        OtcError::PrivateConsignment
    );
    require!(token_amount <= desk.max_token_per_order, OtcError::AmountRange);
    require!(lockup_secs <= desk.max_lockup_secs, OtcError::LockupOutOfRange);
    consignment.validate_offer_terms(token_amount, discount_bps, lockup_secs)?;

    let registry = &mut ctx.accounts.token_registry;
    require!(registry.is_active, OtcError::BadState);

    let clock = Clock::get()?;
    let now = clock.unix_timestamp;
    let price_8d = registry.current_price(now, desk.max_price_age_secs)?;
    let native_usd_8d = match currency {
        Currency::Native => desk.native_price(now)?,
        Currency::Stable => 0,
    };

    let total_usd_8d = quote_usd_8d(token_amount, price_8d, registry.decimals, discount_bps)?;
    require!(total_usd_8d >= desk.min_usd_amount_8d, OtcError::MinUsd);

    // Inventory reservation: both counters move in this transaction or not
    // at all.
    consignment.reserve(token_amount)?;
    registry.reserve(token_amount)?;

    let auto_approved = !consignment.is_negotiable;

    desk.next_offer_id = offer_id.checked_add(1).ok_or(OtcError::Overflow)?;
    desk.push_open_offer(offer_id, now)?;

    let offer = &mut ctx.accounts.offer;
    init_offer(
        offer,
        desk.key(),
        desk.quote_expiry_secs,
        offer_id,
        consignment.id,
        consignment.token_mint,
        registry.decimals,
        ctx.accounts.beneficiary.key(),
        token_amount,
        discount_bps,
        currency,
        lockup_secs,
        price_8d,
        native_usd_8d,
        consignment.max_price_volatility_bps,
        auto_approved,
        now,
        ctx.bumps.offer,
    )?;

    emit!(OfferCreated {
        desk: desk.key(),
        offer: offer.key(),
        offer_id,
        consignment_id: consignment.id,
        beneficiary: offer.beneficiary,
        token_amount,
        discount_bps,
        currency,
        auto_approved,
        unlock_time: offer.unlock_time,
        expires_at: offer.expires_at,
    });
    Ok(())
}

/// Desk-level P2P offer against the desk's default token; bounds come from
/// desk limits instead of a consignment.
pub fn create_offer(
    ctx: Context<CreateOffer>,
    offer_id: u64,
    token_amount: u64,
    discount_bps: u16,
    currency: Currency,
    lockup_secs: i64,
) -> Result<()> {
    let desk = &mut ctx.accounts.desk;
    require!(!desk.paused, OtcError::Paused);
    require!(offer_id == desk.next_offer_id, OtcError::BadState);
    require!(
        token_amount > 0 && token_amount <= desk.max_token_per_order,
        OtcError::AmountRange
    );
    require!(discount_bps <= desk.max_discount_bps, OtcError::Discount);
    require!(
        lockup_secs >= 0 && lockup_secs <= desk.max_lockup_secs,
        OtcError::LockupOutOfRange
    );

    let registry = &mut ctx.accounts.token_registry;
    require!(registry.is_active, OtcError::BadState);

    let clock = Clock::get()?;
    let now = clock.unix_timestamp;
    let price_8d = registry.current_price(now, desk.max_price_age_secs)?;
    let native_usd_8d = match currency {
        Currency::Native => desk.native_price(now)?,
        Currency::Stable => 0,
    };

    let total_usd_8d = quote_usd_8d(token_amount, price_8d, registry.decimals, discount_bps)?;
    require!(total_usd_8d >= desk.min_usd_amount_8d, OtcError::MinUsd);

    // P2P offers draw on the owner-deposited pool only; consignment escrow
    // sits in the same treasury and is never theirs to book.
    desk.draw_deposited(token_amount)?;
    registry.reserve(token_amount)?;

    desk.next_offer_id = offer_id.checked_add(1).ok_or(OtcError::Overflow)?;
    desk.push_open_offer(offer_id, now)?;

    let token_mint = desk.token_mint;
    let offer = &mut ctx.accounts.offer;
    init_offer(
        offer,
        desk.key(),
        desk.quote_expiry_secs,
        offer_id,
        0,
        token_mint,
        registry.decimals,
        ctx.accounts.beneficiary.key(),
        token_amount,
        discount_bps,
        currency,
        lockup_secs,
        price_8d,
        native_usd_8d,
        0,
        false,
        now,
        ctx.bumps.offer,
    )?;

    emit!(OfferCreated {
        desk: desk.key(),
        offer: offer.key(),
        offer_id,
        consignment_id: 0,
        beneficiary: offer.beneficiary,
        token_amount,
        discount_bps,
        currency,
        auto_approved: false,
        unlock_time: offer.unlock_time,
        expires_at: offer.expires_at,
    });
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn init_offer(
    offer: &mut Offer,
    desk_key: Pubkey,
    quote_expiry_secs: i64,
    offer_id: u64,
    consignment_id: u64,
    token_mint: Pubkey,
    token_decimals: u8,
    beneficiary: Pubkey,
    token_amount: u64,
    discount_bps: u16,
    currency: Currency,
    lockup_secs: i64,
    price_8d: u64,
    native_usd_8d: u64,
    max_price_deviation_bps: u16,
    auto_approved: bool,
    now: i64,
    bump: u8,
) -> Result<()> {
    offer.desk = desk_key;
    offer.id = offer_id;
    offer.consignment_id = consignment_id;
    offer.token_mint = token_mint;
    offer.token_decimals = token_decimals;
    offer.beneficiary = beneficiary;
    offer.token_amount = token_amount;
    offer.discount_bps = discount_bps;
    offer.lockup_secs = lockup_secs;
    offer.price_usd_per_token_8d = price_8d;
    offer.native_usd_price_8d = native_usd_8d;
    offer.max_price_deviation_bps = max_price_deviation_bps;
    offer.currency = currency;
    offer.approvals = Vec::new();
    offer.approved = false;
    offer.auto_approved = auto_approved;
    offer.paid = false;
    offer.fulfilled = false;
    offer.cancelled = false;
    offer.refunded = false;
    offer.payer = Pubkey::default();
    offer.amount_paid = 0;
    offer.created_at = now;
    offer.unlock_time = now.checked_add(lockup_secs).ok_or(OtcError::Overflow)?;
    offer.expires_at = now
        .checked_add(quote_expiry_secs)
        .ok_or(OtcError::Overflow)?;
    offer.bump = bump;
    Ok(())
}

#[derive(Accounts)]
#[instruction(offer_id: u64)]
pub struct CreateOfferFromConsignment<'info> {
    #[account(
        mut,
        seeds = [DESK_SEED, desk.owner.as_ref()],
        bump = desk.bump
    )]
    pub desk: Account<'info, Desk>,

    #[account(
        mut,
        constraint = consignment.desk == desk.key() @ OtcError::DeskMismatch
    )]
    pub consignment: Account<'info, Consignment>,

    #[account(
        mut,
        constraint = token_registry.desk == desk.key() @ OtcError::DeskMismatch,
        constraint = token_registry.token_mint == consignment.token_mint @ OtcError::BadState
    )]
    pub token_registry: Account<'info, TokenRegistry>,

    #[account(mut)]
    pub beneficiary: Signer<'info>,

    #[account(
        init,
        payer = beneficiary,
        space = Offer::SPACE,
        seeds = [OFFER_SEED, desk.key().as_ref(), offer_id.to_le_bytes().as_ref()],
        bump
    )]
    pub offer: Account<'info, Offer>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(offer_id: u64)]
pub struct CreateOffer<'info> {
    #[account(
        mut,
        seeds = [DESK_SEED, desk.owner.as_ref()],
        bump = desk.bump
    )]
    pub desk: Account<'info, Desk>,

    #[account(
        mut,
        constraint = token_registry.desk == desk.key() @ OtcError::DeskMismatch,
        constraint = token_registry.token_mint == desk.token_mint @ OtcError::BadState
    )]
    pub token_registry: Account<'info, TokenRegistry>,

    #[account(mut)]
    pub beneficiary: Signer<'info>,

    #[account(
        init,
        payer = beneficiary,
        space = Offer::SPACE,
        seeds = [OFFER_SEED, desk.key().as_ref(), offer_id.to_le_bytes().as_ref()],
        bump
    )]
    pub offer: Account<'info, Offer>,

    pub system_program: Program<'info, System>,
}
