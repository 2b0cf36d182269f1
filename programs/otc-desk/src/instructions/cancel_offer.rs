use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::OtcError;
use crate::events::OfferCancelled;
use crate::state::{Consignment, Desk, Offer, TokenRegistry};

/// Cancel a pre-payment offer. Operators may cancel at any time; the
/// beneficiary only after the quote has expired. The reservation flows back
/// to the consignment and registry in the same transaction.
pub fn cancel_offer(ctx: Context<CancelOffer>, _offer_id: u64) -> Result<()> {
    let desk = &mut ctx.accounts.desk;
    require!(!desk.paused, OtcError::Paused);

    let caller = ctx.accounts.caller.key();
    let now = Clock::get()?.unix_timestamp;

    let offer = &mut ctx.accounts.offer;
    require!(!offer.paid && !offer.is_terminal(), OtcError::BadState);

    if caller == offer.beneficiary && !desk.is_operator(&caller) {
        require!(now >= offer.expires_at, OtcError::NotExpired);
    } else {
        require!(desk.is_operator(&caller), OtcError::NotApprover);
    }

    let registry = &mut ctx.accounts.token_registry;
    registry.release(offer.token_amount)?;

    if offer.consignment_id != 0 {
        let consignment = ctx
            .accounts
            .consignment
            .as_mut()
            .ok_or(OtcError::BadState)?;
        require!(consignment.id == offer.consignment_id, OtcError::BadState);
        consignment.release(offer.token_amount)?;
    } else {
        desk.return_deposited(offer.token_amount)?;
    }

    offer.cancelled = true;
    desk.mark_open_offer(offer.id, true, false);

    emit!(OfferCancelled {
        offer: offer.key(),
        by: caller,
        timestamp: now,
    });
    Ok(())
}

#[derive(Accounts)]
pub struct CancelOffer<'info> {
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

    /// Required when the offer was drawn from a consignment.
    #[account(
        mut,
        constraint = consignment.desk == desk.key() @ OtcError::DeskMismatch
    )]
    pub consignment: Option<Account<'info, Consignment>>,

    pub caller: Signer<'info>,
}
