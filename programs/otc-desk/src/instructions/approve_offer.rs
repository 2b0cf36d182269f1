use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::OtcError;
use crate::events::OfferApproved;
use crate::state::{Desk, Offer};

/// One approver's sign-off. Approval is a set, not a counter: duplicate
/// signatures from the same approver fail, and the offer flips to approved
/// once distinct signatures reach the desk threshold.
pub fn approve_offer(ctx: Context<ApproveOffer>, _offer_id: u64) -> Result<()> {
    let desk = &ctx.accounts.desk;
    require!(!desk.paused, OtcError::Paused);

    let approver = ctx.accounts.approver.key();
    require!(desk.is_approver(&approver), OtcError::NotApprover);

    let offer = &mut ctx.accounts.offer;
    let approved = offer.register_approval(approver, desk.required_approvals)?;

    emit!(OfferApproved {
        offer: offer.key(),
        approver,
        approvals: offer.approvals.len() as u8,
        approved,
    });
    Ok(())
}

#[derive(Accounts)]
pub struct ApproveOffer<'info> {
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

    pub approver: Signer<'info>,
}
