use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::OtcError;
use crate::events::OffersCleaned;
use crate::state::Desk;

/// Permissionless housekeeping: swap-remove closed entries from the bounded
/// open-offer index. The same compaction runs automatically when a new offer
/// finds the index full.
pub fn cleanup_expired_offers(ctx: Context<CleanupExpiredOffers>, max_to_process: u8) -> Result<()> {
    require!(
        max_to_process >= 1 && max_to_process <= MAX_CLEANUP_BATCH,
        OtcError::InvalidMax
    );

    let now = Clock::get()?.unix_timestamp;
    let desk = &mut ctx.accounts.desk;
    let removed = desk.compact_open_offers(now, max_to_process as usize);

    emit!(OffersCleaned {
        desk: desk.key(),
        removed: removed as u64,
        remaining: desk.open_offers.len() as u64,
    });
    Ok(())
}

#[derive(Accounts)]
pub struct CleanupExpiredOffers<'info> {
    #[account(
        mut,
        seeds = [DESK_SEED, desk.owner.as_ref()],
        bump = desk.bump
    )]
    pub desk: Account<'info, Desk>,

    pub caller: Signer<'info>,
}
