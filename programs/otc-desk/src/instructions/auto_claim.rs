use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::errors::OtcError;
use crate::events::TokensClaimed;
use crate::state::{Desk, Offer, TokenRegistry};

/// Batch claim of matured offers, driven by an approver or the agent.
/// Remaining accounts come in groups of four per offer id:
/// `[offer, token_registry, desk_token_treasury, beneficiary_token_ata]`.
/// Malformed, immature, unpaid, or already-fulfilled entries are skipped so a
/// single bad id never blocks the rest of the batch.
/// Claim gate for one batch entry. Wrong desk, wrong id, unpaid, closed, or
/// still-locked offers are skipped, never fatal.
pub(crate) fn claimable(offer: &Offer, desk_key: &Pubkey, expected_id: u64, now: i64) -> bool {
    offer.desk == *desk_key
        && offer.id == expected_id
        && offer.paid
        && !offer.is_terminal()
        && now >= offer.unlock_time
}

pub fn auto_claim<'info>(
    ctx: Context<'_, '_, 'info, 'info, AutoClaim<'info>>,
    offer_ids: Vec<u64>,
) -> Result<()> {
    let desk = &mut ctx.accounts.desk;
    require!(!desk.paused, OtcError::Paused);
    require!(
        desk.is_approver_or_agent(&ctx.accounts.approver.key()),
        OtcError::NotApprover
    );
    require!(offer_ids.len() <= MAX_AUTO_CLAIM, OtcError::TooManyOffers);
    require!(
        ctx.remaining_accounts.len() == offer_ids.len() * 4,
        OtcError::TooManyOffers
    );

    let now = Clock::get()?.unix_timestamp;
    let desk_key = desk.key();
    let owner = desk.owner;
    let bump = desk.bump;
    let seeds: &[&[u8]] = &[DESK_SEED, owner.as_ref(), &[bump]];
    let signer = &[seeds];

    for (offer_id, group) in offer_ids.iter().zip(ctx.remaining_accounts.chunks(4)) {
        if *offer_id == 0 {
            continue;
        }
        if group.iter().any(|ai| !ai.is_writable) {
            continue;
        }

        let mut offer = match Account::<Offer>::try_from(&group[0]) {
            Ok(o) => o,
            Err(_) => continue,
        };
        if !claimable(&offer, &desk_key, *offer_id, now) {
            continue;
        }

        let mut registry = match Account::<TokenRegistry>::try_from(&group[1]) {
            Ok(r) => r,
            Err(_) => continue,
        };
        if registry.desk != desk_key || registry.token_mint != offer.token_mint {
            continue;
        }

        let treasury = match Account::<TokenAccount>::try_from(&group[2]) {
            Ok(t) => t,
            Err(_) => continue,
        };
        if treasury.owner != desk_key || treasury.mint != offer.token_mint {
            continue;
        }

        let beneficiary_ata = match Account::<TokenAccount>::try_from(&group[3]) {
            Ok(t) => t,
            Err(_) => continue,
        };
        if beneficiary_ata.owner != offer.beneficiary || beneficiary_ata.mint != offer.token_mint {
            continue;
        }

        let cpi_accounts = Transfer {
            from: treasury.to_account_info(),
            to: beneficiary_ata.to_account_info(),
            authority: desk.to_account_info(),
        };
        let cpi_ctx = CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            cpi_accounts,
            signer,
        );
        token::transfer(cpi_ctx, offer.token_amount)?;

        registry.release(offer.token_amount)?;
        offer.fulfilled = true;
        desk.mark_open_offer(offer.id, false, true);

        emit!(TokensClaimed {
            offer: offer.key(),
            beneficiary: offer.beneficiary,
            amount: offer.token_amount,
            timestamp: now,
        });

        // Manually flush state loaded from remaining accounts.
        offer.exit(&crate::ID)?;
        registry.exit(&crate::ID)?;
    }
    Ok(())
}

#[derive(Accounts)]
pub struct AutoClaim<'info> {
    #[account(
        mut,
        seeds = [DESK_SEED, desk.owner.as_ref()],
        bump = desk.bump
    )]
    pub desk: Account<'info, Desk>,

    pub approver: Signer<'info>,

    pub token_program: Program<'info, Token>,
}
