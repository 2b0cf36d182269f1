use anchor_lang::prelude::*;
use pyth_solana_receiver_sdk::price_update::PriceUpdateV2;

use crate::constants::*;
use crate::errors::OtcError;
use crate::events::PricesUpdated;
use crate::state::{Desk, TokenRegistry};
use crate::utils::{check_price_deviation, convert_feed_price, validate_token_price_bounds};

/// Pull a fresh token price from the configured oracle feed. Permissionless:
/// the feed id baked into the registry is the trust anchor, not the caller.
pub fn update_token_price_from_feed(
    ctx: Context<UpdateTokenPriceFromFeed>,
    max_price_deviation_bps: u16,
) -> Result<()> {
    let desk = &ctx.accounts.desk;
    let registry = &mut ctx.accounts.token_registry;
    require!(registry.price_feed_id != [0u8; 32], OtcError::FeedNotConfigured);

    let clock = Clock::get()?;
    let price = ctx
        .accounts
        .price_feed
        .get_price_no_older_than(&clock, desk.max_price_age_secs as u64, &registry.price_feed_id)
        .map_err(|_| OtcError::StalePrice)?;

    let usd_8d = convert_feed_price(price.price, price.exponent)?;
    check_price_deviation(registry.usd_price_8d, usd_8d, max_price_deviation_bps)?;

    registry.usd_price_8d = usd_8d;
    registry.price_updated_at = clock.unix_timestamp;

    emit!(PricesUpdated {
        desk: desk.key(),
        token_mint: Some(registry.token_mint),
        usd_price_8d: usd_8d,
        updated_at: clock.unix_timestamp,
        manual: false,
    });
    Ok(())
}

pub fn update_native_price_from_feed(
    ctx: Context<UpdateNativePriceFromFeed>,
    max_price_deviation_bps: u16,
) -> Result<()> {
    let desk = &mut ctx.accounts.desk;
    require!(desk.native_price_feed_id != [0u8; 32], OtcError::FeedNotConfigured);

    let clock = Clock::get()?;
    let price = ctx
        .accounts
        .price_feed
        .get_price_no_older_than(&clock, desk.max_price_age_secs as u64, &desk.native_price_feed_id)
        .map_err(|_| OtcError::StalePrice)?;

    let usd_8d = convert_feed_price(price.price, price.exponent)?;
    check_price_deviation(desk.native_usd_price_8d, usd_8d, max_price_deviation_bps)?;

    desk.native_usd_price_8d = usd_8d;
    desk.native_price_updated_at = clock.unix_timestamp;

    emit!(PricesUpdated {
        desk: desk.key(),
        token_mint: None,
        usd_price_8d: usd_8d,
        updated_at: clock.unix_timestamp,
        manual: false,
    });
    Ok(())
}

/// Owner-set manual override for one token; expires after the manual TTL.
pub fn set_token_manual_price(ctx: Context<SetTokenManualPrice>, usd_8d: u64) -> Result<()> {
    validate_token_price_bounds(usd_8d)?;
    let now = Clock::get()?.unix_timestamp;
    let registry = &mut ctx.accounts.token_registry;
    registry.manual_usd_price_8d = usd_8d;
    registry.manual_price_updated_at = now;

    emit!(PricesUpdated {
        desk: registry.desk,
        token_mint: Some(registry.token_mint),
        usd_price_8d: usd_8d,
        updated_at: now,
        manual: true,
    });
    Ok(())
}

#[derive(Accounts)]
pub struct UpdateTokenPriceFromFeed<'info> {
    #[account(
        seeds = [DESK_SEED, desk.owner.as_ref()],
        bump = desk.bump
    )]
    pub desk: Account<'info, Desk>,

    #[account(
        mut,
        constraint = token_registry.desk == desk.key() @ OtcError::DeskMismatch
    )]
    pub token_registry: Account<'info, TokenRegistry>,

    pub price_feed: Account<'info, PriceUpdateV2>,

    pub payer: Signer<'info>,
}

#[derive(Accounts)]
pub struct UpdateNativePriceFromFeed<'info> {
    #[account(
        mut,
        seeds = [DESK_SEED, desk.owner.as_ref()],
        bump = desk.bump
    )]
    pub desk: Account<'info, Desk>,

    pub price_feed: Account<'info, PriceUpdateV2>,

    pub payer: Signer<'info>,
}

#[derive(Accounts)]
pub struct SetTokenManualPrice<'info> {
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
