use anchor_lang::prelude::*;

#[error_code]
pub enum OtcError {
    #[msg("Stablecoin must have 6 decimals")]
    StableDecimals,

    #[msg("Amount out of range")]
    AmountRange,

    #[msg("Discount out of range")]
    Discount,

    #[msg("Lockup out of range")]
    LockupOutOfRange,

    #[msg("Must use fixed discount/lockup")]
    FixedTermsRequired,

    #[msg("Quote expiry too short")]
    QuoteExpiryTooShort,

    #[msg("Price data is stale")]
    StalePrice,

    #[msg("No price set")]
    NoPrice,

    #[msg("Bad price from oracle")]
    BadPrice,

    #[msg("Manual price too old")]
    ManualPriceTooOld,

    #[msg("Oracle feed ID not configured")]
    FeedNotConfigured,

    #[msg("Price deviation too large")]
    PriceDeviationTooLarge,

    #[msg("Minimum USD not met")]
    MinUsd,

    #[msg("Insufficient token inventory")]
    InsufficientInventory,

    #[msg("Overflow")]
    Overflow,

    #[msg("Bad state")]
    BadState,

    #[msg("Already approved by you")]
    AlreadyApproved,

    #[msg("Not approved")]
    NotApproved,

    #[msg("Quote expired")]
    Expired,

    #[msg("Not expired")]
    NotExpired,

    #[msg("Fulfill restricted")]
    FulfillRestricted,

    #[msg("Fulfill approver only")]
    FulfillApproverOnly,

    #[msg("Tokens still locked")]
    Locked,

    #[msg("Not owner")]
    NotOwner,

    #[msg("Not approver")]
    NotApprover,

    #[msg("Not consigner")]
    NotConsigner,

    #[msg("Private consignment")]
    PrivateConsignment,

    #[msg("Too many approvers")]
    TooManyApprovers,

    #[msg("Required approvals exceeds approver set")]
    TooFewApprovers,

    #[msg("Too many allowed buyers")]
    TooManyAllowedBuyers,

    #[msg("Paused")]
    Paused,

    #[msg("Too early for emergency refund")]
    TooEarlyForRefund,

    #[msg("Too many offers for batch")]
    TooManyOffers,

    #[msg("Invalid max")]
    InvalidMax,

    #[msg("Open offer index full")]
    OpenOfferIndexFull,

    #[msg("Account does not belong to this desk")]
    DeskMismatch,

    #[msg("Not a stablecoin offer")]
    NotStable,

    #[msg("Not a native-currency offer")]
    NotNative,
}
