pub const DESK_SEED: &[u8] = b"desk";
pub const REGISTRY_SEED: &[u8] = b"registry";
pub const TREASURY_SEED: &[u8] = b"treasury";
pub const STABLE_TREASURY_SEED: &[u8] = b"stable_treasury";
pub const CONSIGNMENT_SEED: &[u8] = b"consignment";
pub const OFFER_SEED: &[u8] = b"offer";

/// USD amounts are carried with 8 decimals (1e8 = $1).
pub const PRICE_DECIMALS: u32 = 8;
/// Stablecoin payments are denominated in 6-decimal base units.
pub const STABLE_DECIMALS: u8 = 6;
pub const LAMPORTS_PER_NATIVE: u64 = 1_000_000_000;

pub const BPS_DENOMINATOR: u64 = 10_000;
pub const SECONDS_PER_DAY: i64 = 86_400;

pub const MAX_APPROVERS: usize = 32;
pub const MAX_REQUIRED_APPROVALS: u8 = 10;
pub const MAX_ALLOWED_BUYERS: usize = 16;

/// Quotes shorter than this are not enforceable by approvers in practice.
pub const MIN_QUOTE_EXPIRY_SECS: i64 = 60;

/// Admin-set per-token prices expire after one hour.
pub const MANUAL_PRICE_TTL_SECS: i64 = 3_600;

/// Token prices must sit in (0, $10,000]; native in [$0.01, $100,000].
pub const TOKEN_PRICE_MAX_8D: u64 = 1_000_000_000_000;
pub const NATIVE_PRICE_MIN_8D: u64 = 1_000_000;
pub const NATIVE_PRICE_MAX_8D: u64 = 10_000_000_000_000;

/// Bounded open-offer index on the desk.
pub const OPEN_OFFER_CAPACITY: usize = 100;
pub const MAX_CLEANUP_BATCH: u8 = 100;
/// Cancelled entries stay enumerable for this long before compaction may drop them.
pub const CLEANUP_GRACE_SECS: i64 = 7 * SECONDS_PER_DAY;

pub const MAX_AUTO_CLAIM: usize = 50;

/// Beneficiaries may also trigger an emergency refund this long after unlock,
/// regardless of the admin-configured deadline.
pub const REFUND_UNLOCK_GRACE_SECS: i64 = 30 * SECONDS_PER_DAY;
/// Owner recovery of abandoned matured offers.
pub const ADMIN_WITHDRAW_GRACE_SECS: i64 = 180 * SECONDS_PER_DAY;
