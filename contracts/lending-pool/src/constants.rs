pub(crate) const TTL_THRESHOLD: u32 = 100_000;
pub(crate) const TTL_EXTEND_TO: u32 = 200_000;

/// Reserve ids index the user configuration bitmaps.
pub(crate) const MAX_RESERVES: u32 = 128;
/// Debt ceilings and isolated debt carry two decimals.
pub(crate) const DEBT_CEILING_DECIMALS: u32 = 2;
pub(crate) const MAX_DECIMALS: u32 = 38;
pub(crate) const PERCENTAGE_FACTOR_BPS: u32 = 10_000;

pub(crate) const DEFAULT_FLASH_LOAN_PREMIUM_TOTAL: u32 = 9;
pub(crate) const DEFAULT_FLASH_LOAN_PREMIUM_TO_PROTOCOL: u32 = 3_000;

/// Share of the user's debt in one asset that a single liquidation may cover.
pub(crate) const DEFAULT_LIQUIDATION_CLOSE_FACTOR: u32 = 5_000;
pub(crate) const MAX_LIQUIDATION_CLOSE_FACTOR: u32 = 10_000;
/// 0.95 ray.
pub(crate) const DEFAULT_FULL_LIQUIDATION_HF: u128 = 950_000_000_000_000_000_000_000_000;

/// Stable borrows are limited to this share of the available liquidity.
pub(crate) const MAX_STABLE_RATE_BORROW_SIZE_PERCENT: u32 = 2_500;

pub(crate) const RATE_MODE_NONE: u32 = 0;
pub(crate) const RATE_MODE_STABLE: u32 = 1;
pub(crate) const RATE_MODE_VARIABLE: u32 = 2;
