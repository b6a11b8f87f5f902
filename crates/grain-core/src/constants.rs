//! Protocol constants. All amounts are in raw units (1 GRAIN = 10^18 raw).

/// Number of decimal places carried by [`Grain`](crate::grain::Grain).
pub const DECIMAL_PRECISION: u32 = 18;

/// Raw units per whole grain.
pub const ONE_RAW: i128 = 1_000_000_000_000_000_000;

/// Version stamped on every [`Harvest`](crate::types::Harvest).
pub const HARVEST_VERSION: u32 = 1;

/// The only implemented version of the FAST strategy.
pub const FAST_STRATEGY_VERSION: u32 = 1;

/// The only implemented version of the FAIR strategy.
pub const FAIR_STRATEGY_VERSION: u32 = 1;
