//! # grain-core
//! Foundation types for Grain allocation: the fixed-point currency,
//! contribution-score history, strategies, receipts and harvests.

pub mod constants;
pub mod error;
pub mod grain;
pub mod ratio;
pub mod types;

pub use error::{GrainError, HarvestError};
pub use grain::Grain;
pub use ratio::Ratio;
pub use types::{
    Address, CredHistory, CredTimeSlice, Earnings, Harvest, Receipt, Strategy, StrategyKind,
};
