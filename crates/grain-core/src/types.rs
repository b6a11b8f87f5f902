//! Allocation value types: score history, earnings, strategies, receipts.
//!
//! All maps are [`IndexMap`]s. Insertion order is the canonical output
//! order of receipts, so it must survive serialization and every
//! transformation the engine applies.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::constants::{FAIR_STRATEGY_VERSION, FAST_STRATEGY_VERSION, HARVEST_VERSION};
use crate::error::{GrainError, HarvestError};
use crate::grain::Grain;

/// Opaque identifier of a contributor.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for Address {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One completed scoring interval.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CredTimeSlice {
    /// End of the interval, in milliseconds since the epoch.
    pub interval_end_ms: u64,
    /// Score per contributor for this interval. Absent means zero.
    pub cred: IndexMap<Address, f64>,
}

impl CredTimeSlice {
    pub fn new(interval_end_ms: u64, cred: IndexMap<Address, f64>) -> Self {
        Self { interval_end_ms, cred }
    }
}

/// Slices ordered by increasing `interval_end_ms`.
pub type CredHistory = Vec<CredTimeSlice>;

/// Lifetime grain already paid per contributor. Absent means zero.
pub type Earnings = IndexMap<Address, Grain>;

/// The two allocation policies, without their payload.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    #[serde(rename = "FAST")]
    Fast,
    #[serde(rename = "FAIR")]
    Fair,
}

impl StrategyKind {
    /// The version this build implements for the policy.
    pub fn current_version(&self) -> u32 {
        match self {
            Self::Fast => FAST_STRATEGY_VERSION,
            Self::Fair => FAIR_STRATEGY_VERSION,
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fast => f.write_str("FAST"),
            Self::Fair => f.write_str("FAIR"),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = HarvestError;

    /// Case-insensitive `fast` / `fair`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "FAST" => Ok(Self::Fast),
            "FAIR" => Ok(Self::Fair),
            _ => Err(HarvestError::UnknownStrategyType(s.to_string())),
        }
    }
}

/// A versioned allocation policy and the amount it distributes.
///
/// The version travels with every recorded harvest so that a later change
/// to either algorithm can be introduced without reinterpreting old
/// records.
///
/// # Examples
///
/// ```
/// use grain_core::{Grain, Strategy, StrategyKind};
/// let s = Strategy::fair(Grain::from_integer(15));
/// assert_eq!(s.kind(), StrategyKind::Fair);
/// assert_eq!(s.version(), 1);
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Strategy {
    /// Split `amount` by the most recent completed interval's cred.
    #[serde(rename = "FAST")]
    Fast { version: u32, amount: Grain },
    /// Split `amount` to close the gap between lifetime earnings and
    /// lifetime cred share.
    #[serde(rename = "FAIR")]
    Fair { version: u32, amount: Grain },
}

impl Strategy {
    /// FAST at the current version.
    pub fn fast(amount: Grain) -> Self {
        Self::Fast { version: FAST_STRATEGY_VERSION, amount }
    }

    /// FAIR at the current version.
    pub fn fair(amount: Grain) -> Self {
        Self::Fair { version: FAIR_STRATEGY_VERSION, amount }
    }

    pub fn new(kind: StrategyKind, version: u32, amount: Grain) -> Self {
        match kind {
            StrategyKind::Fast => Self::Fast { version, amount },
            StrategyKind::Fair => Self::Fair { version, amount },
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Self::Fast { .. } => StrategyKind::Fast,
            Self::Fair { .. } => StrategyKind::Fair,
        }
    }

    pub fn version(&self) -> u32 {
        match self {
            Self::Fast { version, .. } | Self::Fair { version, .. } => *version,
        }
    }

    pub fn amount(&self) -> Grain {
        match self {
            Self::Fast { amount, .. } | Self::Fair { amount, .. } => *amount,
        }
    }
}

/// One contributor's payment within a harvest.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub address: Address,
    pub amount: Grain,
}

impl Receipt {
    pub fn new(address: Address, amount: Grain) -> Self {
        Self { address, amount }
    }
}

/// The complete, versioned result of one allocation event.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename = "HARVEST", rename_all = "camelCase")]
pub struct Harvest {
    pub version: u32,
    pub strategy: Strategy,
    pub receipts: Vec<Receipt>,
    pub timestamp_ms: u64,
}

impl Harvest {
    /// A harvest at the current [`HARVEST_VERSION`].
    pub fn new(strategy: Strategy, receipts: Vec<Receipt>, timestamp_ms: u64) -> Self {
        Self {
            version: HARVEST_VERSION,
            strategy,
            receipts,
            timestamp_ms,
        }
    }

    /// Sum of all receipt amounts.
    pub fn total(&self) -> Result<Grain, GrainError> {
        Grain::checked_sum(self.receipts.iter().map(|r| r.amount))
    }
}
