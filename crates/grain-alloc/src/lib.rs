//! # grain-alloc: Grain allocation engine.
//!
//! Converts a cred history and a prior-earnings snapshot into the receipts
//! of one harvest. Everything here is a pure function of its inputs:
//! - **History filtering**: only slices ending at or before the harvest
//!   timestamp count, for either policy.
//! - **FAST**: split the amount by the most recent completed slice's cred.
//! - **FAIR**: split the amount by how far each contributor's lifetime
//!   earnings lag their lifetime cred share, measured against the supply
//!   that exists once this harvest is paid.
//! - **Ledger folding**: add a harvest's receipts to an earnings snapshot
//!   to produce the next one.
//!
//! Amounts stay exact [`Grain`](grain_core::Grain) integers throughout;
//! floating point only appears as the ratio of each scaling step.

pub mod cred;
pub mod engine;
pub mod fair;
pub mod fast;
pub mod ledger;

pub use engine::{completed_slices, harvest};
pub use fair::compute_fair_receipts;
pub use fast::compute_fast_receipts;
pub use ledger::fold_receipts;
