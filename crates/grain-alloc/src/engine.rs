//! Harvest entry point: history filtering and strategy dispatch.

use grain_core::{
    CredTimeSlice, Earnings, Harvest, HarvestError, Strategy, StrategyKind,
};
use tracing::debug;

use crate::cred::lifetime_cred;
use crate::fair::compute_fair_receipts;
use crate::fast::compute_fast_receipts;

/// Slices that ended at or before `timestamp_ms`, in their original order.
pub fn completed_slices(history: &[CredTimeSlice], timestamp_ms: u64) -> Vec<&CredTimeSlice> {
    history
        .iter()
        .filter(|slice| slice.interval_end_ms <= timestamp_ms)
        .collect()
}

fn check_version(kind: StrategyKind, version: u32) -> Result<(), HarvestError> {
    if version != kind.current_version() {
        return Err(HarvestError::UnsupportedStrategyVersion { kind, version });
    }
    Ok(())
}

/// Compute the receipts of one allocation event.
///
/// Slices ending after `timestamp_ms` are ignored by both policies. With no
/// completed slice the result is an empty harvest; strategy validation is
/// not reached in that case. Otherwise FAST splits by the latest completed
/// slice and FAIR by cred summed over every completed slice.
///
/// Neither `history` nor `earnings` is modified. The call either returns a
/// complete harvest or an error, never partial receipts.
pub fn harvest(
    strategy: Strategy,
    history: &[CredTimeSlice],
    earnings: &Earnings,
    timestamp_ms: u64,
) -> Result<Harvest, HarvestError> {
    let completed = completed_slices(history, timestamp_ms);
    let Some(latest) = completed.last() else {
        debug!(
            strategy = %strategy.kind(),
            slices = history.len(),
            timestamp_ms,
            "no completed cred slices, empty harvest"
        );
        return Ok(Harvest::new(strategy, Vec::new(), timestamp_ms));
    };

    let receipts = match &strategy {
        Strategy::Fast { version, amount } => {
            check_version(StrategyKind::Fast, *version)?;
            debug!(interval_end_ms = latest.interval_end_ms, amount = %amount, "fast harvest");
            compute_fast_receipts(*amount, &latest.cred)?
        }
        Strategy::Fair { version, amount } => {
            check_version(StrategyKind::Fair, *version)?;
            let lifetime = lifetime_cred(completed.iter().copied())?;
            debug!(
                slices = completed.len(),
                contributors = lifetime.len(),
                amount = %amount,
                "fair harvest"
            );
            compute_fair_receipts(*amount, &lifetime, earnings)?
        }
    };

    debug!(receipts = receipts.len(), timestamp_ms, "harvest computed");
    Ok(Harvest::new(strategy, receipts, timestamp_ms))
}
