//! Folding harvest receipts into an earnings snapshot.

use grain_core::{Earnings, Grain, GrainError, Receipt};

/// The earnings snapshot after paying `receipts`.
///
/// Existing addresses keep their position; addresses seen for the first
/// time are appended in receipt order. `earnings` itself is left untouched.
pub fn fold_receipts(earnings: &Earnings, receipts: &[Receipt]) -> Result<Earnings, GrainError> {
    let mut next = earnings.clone();
    for receipt in receipts {
        let earned = next.entry(receipt.address.clone()).or_insert(Grain::ZERO);
        *earned = earned.checked_add(receipt.amount)?;
    }
    Ok(next)
}
