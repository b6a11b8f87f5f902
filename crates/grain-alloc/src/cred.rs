//! Cred validation and aggregation.

use grain_core::{Address, CredTimeSlice, GrainError};
use indexmap::IndexMap;

/// Reject scores that are non-finite or negative.
fn checked_score(score: f64) -> Result<f64, GrainError> {
    if !score.is_finite() || score < 0.0 {
        return Err(GrainError::InvalidNumber(score.to_string()));
    }
    Ok(score)
}

/// Sum of all scores in iteration order. The sum itself must stay finite.
pub fn total_cred(cred: &IndexMap<Address, f64>) -> Result<f64, GrainError> {
    let total = cred
        .values()
        .try_fold(0.0, |acc, &score| Ok::<_, GrainError>(acc + checked_score(score)?))?;
    checked_score(total)
}

/// Per-address cred summed across `slices`, keyed in first-appearance order.
pub fn lifetime_cred<'a, I>(slices: I) -> Result<IndexMap<Address, f64>, GrainError>
where
    I: IntoIterator<Item = &'a CredTimeSlice>,
{
    let mut totals: IndexMap<Address, f64> = IndexMap::new();
    for slice in slices {
        for (address, &score) in &slice.cred {
            let total = totals.entry(address.clone()).or_insert(0.0);
            *total = checked_score(*total + checked_score(score)?)?;
        }
    }
    Ok(totals)
}
