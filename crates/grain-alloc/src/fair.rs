//! FAIR policy: pay down lifetime underpayment.
//!
//! The target rate is the grain-per-cred that would hold if the whole
//! supply, including this harvest, were distributed by lifetime cred:
//!
//! ```text
//! target(a)       = (total_earnings + harvest_amount) * cred(a) / total_cred
//! underpaid(a)    = target(a) - earned(a)        when positive
//! receipt(a)      = harvest_amount * underpaid(a) / total_underpaid
//! ```
//!
//! Since the harvest has not been paid yet, `total_underpaid` equals
//! `harvest_amount` plus the total overpayment of everyone above target,
//! so receipts always sum to the harvest amount up to rounding.

use grain_core::{Address, Earnings, Grain, HarvestError, Ratio, Receipt};
use indexmap::IndexMap;
use tracing::debug;

use crate::cred::total_cred;

/// Split `harvest_amount` among contributors whose earnings lag their
/// lifetime cred share.
///
/// Considers every address in `lifetime_cred` (in its order) followed by
/// addresses that only appear in `earnings`. Fairly paid and overpaid
/// addresses get no receipt at all, unlike FAST which emits zero receipts.
pub fn compute_fair_receipts(
    harvest_amount: Grain,
    lifetime_cred: &IndexMap<Address, f64>,
    earnings: &Earnings,
) -> Result<Vec<Receipt>, HarvestError> {
    if harvest_amount.is_negative() {
        return Err(HarvestError::InvalidAmount(harvest_amount));
    }

    let total_earnings = Grain::checked_sum(earnings.values().copied())?;
    let total = total_cred(lifetime_cred)?;
    if total == 0.0 {
        debug!(addresses = lifetime_cred.len(), "fair: zero lifetime cred, nothing to allocate");
        return Ok(Vec::new());
    }

    let pool = total_earnings.checked_add(harvest_amount)?;

    let earnings_only = earnings.keys().filter(|a| !lifetime_cred.contains_key(*a));
    let mut underpaid: Vec<(&Address, Grain)> = Vec::new();
    let mut total_underpayment = Grain::ZERO;
    for address in lifetime_cred.keys().chain(earnings_only) {
        let cred = lifetime_cred.get(address).copied().unwrap_or(0.0);
        let target = pool.scale(Ratio::new(cred / total)?)?;
        let earned = earnings.get(address).copied().unwrap_or(Grain::ZERO);
        if target > earned {
            let gap = target.checked_sub(earned)?;
            total_underpayment = total_underpayment.checked_add(gap)?;
            underpaid.push((address, gap));
        }
    }

    if total_underpayment.is_zero() {
        debug!("fair: everyone at or above target, nothing to allocate");
        return Ok(Vec::new());
    }

    debug!(
        underpaid = underpaid.len(),
        total_underpayment = %total_underpayment,
        "fair: distributing over underpaid contributors"
    );

    underpaid
        .into_iter()
        .map(|(address, gap)| -> Result<Receipt, HarvestError> {
            let amount = harvest_amount.scale(Ratio::of(gap, total_underpayment)?)?;
            Ok(Receipt::new(address.clone(), amount))
        })
        .collect()
}
