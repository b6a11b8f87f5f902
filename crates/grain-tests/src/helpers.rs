//! Shared builders for scenario tests.

use grain_core::{Address, CredTimeSlice, Earnings, Grain, Harvest};
use indexmap::IndexMap;

/// Address from a short name.
pub fn addr(name: &str) -> Address {
    Address::from(name)
}

/// A cred slice from `(name, score)` pairs, keeping their order.
pub fn slice(interval_end_ms: u64, entries: &[(&str, f64)]) -> CredTimeSlice {
    let cred: IndexMap<Address, f64> = entries.iter().map(|&(a, c)| (addr(a), c)).collect();
    CredTimeSlice::new(interval_end_ms, cred)
}

/// An earnings snapshot from `(name, whole grains)` pairs.
pub fn earnings(entries: &[(&str, i64)]) -> Earnings {
    entries
        .iter()
        .map(|&(a, g)| (addr(a), Grain::from_integer(g)))
        .collect()
}

/// Receipts as `(name, amount)` pairs, for compact assertions.
pub fn receipt_pairs(harvest: &Harvest) -> Vec<(String, Grain)> {
    harvest
        .receipts
        .iter()
        .map(|r| (r.address.to_string(), r.amount))
        .collect()
}

/// Absolute difference in raw units.
pub fn raw_diff(a: Grain, b: Grain) -> i128 {
    (a.raw() - b.raw()).abs()
}
