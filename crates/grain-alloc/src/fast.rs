//! FAST policy: proportional split of one interval's cred.

use grain_core::{Address, Grain, HarvestError, Ratio, Receipt};
use indexmap::IndexMap;
use tracing::debug;

use crate::cred::total_cred;

/// Split `harvest_amount` across `cred` in proportion to each score.
///
/// Every address in `cred` gets a receipt, including zero-score addresses
/// (which receive zero), in the map's iteration order. Receipts are rounded
/// individually, so their sum may differ from `harvest_amount` by a small
/// residual; nothing redistributes it.
///
/// Returns no receipts when the scores sum to zero.
pub fn compute_fast_receipts(
    harvest_amount: Grain,
    cred: &IndexMap<Address, f64>,
) -> Result<Vec<Receipt>, HarvestError> {
    if harvest_amount.is_negative() {
        return Err(HarvestError::InvalidAmount(harvest_amount));
    }

    let total = total_cred(cred)?;
    if total == 0.0 {
        debug!(addresses = cred.len(), "fast: zero total cred, nothing to allocate");
        return Ok(Vec::new());
    }

    cred.iter()
        .map(|(address, &score)| -> Result<Receipt, HarvestError> {
            let amount = harvest_amount.scale(Ratio::new(score / total)?)?;
            Ok(Receipt::new(address.clone(), amount))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use grain_core::GrainError;
    use proptest::prelude::*;

    fn cred(entries: &[(&str, f64)]) -> IndexMap<Address, f64> {
        entries.iter().map(|&(a, c)| (Address::from(a), c)).collect()
    }

    fn amounts(receipts: &[Receipt]) -> Vec<(&str, Grain)> {
        receipts.iter().map(|r| (r.address.as_str(), r.amount)).collect()
    }

    #[test]
    fn equal_cred_splits_exactly_in_half() {
        let receipts = compute_fast_receipts(Grain::ONE, &cred(&[("foo", 1.0), ("bar", 1.0)])).unwrap();
        let half = Grain::from_raw(Grain::ONE.raw() / 2);
        assert_eq!(amounts(&receipts), vec![("foo", half), ("bar", half)]);
    }

    #[test]
    fn proportional_split() {
        let receipts = compute_fast_receipts(
            Grain::from_integer(8),
            &cred(&[("a", 3.0), ("b", 1.0)]),
        )
        .unwrap();
        assert_eq!(
            amounts(&receipts),
            vec![("a", Grain::from_integer(6)), ("b", Grain::from_integer(2))]
        );
    }

    #[test]
    fn zero_cred_address_gets_zero_receipt() {
        let receipts = compute_fast_receipts(Grain::ONE, &cred(&[("foo", 2.0), ("bar", 0.0)])).unwrap();
        assert_eq!(amounts(&receipts), vec![("foo", Grain::ONE), ("bar", Grain::ZERO)]);
    }

    #[test]
    fn zero_total_cred_gives_no_receipts() {
        assert!(compute_fast_receipts(Grain::ONE, &cred(&[("foo", 0.0)])).unwrap().is_empty());
        assert!(compute_fast_receipts(Grain::ONE, &IndexMap::new()).unwrap().is_empty());
    }

    #[test]
    fn zero_amount_gives_zero_receipts() {
        let receipts = compute_fast_receipts(Grain::ZERO, &cred(&[("foo", 1.0)])).unwrap();
        assert_eq!(amounts(&receipts), vec![("foo", Grain::ZERO)]);
    }

    #[test]
    fn negative_amount_is_rejected() {
        let amount = Grain::from_integer(-1);
        assert_eq!(
            compute_fast_receipts(amount, &cred(&[("foo", 1.0)])),
            Err(HarvestError::InvalidAmount(amount))
        );
    }

    #[test]
    fn non_finite_cred_is_rejected() {
        assert!(matches!(
            compute_fast_receipts(Grain::ONE, &cred(&[("foo", f64::NAN), ("bar", 1.0)])),
            Err(HarvestError::Grain(GrainError::InvalidNumber(_)))
        ));
    }

    #[test]
    fn cred_sum_overflowing_to_infinity_is_rejected() {
        assert!(matches!(
            compute_fast_receipts(Grain::ONE, &cred(&[("foo", 1.0e308), ("bar", 1.0e308)])),
            Err(HarvestError::Grain(GrainError::InvalidNumber(_)))
        ));
    }

    #[test]
    fn tiny_and_huge_cred_split_like_unit_cred() {
        for scale in [1.0e-20, 1.0e18] {
            let receipts = compute_fast_receipts(
                Grain::from_integer(8),
                &cred(&[("a", 3.0 * scale), ("b", 1.0 * scale)]),
            )
            .unwrap();
            let got: Vec<i128> = receipts.iter().map(|r| r.amount.raw()).collect();
            assert!((got[0] - Grain::from_integer(6).raw()).abs() < 1_000_000, "scale {scale}");
            assert!((got[1] - Grain::from_integer(2).raw()).abs() < 1_000_000, "scale {scale}");
        }
    }

    #[test]
    fn preserves_cred_order() {
        let receipts = compute_fast_receipts(
            Grain::ONE,
            &cred(&[("zed", 1.0), ("alpha", 1.0), ("mid", 1.0)]),
        )
        .unwrap();
        let order: Vec<&str> = receipts.iter().map(|r| r.address.as_str()).collect();
        assert_eq!(order, vec!["zed", "alpha", "mid"]);
    }

    // --- proptest ---

    fn arb_cred() -> impl Strategy<Value = IndexMap<Address, f64>> {
        prop::collection::vec((0u8..32, 0.0f64..1_000.0), 1..20).prop_map(|entries| {
            entries
                .into_iter()
                .map(|(i, c)| (Address::new(format!("c{i}")), c))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn receipts_are_non_negative_and_cover_every_address(
            raw in 0i128..1_000_000_000_000_000_000_000_000i128,
            cred in arb_cred(),
        ) {
            let receipts = compute_fast_receipts(Grain::from_raw(raw), &cred).unwrap();
            if total_cred(&cred).unwrap() > 0.0 {
                prop_assert_eq!(receipts.len(), cred.len());
            }
            for r in &receipts {
                prop_assert!(!r.amount.is_negative());
            }
        }

        #[test]
        fn receipts_sum_close_to_amount(
            raw in 0i128..1_000_000_000_000_000_000_000_000i128,
            cred in arb_cred(),
        ) {
            prop_assume!(total_cred(&cred).unwrap() > 0.0);
            let receipts = compute_fast_receipts(Grain::from_raw(raw), &cred).unwrap();
            let total = Grain::checked_sum(receipts.iter().map(|r| r.amount)).unwrap();
            let n = receipts.len() as i128;
            // Half a unit of rounding per receipt plus the float error of
            // the ratios themselves.
            let tolerance = n + (raw >> 52) * (n + 2);
            prop_assert!((total.raw() - raw).abs() <= tolerance);
        }

        #[test]
        fn deterministic(raw in 0i128..1_000_000_000_000_000_000i128, cred in arb_cred()) {
            let a = compute_fast_receipts(Grain::from_raw(raw), &cred).unwrap();
            let b = compute_fast_receipts(Grain::from_raw(raw), &cred).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
