//! Baseline (MM) neutralization rule.
//!
//! A detected difference between the submitted (RTE) and staged (SM)
//! operations at a key is suppressed when production baseline already
//! matches the staged value and the submitted route did not flag a change at
//! that operation: the apparent diff is upstream noise, not a regression.

use crate::equality::operations_equal;
use crate::opkey::OpKey;
use crate::route::{Operation, Route};

/// Decide whether a detected difference at `key` should be neutralized.
///
/// True iff the RTE operation is not part of an approved change window, a
/// baseline route was supplied and contains `key`, and the SM operation
/// equals the baseline operation under record equality. The same shared key
/// is used for both the baseline membership test and the lookup.
pub fn should_neutralize(
    rte_op: &Operation,
    key: &OpKey,
    sm_op: &Operation,
    baseline: Option<&Route>,
) -> bool {
    if rte_op.part_of_change {
        return false;
    }
    let Some(mm) = baseline else {
        return false;
    };
    let Some(mm_op) = mm.get(key.as_str()) else {
        return false;
    };
    operations_equal(sm_op, mm_op)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::{CellScalar, RouteKind};

    fn op(value: &str, part_of_change: bool) -> Operation {
        Operation {
            rows: vec![vec![
                None,
                Some(CellScalar::Text("12.0000".to_string())),
                Some(CellScalar::Text(value.to_string())),
            ]],
            excluded: false,
            part_of_change,
        }
    }

    fn baseline_with(value: &str) -> Route {
        let mut route = Route::new("R1", "P1", RouteKind::MmBaseline);
        route.push(OpKey::parse("12").unwrap(), op(value, false));
        route
    }

    #[test]
    fn neutralizes_when_baseline_agrees_with_staged() {
        let key = OpKey::parse("12").unwrap();
        let rte = op("old", false);
        let sm = op("new", false);
        let mm = baseline_with("new");
        assert!(should_neutralize(&rte, &key, &sm, Some(&mm)));
    }

    #[test]
    fn change_window_blocks_neutralization() {
        let key = OpKey::parse("12").unwrap();
        let rte = op("old", true);
        let sm = op("new", false);
        let mm = baseline_with("new");
        assert!(!should_neutralize(&rte, &key, &sm, Some(&mm)));
    }

    #[test]
    fn missing_baseline_route_blocks_neutralization() {
        let key = OpKey::parse("12").unwrap();
        assert!(!should_neutralize(&op("old", false), &key, &op("new", false), None));
    }

    #[test]
    fn baseline_without_key_blocks_neutralization() {
        let key = OpKey::parse("99").unwrap();
        let mm = baseline_with("new");
        assert!(!should_neutralize(
            &op("old", false),
            &key,
            &op("new", false),
            Some(&mm)
        ));
    }

    #[test]
    fn baseline_disagreement_blocks_neutralization() {
        let key = OpKey::parse("12").unwrap();
        let mm = baseline_with("something else");
        assert!(!should_neutralize(
            &op("old", false),
            &key,
            &op("new", false),
            Some(&mm)
        ));
    }
}
