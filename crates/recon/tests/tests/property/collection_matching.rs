//! Property tests: greedy collection matching agrees with multiset semantics.

use std::collections::HashMap;

use proptest::prelude::*;
use recon_engine::{CollectionFlag, CollectionMapping, ConsolidationKey, Validate};

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

/// Small value domain so duplicates are common.
fn arb_values() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..6, 0..12)
}

fn arb_nullable() -> impl Strategy<Value = Vec<Option<u8>>> {
    prop::collection::vec(prop::option::of(0u8..4), 0..10)
}

fn counts(values: &[u8]) -> HashMap<u8, usize> {
    let mut counts = HashMap::new();
    for v in values {
        *counts.entry(*v).or_insert(0) += 1;
    }
    counts
}

fn is_submultiset(small: &[u8], large: &[u8]) -> bool {
    let large = counts(large);
    counts(small)
        .iter()
        .all(|(v, n)| large.get(v).copied().unwrap_or(0) >= *n)
}

fn mapping(src: &[u8], dst: &[u8], flags: &[CollectionFlag]) -> CollectionMapping<u8> {
    CollectionMapping::of_values(src.to_vec(), dst.to_vec(), flags.iter().copied()).unwrap()
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Any permutation of a collection matches it when order does not matter.
    #[test]
    fn permutations_match(values in arb_values(), seed in any::<u64>()) {
        let mut shuffled = values.clone();
        // Deterministic rotation plus reversal stands in for a shuffle.
        if !shuffled.is_empty() {
            let k = (seed as usize) % shuffled.len();
            shuffled.rotate_left(k);
        }
        shuffled.reverse();
        prop_assert_eq!(mapping(&values, &shuffled, &[]).validate(), None);
    }

    /// Without flags the verdict is multiset equality.
    #[test]
    fn verdict_is_multiset_equality(src in arb_values(), dst in arb_values()) {
        let equal = counts(&src) == counts(&dst);
        prop_assert_eq!(mapping(&src, &dst, &[]).is_match(), equal);
    }

    /// Containment flags are sub-multiset checks in the stated direction.
    #[test]
    fn containment_is_submultiset(src in arb_values(), dst in arb_values()) {
        prop_assert_eq!(
            mapping(&src, &dst, &[CollectionFlag::SourceContainsDestination]).is_match(),
            is_submultiset(&dst, &src)
        );
        prop_assert_eq!(
            mapping(&src, &dst, &[CollectionFlag::DestinationContainsSource]).is_match(),
            is_submultiset(&src, &dst)
        );
    }

    /// Ignoring duplicates reduces the verdict to set equality.
    #[test]
    fn ignore_duplicates_is_set_equality(src in arb_values(), dst in arb_values()) {
        let set = |v: &[u8]| v.iter().copied().collect::<std::collections::BTreeSet<_>>();
        prop_assert_eq!(
            mapping(&src, &dst, &[CollectionFlag::IgnoreDuplicates]).is_match(),
            set(&src) == set(&dst)
        );
    }

    /// Ordered comparison matches exactly when the sequences are equal.
    #[test]
    fn ordered_is_sequence_equality(src in arb_values(), dst in arb_values()) {
        prop_assert_eq!(
            mapping(&src, &dst, &[CollectionFlag::OrderMatters]).is_match(),
            src == dst
        );
    }

    /// Ignoring nulls is the same as filtering them out up front.
    #[test]
    fn ignore_nulls_equals_prefiltering(src in arb_nullable(), dst in arb_nullable()) {
        let with_flag = CollectionMapping::new(
            Some(src.clone()),
            Some(dst.clone()),
            [CollectionFlag::IgnoreNulls],
        )
        .unwrap();
        let strip = |v: &[Option<u8>]| v.iter().flatten().copied().collect::<Vec<_>>();
        prop_assert_eq!(
            with_flag.is_match(),
            mapping(&strip(&src), &strip(&dst), &[]).is_match()
        );
    }

    /// Validation never mutates and is repeatable.
    #[test]
    fn validation_is_idempotent(src in arb_nullable(), dst in arb_nullable()) {
        let m = CollectionMapping::new(
            Some(src.clone()),
            Some(dst),
            [CollectionFlag::IgnoreDuplicates],
        )
        .unwrap();
        let first = m.validate();
        prop_assert_eq!(m.validate(), first);
        prop_assert_eq!(m.source(), Some(src.as_slice()));
    }

    /// The number of reported diffs equals the unmatched multiset remainder.
    #[test]
    fn diff_count_is_symmetric_difference(src in arb_values(), dst in arb_values()) {
        let (s, d) = (counts(&src), counts(&dst));
        let mut expected = 0;
        for v in 0u8..6 {
            let (a, b) = (
                s.get(&v).copied().unwrap_or(0),
                d.get(&v).copied().unwrap_or(0),
            );
            expected += a.abs_diff(b);
        }
        prop_assert_eq!(mapping(&src, &dst, &[]).diffs().len(), expected);
    }

    /// Mappings with equal destinations share a consolidation key.
    #[test]
    fn equal_destinations_share_a_key(a in arb_values(), b in arb_values(), dst in arb_values()) {
        let left = mapping(&a, &dst, &[]);
        let right = mapping(&b, &dst, &[]);
        prop_assert_eq!(ConsolidationKey::of(&left), ConsolidationKey::of(&right));
    }
}
