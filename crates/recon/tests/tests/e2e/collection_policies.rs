//! E2E: collection matching disciplines and their diff output.

use recon_engine::{CollectionFlag, CollectionMapping, EntryDiff, ReconcileError, Validate};

fn ints(src: &[i64], dst: &[i64], flags: &[CollectionFlag]) -> CollectionMapping<i64> {
    CollectionMapping::of_values(src.to_vec(), dst.to_vec(), flags.iter().copied()).unwrap()
}

#[test]
fn exact_multiset_equality() {
    assert_eq!(ints(&[1, 2, 3], &[3, 2, 1], &[]).validate(), None);
    assert_eq!(
        ints(&[1, 2, 2], &[1, 2], &[]).validate().unwrap(),
        "Source entry not found in Destination: 2"
    );
}

#[test]
fn ordered_pairwise_equality() {
    let diff = ints(&[1, 2, 3], &[3, 2, 1], &[CollectionFlag::OrderMatters])
        .validate()
        .unwrap();
    assert_eq!(
        diff,
        "\tSource      [0] : 1\n\tDestination [0] : 3\n\tSource      [2] : 3\n\tDestination [2] : 1"
    );
}

#[test]
fn containment_in_both_directions() {
    let superset_source = [CollectionFlag::SourceContainsDestination];
    assert_eq!(ints(&[1, 2, 3], &[1, 2], &superset_source).validate(), None);
    assert_eq!(
        ints(&[1, 2, 3], &[1, 2, 4], &superset_source).validate().unwrap(),
        "Destination entry not found in Source: 4"
    );

    let superset_destination = [CollectionFlag::DestinationContainsSource];
    assert_eq!(ints(&[3], &[1, 2, 3], &superset_destination).validate(), None);
    assert!(ints(&[3, 3], &[1, 2, 3], &superset_destination)
        .validate()
        .is_some());
}

#[test]
fn duplicates_and_nulls_policies_compose() {
    let m = CollectionMapping::new(
        Some(vec![Some(1), None, Some(1), Some(2)]),
        Some(vec![Some(2), Some(1), None, None]),
        [CollectionFlag::IgnoreDuplicates, CollectionFlag::IgnoreNulls],
    )
    .unwrap();
    assert_eq!(m.validate(), None);

    // Deduplication alone keeps a single null on each side.
    let m = CollectionMapping::new(
        Some(vec![Some(1), None, None]),
        Some(vec![None, Some(1)]),
        [CollectionFlag::IgnoreDuplicates],
    )
    .unwrap();
    assert_eq!(m.validate(), None);
}

#[test]
fn conflicting_containment_is_a_construction_error() {
    let err = CollectionMapping::<i64>::new(
        None,
        None,
        [
            CollectionFlag::DestinationContainsSource,
            CollectionFlag::SourceContainsDestination,
        ],
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ReconcileError::ConflictingFlags {
            family: "collection",
            ..
        }
    ));
}

#[test]
fn oracle_with_duplicates_keeps_the_verdict() {
    // Every entry is equivalent to every other, so any pairing is valid.
    let m = ints(&[1, 2, 3], &[4, 5, 6], &[]).with_oracle_fn(|_, _| true);
    assert_eq!(m.validate(), None);

    let m = ints(&[1, 2, 3], &[4, 5], &[]).with_oracle_fn(|_, _| true);
    assert_eq!(m.diffs().len(), 1);
    assert!(matches!(m.diffs()[0], EntryDiff::MissingFromDestination(Some(_))));
}

#[test]
fn diffs_are_structured_and_serializable() {
    let m = ints(&[1, 9], &[1, 8], &[]);
    let diffs = m.diffs();
    assert_eq!(
        diffs,
        vec![
            EntryDiff::MissingFromDestination(Some(9)),
            EntryDiff::MissingFromSource(Some(8)),
        ]
    );
    let json = serde_json::to_string(&diffs).unwrap();
    assert!(json.contains("MissingFromDestination"));
}
