//! E2E: every scalar family through the common mapping interface.

use chrono::{FixedOffset, TimeZone};
use recon_engine::{
    DateTimeFlag, DateTimeMapping, DateTimeTolerance, EquatableMapping, LocalZone, LongMapping,
    Mapping, MappingKind, NumericFlag, NumericMapping, StringFlag, StringMapping, Timestamp,
    Validate,
};
use recon_tests::{at, dec};

#[test]
fn numeric_scale_policy() {
    let exact = NumericMapping::new(Some(dec("1.50")), Some(dec("1.5")), []).unwrap();
    let relaxed = NumericMapping::new(
        Some(dec("1.50")),
        Some(dec("1.5")),
        [NumericFlag::IgnorePrecision],
    )
    .unwrap();
    assert_eq!(
        exact.validate().unwrap(),
        "Source does not Equal Destination!\n\tSource      : 1.50\n\tDestination : 1.5"
    );
    assert_eq!(relaxed.validate(), None);
}

#[test]
fn string_transforms_end_to_end() {
    let plain = StringMapping::new(Some(" Foo "), Some("foo"), []).unwrap();
    assert!(plain.validate().is_some());

    let relaxed = StringMapping::new(
        Some(" Foo "),
        Some("foo"),
        [
            StringFlag::TrimSource,
            StringFlag::TrimDestination,
            StringFlag::IgnoreCase,
        ],
    )
    .unwrap();
    assert_eq!(relaxed.validate(), None);

    let escaped = StringMapping::new(
        Some("Q&A <b>"),
        Some("Q&amp;A <b>"),
        [StringFlag::XmlEscapeSource, StringFlag::XmlEscapeDestination],
    )
    .unwrap();
    assert_eq!(escaped.validate(), None);
}

#[test]
fn zoned_and_local_timestamps_agree() {
    let zoned = FixedOffset::west_opt(5 * 3600)
        .unwrap()
        .with_ymd_and_hms(2024, 1, 31, 22, 0, 0)
        .unwrap();
    // 22:00 at -05:00 is the next day in UTC.
    let m = DateTimeMapping::new(Some(zoned), Some(at(2024, 2, 1, 3, 0)), [], LocalZone::utc())
        .unwrap();
    assert_eq!(m.validate(), None);

    let date_only = DateTimeMapping::new(
        Some(zoned),
        Some(at(2024, 2, 1, 12, 0)),
        [DateTimeFlag::IgnoreTime],
        LocalZone::utc(),
    )
    .unwrap();
    assert_eq!(date_only.validate(), None);
}

#[test]
fn tolerance_oracle_replaces_exact_comparison() {
    let m = DateTimeMapping::new(
        Some(at(2024, 2, 1, 3, 0)),
        Some(at(2024, 2, 1, 3, 1)),
        [],
        LocalZone::utc(),
    )
    .unwrap();
    assert!(m.validate().is_some());

    let m = m.with_oracle(DateTimeTolerance::new(
        chrono::Duration::minutes(2),
        LocalZone::utc(),
    ));
    assert_eq!(m.validate(), None);
}

#[test]
fn heterogeneous_batch_reports_per_family() {
    let batch: Vec<Mapping> = vec![
        NumericMapping::new(Some(dec("2")), Some(dec("2.0")), [])
            .unwrap()
            .into(),
        LongMapping::new(Some(7), Some(7)).into(),
        EquatableMapping::new(Some(recon_engine::Value::Bool(true)), None).into(),
        DateTimeMapping::new(
            None::<Timestamp>,
            None::<Timestamp>,
            [DateTimeFlag::IgnoreDate],
            LocalZone::utc(),
        )
        .unwrap()
        .into(),
    ];
    let report = recon_engine::validate_all(&batch);
    assert_eq!(report.checked, 4);
    let kinds: Vec<MappingKind> = report.entries.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![MappingKind::Numeric, MappingKind::Equatable]);
    assert!(report.entries[1].diff.contains("(NULL)"));
}
