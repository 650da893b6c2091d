//! E2E: tabular sources projected into mappings, consolidated, and reported.

use recon_engine::{
    consolidate, validate_all, CollectionFlag, ColumnMapping, ColumnRef, DefaultFlags, Mapping,
    ReconcileError, Side, StringFlag, Table, Validate, Value,
};
use recon_tests::{column_table, dec, legacy_customers, long, migrated_customers, shared, text};

#[test]
fn migrated_ids_reconcile_regardless_of_order() {
    let ids = ColumnMapping::new(
        Side::column(legacy_customers(), "id"),
        Side::column(migrated_customers(), "id"),
    );
    assert_eq!(ids.name(), "legacy.customers.id -> crm.customers.id");

    let unordered = ids.collection([], &DefaultFlags::none()).unwrap();
    assert_eq!(unordered.validate(), None);

    let ordered = ids
        .collection([CollectionFlag::OrderMatters], &DefaultFlags::none())
        .unwrap();
    assert!(ordered.validate().is_some());
}

#[test]
fn balances_keep_their_scale_in_collections() {
    let balances = ColumnMapping::new(
        Side::column(legacy_customers(), "balance"),
        Side::column(migrated_customers(), "balance"),
    )
    .collection([], &DefaultFlags::none())
    .unwrap();
    // Rescaled decimals do not pair up; the null balances still match.
    assert_eq!(
        balances.validate().unwrap(),
        "Source entry not found in Destination: 100.50\n\
         Source entry not found in Destination: 0.00\n\
         Destination entry not found in Source: 100.5\n\
         Destination entry not found in Source: 0"
    );

    let by_value = balances.with_oracle_fn(|s: Option<&Value>, d: Option<&Value>| {
        s.and_then(Value::as_decimal) == d.and_then(Value::as_decimal)
    });
    assert_eq!(by_value.validate(), None);
}

#[test]
fn rescaled_balances_are_not_duplicates() {
    let m = ColumnMapping::new(
        Side::literals([
            Some(Value::Decimal(dec("1.50"))),
            Some(Value::Decimal(dec("1.5"))),
        ]),
        Side::literals([
            Some(Value::Decimal(dec("1.5"))),
            Some(Value::Decimal(dec("1.50"))),
        ]),
    )
    .collection([CollectionFlag::IgnoreDuplicates], &DefaultFlags::none())
    .unwrap();
    assert_eq!(m.validate(), None);
}

#[test]
fn names_need_string_rules_per_row() {
    let row = |source: &str| {
        ColumnMapping::new(Side::literal(source), Side::literal(source.trim().to_lowercase()))
    };
    let flags = [
        StringFlag::NormalizeSource,
        StringFlag::NormalizeDestination,
        StringFlag::IgnoreCase,
    ];
    for name in [" Ada Lovelace ", "Alan  Turing", "Grace Hopper"] {
        let m = row(name).string(flags, &DefaultFlags::none()).unwrap();
        assert_eq!(m.validate(), None, "{}", m.name());
    }
}

#[test]
fn loaded_tables_reconcile() {
    let source = Table::from_json_str(
        r#"{"name": "export.a", "rows": [
            {"code": {"kind": "text", "value": "X"}},
            {"code": {"kind": "text", "value": "Y"}}
        ]}"#,
    )
    .unwrap();
    let destination = Table::from_json_str(
        r#"{"name": "export.b", "columns": ["code"], "rows": [
            {"code": {"kind": "text", "value": "Y"}}
        ]}"#,
    )
    .unwrap();
    let m = ColumnMapping::new(
        Side::column(shared(source), "code"),
        Side::column(shared(destination), "code"),
    )
    .collection([], &DefaultFlags::none())
    .unwrap();
    assert_eq!(
        m.validate().unwrap(),
        "Source entry not found in Destination: X"
    );
}

#[test]
fn sources_sharing_a_destination_consolidate() {
    let warehouse = column_table("warehouse.stock", "sku", &[text("A"), text("B")]);
    let a = ColumnMapping::new(
        Side::column(column_table("shop.a", "sku", &[text("A")]), "sku"),
        Side::column(warehouse.clone(), "sku"),
    )
    .collection([], &DefaultFlags::none())
    .unwrap();
    let b = ColumnMapping::new(
        Side::column(column_table("shop.b", "sku", &[text("B")]), "sku"),
        Side::column(warehouse, "sku"),
    )
    .collection([], &DefaultFlags::none())
    .unwrap();

    // Separately, each source misses the other's entry.
    assert!(a.validate().is_some());
    assert!(b.validate().is_some());

    let merged = consolidate(vec![a, b]).unwrap();
    assert_eq!(merged.len(), 1);
    assert_eq!(
        merged[0].name(),
        "shop.a.sku -> warehouse.stock.sku & shop.b.sku -> warehouse.stock.sku"
    );
    assert_eq!(merged[0].source(), Some([text("A"), text("B")].as_slice()));

    let report = validate_all(merged.into_iter().map(Mapping::from));
    assert!(report.is_clean());
    assert!(report.into_result().is_ok());
}

#[test]
fn different_destination_columns_do_not_merge() {
    let stock = shared(
        Table::new("warehouse.stock", ["sku", "alt"])
            .with_row([("sku", text("A")), ("alt", text("A"))]),
    );
    let a = ColumnMapping::new(Side::literal("A"), Side::column(stock.clone(), "sku"))
        .collection([], &DefaultFlags::none())
        .unwrap();
    let b = ColumnMapping::new(Side::literal("A"), Side::column(stock, "alt"))
        .collection([], &DefaultFlags::none())
        .unwrap();
    assert_eq!(consolidate(vec![a, b]).unwrap().len(), 2);
}

#[test]
fn multi_column_sides_flatten_in_order() {
    let m = ColumnMapping::new(
        Side::Columns(vec![
            ColumnRef::new(legacy_customers(), "id"),
            ColumnRef::new(column_table("legacy.extra", "id", &[long(4)]), "id"),
        ]),
        Side::literals([1, 2, 3, 4].map(|v| Some(Value::Long(v)))),
    );
    assert_eq!(m.name(), "legacy.customers.id, legacy.extra.id -> UNKNOWN");
    let ordered = m
        .collection([CollectionFlag::OrderMatters], &DefaultFlags::none())
        .unwrap();
    assert_eq!(ordered.validate(), None);
}

#[test]
fn failing_batch_becomes_an_error_on_request() {
    let m = ColumnMapping::new(
        Side::column(legacy_customers(), "name"),
        Side::column(migrated_customers(), "name"),
    )
    .collection([], &DefaultFlags::none())
    .unwrap();
    let failure = validate_all([Mapping::from(m)]).into_result().unwrap_err();
    assert_eq!(failure.report.checked, 1);
    assert_eq!(failure.report.entries.len(), 1);
    assert_eq!(failure.report.entries[0].diff.lines().count(), 6);
}

#[test]
fn scalar_projection_errors_are_invalid_arguments() {
    let err = ColumnMapping::new(
        Side::column(legacy_customers(), "balance"),
        Side::literal(recon_tests::dec("1")),
    )
    .numeric([], &DefaultFlags::none())
    .unwrap_err();
    assert!(matches!(err, ReconcileError::AmbiguousScalar { count: 3, .. }));
    assert_eq!(err.kind(), recon_types::ErrorKind::InvalidArgument);
}

#[derive(Clone, Default)]
struct LogBuffer(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn projection_logs_use_the_column_name() {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let columns = ColumnMapping::new(
            Side::column(legacy_customers(), "id"),
            Side::column(migrated_customers(), "id"),
        );
        columns.collection([], &DefaultFlags::none()).unwrap();
    });

    let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
    assert!(logs.contains("Projected collection mapping"), "{}", logs);
    assert!(
        logs.contains("legacy.customers.id -> crm.customers.id"),
        "{}",
        logs
    );
    assert!(!logs.contains("UNKNOWN"), "{}", logs);
}
