//! Built-in order-migration scenario.
//!
//! A legacy ledger and a returns log are reconciled against the migrated
//! warehouse table. The data carries the usual migration drift: rescaled
//! decimals, padded text, zoned vs. local timestamps, and one genuinely lost
//! order.

use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate, TimeZone};
use recon_engine::{
    CollectionFlag, CollectionMapping, ColumnMapping, Mapping, ReconcileContext, RecordSource,
    Side, StringFlag, Table, Value,
};
use recon_types::{ReconcileError, Timestamp};
use rust_decimal::Decimal;

fn sku(s: &str) -> Option<Value> {
    Some(Value::Text(s.to_string()))
}

pub fn ledger() -> Arc<dyn RecordSource> {
    Arc::new(
        Table::new("legacy.ledger", ["sku", "customer"])
            .with_row([("sku", sku("A-100")), ("customer", sku("  Acme  Corp "))])
            .with_row([("sku", sku("B-200")), ("customer", sku("Globex"))])
            .with_row([("sku", sku("C-300")), ("customer", sku("Initech"))]),
    )
}

pub fn returns() -> Arc<dyn RecordSource> {
    Arc::new(Table::new("legacy.returns", ["sku"]).with_row([("sku", sku("D-400"))]))
}

pub fn warehouse() -> Arc<dyn RecordSource> {
    Arc::new(
        Table::new("warehouse.orders", ["sku"])
            .with_row([("sku", sku("B-200"))])
            .with_row([("sku", sku("A-100"))])
            .with_row([("sku", sku("D-400"))]),
    )
}

/// Collection mappings that share a destination and are worth consolidating.
pub fn collections(ctx: &ReconcileContext) -> Result<Vec<CollectionMapping<Value>>, ReconcileError> {
    let destination = Side::column(warehouse(), "sku");
    Ok(vec![
        ctx.project_collection(
            &ColumnMapping::new(Side::column(ledger(), "sku"), destination.clone()),
            [],
        )?,
        ctx.project_collection(
            &ColumnMapping::new(Side::column(returns(), "sku"), destination),
            [],
        )?,
    ])
}

/// Scalar checks of a single migrated order.
pub fn scalars(ctx: &ReconcileContext) -> Result<Vec<Mapping>, ReconcileError> {
    let shipped_zoned = FixedOffset::east_opt(2 * 3600)
        .and_then(|tz| tz.with_ymd_and_hms(2024, 3, 1, 11, 30, 0).single())
        .ok_or_else(|| ReconcileError::MissingInput("shipped timestamp".into()))?;
    let shipped_local = NaiveDate::from_ymd_opt(2024, 3, 1)
        .and_then(|d| d.and_hms_opt(9, 30, 0))
        .ok_or_else(|| ReconcileError::MissingInput("shipped timestamp".into()))?;

    Ok(vec![
        ctx.numeric(Some(Decimal::new(1050, 2)), Some(Decimal::new(105, 1)), [])?
            .with_name("order A-100 total")
            .into(),
        ctx.long(Some(3), Some(3)).with_name("order A-100 quantity").into(),
        ctx.project_string(
            &ColumnMapping::new(Side::literal("  Acme  Corp "), Side::literal("ACME CORP")),
            [StringFlag::NormalizeSource],
        )?
        .into(),
        ctx.date_time(
            Some(Timestamp::from(shipped_zoned)),
            Some(Timestamp::from(shipped_local)),
            [],
        )?
        .with_name("order A-100 shipped at")
        .into(),
        ctx.collection(
            Some(vec![sku("gift-wrap"), None]),
            Some(vec![sku("gift-wrap")]),
            [CollectionFlag::IgnoreNulls],
        )?
        .with_name("order A-100 options")
        .into(),
    ])
}

/// Compare one column of two user-supplied tables.
pub fn tables(
    ctx: &ReconcileContext,
    source: Table,
    destination: Table,
    column: &str,
) -> Result<Vec<CollectionMapping<Value>>, ReconcileError> {
    let source: Arc<dyn RecordSource> = Arc::new(source);
    let destination: Arc<dyn RecordSource> = Arc::new(destination);
    Ok(vec![ctx.project_collection(
        &ColumnMapping::new(Side::column(source, column), Side::column(destination, column)),
        [],
    )?])
}
