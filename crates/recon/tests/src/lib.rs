//! Shared fixtures for the reconciliation integration and property tests.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use recon_engine::{RecordSource, Table, Value};
use rust_decimal::Decimal;

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap_or_else(|e| panic!("bad decimal fixture {s}: {e}"))
}

pub fn text(s: &str) -> Option<Value> {
    Some(Value::Text(s.to_string()))
}

pub fn long(v: i64) -> Option<Value> {
    Some(Value::Long(v))
}

pub fn at(y: i32, m: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, mi, 0))
        .unwrap_or_else(|| panic!("bad timestamp fixture {y}-{m}-{d} {h}:{mi}"))
}

pub fn shared(table: Table) -> Arc<dyn RecordSource> {
    Arc::new(table)
}

/// Single-column table named `name` holding `values` in order.
pub fn column_table(name: &str, column: &str, values: &[Option<Value>]) -> Arc<dyn RecordSource> {
    let table = values.iter().fold(Table::new(name, [column]), |table, value| {
        table.with_row([(column, value.clone())])
    });
    shared(table)
}

/// Legacy customer ledger: id, name, balance.
pub fn legacy_customers() -> Arc<dyn RecordSource> {
    shared(
        Table::new("legacy.customers", ["id", "name", "balance"])
            .with_row([
                ("id", long(1)),
                ("name", text(" Ada Lovelace ")),
                ("balance", Some(Value::Decimal(dec("100.50")))),
            ])
            .with_row([
                ("id", long(2)),
                ("name", text("Alan  Turing")),
                ("balance", Some(Value::Decimal(dec("0.00")))),
            ])
            .with_row([
                ("id", long(3)),
                ("name", text("Grace Hopper")),
                ("balance", None),
            ]),
    )
}

/// The migrated customer table: same customers, reordered and reformatted.
pub fn migrated_customers() -> Arc<dyn RecordSource> {
    shared(
        Table::new("crm.customers", ["id", "name", "balance"])
            .with_row([
                ("id", long(3)),
                ("name", text("grace hopper")),
                ("balance", None),
            ])
            .with_row([
                ("id", long(1)),
                ("name", text("ada lovelace")),
                ("balance", Some(Value::Decimal(dec("100.5")))),
            ])
            .with_row([
                ("id", long(2)),
                ("name", text("alan turing")),
                ("balance", Some(Value::Decimal(dec("0")))),
            ]),
    )
}
