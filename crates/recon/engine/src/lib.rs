#![deny(unsafe_code)]
//! # recon-engine
//!
//! Source-to-destination data reconciliation.
//!
//! Every comparison is a mapping: one source, one destination, a flag set and
//! an optional equivalence oracle. `validate()` yields `None` on a match and a
//! fixed-format diff otherwise; mismatches are data, never errors.
//!
//! ## Key Types
//!
//! - [`NumericMapping`] / [`LongMapping`] / [`EquatableMapping`] /
//!   [`StringMapping`] / [`DateTimeMapping`] — scalar validators
//! - [`CollectionMapping`] — greedy multiset, ordered, and containment matching
//! - [`ColumnMapping`] / [`RecordSource`] / [`Table`] — projection of tabular cells
//! - [`consolidate()`] — merges collection mappings sharing a destination
//! - [`validate_all`] / [`ReconciliationReport`] — batch validation
//! - [`ReconcileContext`] — configuration-aware factories

pub mod adapter;
pub mod collection;
pub mod consolidate;
pub mod context;
pub mod mapping;
pub mod message;
pub mod oracle;
pub mod report;
pub mod scalar;

pub use adapter::{ColumnMapping, ColumnRef, DestinationRows, RecordSource, RowRef, Side, Table};
pub use collection::{CollectionMapping, EntryDiff};
pub use consolidate::{consolidate, ConsolidationKey};
pub use context::ReconcileContext;
pub use mapping::{Mapping, MappingKind, Validate};
pub use oracle::{
    DateTimeTolerance, DecimalScale, DecimalTolerance, EquivalenceOracle, SharedOracle,
};
pub use report::{validate_all, ReconcileFailure, ReconciliationReport, ReportEntry};
pub use scalar::{DateTimeMapping, EquatableMapping, LongMapping, NumericMapping, StringMapping};

pub use recon_types::{
    CollectionFlag, DateTimeFlag, DefaultFlags, LocalZone, NumericFlag, ReconcileConfig,
    ReconcileError, StringFlag, Timestamp, Value,
};
