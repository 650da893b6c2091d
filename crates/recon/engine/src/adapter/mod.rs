//! Record-source adapter.
//!
//! Lifts cells of tabular sources (or literal values) into mappings. A
//! [`ColumnMapping`] names one or more columns, or a literal, per side and
//! projects them into a collection or a scalar of any family.

mod column;
mod record;

pub use column::{ColumnMapping, ColumnRef, Side};
pub use record::{DestinationRows, RecordSource, RowRef, Table};
