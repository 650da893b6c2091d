use std::collections::BTreeMap;
use std::path::Path;

use recon_types::{ReconcileError, Value};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A tabular source of typed cells.
///
/// Implementations must be safe to share between threads; reading a cell
/// never mutates the source.
pub trait RecordSource: Send + Sync {
    /// Name used when rendering column identifiers, e.g. `ledger.orders`.
    fn qualified_name(&self) -> &str;

    fn has_column(&self, column: &str) -> bool;

    fn row_count(&self) -> usize;

    /// The cell at `row`/`column`. `None` is a null cell.
    fn value(&self, row: usize, column: &str) -> Option<Value>;
}

/// Identity of a single row of a named source.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowRef {
    pub source: String,
    pub row: usize,
}

/// The destination rows (and column) a collection's destination values were
/// read from. Consolidation groups mappings by this identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DestinationRows {
    pub rows: Vec<RowRef>,
    pub column: String,
}

impl DestinationRows {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// In-memory [`RecordSource`].
///
/// Loads from JSON of the form
/// `{"name": "...", "columns": [...], "rows": [{"col": {"kind": "long", "value": 1}}]}`.
/// A column absent from a row, or mapped to `null`, reads as a null cell.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    name: String,
    #[serde(default)]
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<BTreeMap<String, Option<Value>>>,
}

impl Table {
    pub fn new<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; cells for unknown columns widen the column list.
    pub fn with_row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = (S, Option<Value>)>,
        S: Into<String>,
    {
        let row: BTreeMap<String, Option<Value>> =
            cells.into_iter().map(|(k, v)| (k.into(), v)).collect();
        for column in row.keys() {
            if !self.columns.contains(column) {
                self.columns.push(column.clone());
            }
        }
        self.rows.push(row);
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn from_json_str(contents: &str) -> Result<Self, ReconcileError> {
        let mut table: Table = serde_json::from_str(contents)?;
        // Columns seen only in rows still count as declared.
        let mut extra = Vec::new();
        for row in &table.rows {
            for column in row.keys() {
                if !table.columns.contains(column) && !extra.contains(column) {
                    extra.push(column.clone());
                }
            }
        }
        table.columns.extend(extra);
        debug!(table = %table.name, rows = table.rows.len(), "Loaded table");
        Ok(table)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReconcileError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }
}

impl RecordSource for Table {
    fn qualified_name(&self) -> &str {
        &self.name
    }

    fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn value(&self, row: usize, column: &str) -> Option<Value> {
        self.rows.get(row)?.get(column)?.clone()
    }
}
