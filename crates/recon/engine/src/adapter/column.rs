use std::fmt;
use std::sync::Arc;

use recon_types::{
    CollectionFlag, DateTimeFlag, DefaultFlags, LocalZone, NumericFlag, ReconcileError,
    StringFlag, Value, NULL_DISPLAY,
};
use tracing::debug;

use super::record::{DestinationRows, RecordSource, RowRef};
use crate::collection::{list_repr, CollectionMapping};
use crate::mapping::Validate;
use crate::scalar::{DateTimeMapping, EquatableMapping, LongMapping, NumericMapping, StringMapping};

/// One column of one record source.
#[derive(Clone)]
pub struct ColumnRef {
    source: Arc<dyn RecordSource>,
    column: String,
}

impl ColumnRef {
    pub fn new(source: Arc<dyn RecordSource>, column: impl Into<String>) -> Self {
        Self {
            source,
            column: column.into(),
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    /// `<qualified source name>.<column>`
    pub fn identifier(&self) -> String {
        format!("{}.{}", self.source.qualified_name(), self.column)
    }

    fn values(&self) -> impl Iterator<Item = Option<Value>> + '_ {
        (0..self.source.row_count()).map(|row| self.source.value(row, &self.column))
    }
}

impl fmt::Debug for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ColumnRef").field(&self.identifier()).finish()
    }
}

/// What one side of a [`ColumnMapping`] reads from.
#[derive(Clone, Debug)]
pub enum Side {
    /// Every row of every listed column, in order.
    Columns(Vec<ColumnRef>),
    /// A fixed list of values.
    Literal(Vec<Option<Value>>),
    /// A null side: a null collection, or a null scalar.
    Null,
}

impl Side {
    pub fn column(source: Arc<dyn RecordSource>, column: impl Into<String>) -> Self {
        Self::Columns(vec![ColumnRef::new(source, column)])
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(vec![Some(value.into())])
    }

    pub fn literals(values: impl IntoIterator<Item = Option<Value>>) -> Self {
        Self::Literal(values.into_iter().collect())
    }

    fn repr(&self) -> String {
        match self {
            Self::Columns(refs) => refs
                .iter()
                .map(ColumnRef::identifier)
                .collect::<Vec<_>>()
                .join(", "),
            Self::Literal(values) => list_repr(Some(values.as_slice())),
            Self::Null => NULL_DISPLAY.to_string(),
        }
    }

    fn check(&self, label: &'static str) -> Result<(), ReconcileError> {
        if let Self::Columns(refs) = self {
            if refs.is_empty() {
                return Err(ReconcileError::MissingInput(format!(
                    "{} side names no columns",
                    label
                )));
            }
            if let Some(missing) = refs.iter().find(|r| !r.source.has_column(&r.column)) {
                return Err(ReconcileError::UnknownColumn {
                    source_name: missing.source.qualified_name().to_string(),
                    column: missing.column.clone(),
                });
            }
        }
        Ok(())
    }

    fn values(&self) -> Option<Vec<Option<Value>>> {
        match self {
            Self::Columns(refs) => Some(refs.iter().flat_map(ColumnRef::values).collect()),
            Self::Literal(values) => Some(values.clone()),
            Self::Null => None,
        }
    }

    /// Zero values read as null; more than one is an error.
    fn scalar(&self, label: &'static str) -> Result<Option<Value>, ReconcileError> {
        let Some(mut values) = self.values() else {
            return Ok(None);
        };
        match values.len() {
            0 => Ok(None),
            1 => Ok(values.pop().flatten()),
            count => Err(ReconcileError::AmbiguousScalar { side: label, count }),
        }
    }

    fn rows(&self) -> Option<DestinationRows> {
        let Self::Columns(refs) = self else {
            return None;
        };
        let rows = refs
            .iter()
            .flat_map(|r| {
                let source = r.source.qualified_name().to_string();
                (0..r.source.row_count()).map(move |row| RowRef {
                    source: source.clone(),
                    row,
                })
            })
            .collect();
        let mut columns: Vec<&str> = Vec::new();
        for r in refs {
            if !columns.contains(&r.column.as_str()) {
                columns.push(&r.column);
            }
        }
        Some(DestinationRows {
            rows,
            column: columns.join(","),
        })
    }
}

/// Builder that projects record-source cells into a mapping of any family.
#[derive(Clone, Debug)]
pub struct ColumnMapping {
    source: Side,
    destination: Side,
    name: Option<String>,
}

impl ColumnMapping {
    pub fn new(source: Side, destination: Side) -> Self {
        Self {
            source,
            destination,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The explicit name, or `<source repr> -> <destination repr>`.
    pub fn name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            format!("{} -> {}", self.source.repr(), self.destination.repr())
        })
    }

    fn check(&self) -> Result<(), ReconcileError> {
        self.source.check("source")?;
        self.destination.check("destination")
    }

    fn scalars(&self) -> Result<(Option<Value>, Option<Value>), ReconcileError> {
        self.check()?;
        Ok((
            self.source.scalar("source")?,
            self.destination.scalar("destination")?,
        ))
    }

    pub fn collection(
        &self,
        flags: impl IntoIterator<Item = CollectionFlag>,
        defaults: &DefaultFlags,
    ) -> Result<CollectionMapping<Value>, ReconcileError> {
        self.check()?;
        let mut mapping = CollectionMapping::configured(
            self.source.values(),
            self.destination.values(),
            flags,
            defaults,
        )?
        .with_name(self.name());
        if let Some(rows) = self.destination.rows() {
            mapping = mapping.with_destination_rows(rows);
        }
        debug!(
            mapping = %mapping.name(),
            flags = %mapping.flags(),
            rows = mapping.destination_rows().map_or(0, |r| r.rows.len()),
            "Projected collection mapping"
        );
        Ok(mapping)
    }

    pub fn equatable(&self) -> Result<EquatableMapping<Value>, ReconcileError> {
        let (source, destination) = self.scalars()?;
        Ok(projected(
            EquatableMapping::new(source, destination).with_name(self.name()),
        ))
    }

    pub fn numeric(
        &self,
        flags: impl IntoIterator<Item = NumericFlag>,
        defaults: &DefaultFlags,
    ) -> Result<NumericMapping, ReconcileError> {
        let (source, destination) = self.scalars()?;
        let mapping = NumericMapping::configured(
            Value::expect_decimal(source.as_ref())?,
            Value::expect_decimal(destination.as_ref())?,
            flags,
            defaults,
        )?;
        Ok(projected(mapping.with_name(self.name())))
    }

    pub fn long(&self) -> Result<LongMapping, ReconcileError> {
        let (source, destination) = self.scalars()?;
        Ok(projected(
            LongMapping::new(
                Value::expect_long(source.as_ref())?,
                Value::expect_long(destination.as_ref())?,
            )
            .with_name(self.name()),
        ))
    }

    pub fn string(
        &self,
        flags: impl IntoIterator<Item = StringFlag>,
        defaults: &DefaultFlags,
    ) -> Result<StringMapping, ReconcileError> {
        let (source, destination) = self.scalars()?;
        let mapping = StringMapping::configured(
            Value::expect_text(source.as_ref())?,
            Value::expect_text(destination.as_ref())?,
            flags,
            defaults,
        )?;
        Ok(projected(mapping.with_name(self.name())))
    }

    pub fn date_time(
        &self,
        flags: impl IntoIterator<Item = DateTimeFlag>,
        zone: LocalZone,
        defaults: &DefaultFlags,
    ) -> Result<DateTimeMapping, ReconcileError> {
        let (source, destination) = self.scalars()?;
        let mapping = DateTimeMapping::configured(
            Value::expect_timestamp(source.as_ref())?,
            Value::expect_timestamp(destination.as_ref())?,
            flags,
            zone,
            defaults,
        )?;
        Ok(projected(mapping.with_name(self.name())))
    }
}

fn projected<M: Validate>(mapping: M) -> M {
    debug!(mapping = %mapping.name(), kind = %mapping.kind(), "Projected mapping");
    mapping
}
