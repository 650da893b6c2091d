use std::fmt;
use std::hash::Hash;

use recon_types::{
    CollectionFlag, DateTimeFlag, NumericFlag, ReconcileConfig, ReconcileError, StringFlag,
    Timestamp,
};
use rust_decimal::Decimal;
use tracing::info;

use crate::adapter::ColumnMapping;
use crate::collection::CollectionMapping;
use crate::mapping::Validate;
use crate::report::{self, ReconciliationReport};
use crate::scalar::{DateTimeMapping, EquatableMapping, LongMapping, NumericMapping, StringMapping};
use crate::{consolidate, Value};

/// A validated [`ReconcileConfig`] plus factories that thread its default
/// flags and local zone into every mapping.
#[derive(Debug, Clone, Default)]
pub struct ReconcileContext {
    config: ReconcileConfig,
}

impl ReconcileContext {
    pub fn new(config: ReconcileConfig) -> Result<Self, ReconcileError> {
        config.validate()?;
        info!(
            zone = ?config.local_zone,
            numeric = %config.defaults.numeric,
            collection = %config.defaults.collection,
            date_time = %config.defaults.date_time,
            string = %config.defaults.string,
            "Reconcile context ready"
        );
        Ok(Self { config })
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    pub fn numeric(
        &self,
        source: Option<Decimal>,
        destination: Option<Decimal>,
        flags: impl IntoIterator<Item = NumericFlag>,
    ) -> Result<NumericMapping, ReconcileError> {
        NumericMapping::configured(source, destination, flags, &self.config.defaults)
    }

    pub fn long(&self, source: Option<i64>, destination: Option<i64>) -> LongMapping {
        LongMapping::new(source, destination)
    }

    pub fn equatable<T>(&self, source: Option<T>, destination: Option<T>) -> EquatableMapping<T>
    where
        T: PartialEq + fmt::Display + Send + Sync + 'static,
    {
        EquatableMapping::new(source, destination)
    }

    pub fn string(
        &self,
        source: Option<impl Into<String>>,
        destination: Option<impl Into<String>>,
        flags: impl IntoIterator<Item = StringFlag>,
    ) -> Result<StringMapping, ReconcileError> {
        StringMapping::configured(source, destination, flags, &self.config.defaults)
    }

    pub fn date_time(
        &self,
        source: Option<impl Into<Timestamp>>,
        destination: Option<impl Into<Timestamp>>,
        flags: impl IntoIterator<Item = DateTimeFlag>,
    ) -> Result<DateTimeMapping, ReconcileError> {
        DateTimeMapping::configured(
            source,
            destination,
            flags,
            self.config.local_zone,
            &self.config.defaults,
        )
    }

    pub fn collection<T>(
        &self,
        source: Option<Vec<Option<T>>>,
        destination: Option<Vec<Option<T>>>,
        flags: impl IntoIterator<Item = CollectionFlag>,
    ) -> Result<CollectionMapping<T>, ReconcileError>
    where
        T: Clone + Eq + Hash + fmt::Display + Send + Sync + 'static,
    {
        CollectionMapping::configured(source, destination, flags, &self.config.defaults)
    }

    pub fn project_collection(
        &self,
        columns: &ColumnMapping,
        flags: impl IntoIterator<Item = CollectionFlag>,
    ) -> Result<CollectionMapping<Value>, ReconcileError> {
        columns.collection(flags, &self.config.defaults)
    }

    pub fn project_numeric(
        &self,
        columns: &ColumnMapping,
        flags: impl IntoIterator<Item = NumericFlag>,
    ) -> Result<NumericMapping, ReconcileError> {
        columns.numeric(flags, &self.config.defaults)
    }

    pub fn project_string(
        &self,
        columns: &ColumnMapping,
        flags: impl IntoIterator<Item = StringFlag>,
    ) -> Result<StringMapping, ReconcileError> {
        columns.string(flags, &self.config.defaults)
    }

    pub fn project_date_time(
        &self,
        columns: &ColumnMapping,
        flags: impl IntoIterator<Item = DateTimeFlag>,
    ) -> Result<DateTimeMapping, ReconcileError> {
        columns.date_time(flags, self.config.local_zone, &self.config.defaults)
    }

    pub fn consolidate<T>(
        &self,
        mappings: Vec<CollectionMapping<T>>,
    ) -> Result<Vec<CollectionMapping<T>>, ReconcileError>
    where
        T: Clone + Eq + Hash + fmt::Display + Send + Sync + 'static,
    {
        consolidate::consolidate(mappings)
    }

    pub fn validate_all<I, V>(&self, mappings: I) -> ReconciliationReport
    where
        I: IntoIterator<Item = V>,
        V: Validate,
    {
        report::validate_all(mappings)
    }
}
