use std::fmt;

use recon_types::{
    DateTimeFlag, DateTimeValue, DefaultFlags, FlagSet, LocalZone, ReconcileError, Timestamp,
};

use super::{Precheck, ScalarCore};
use crate::mapping::{MappingKind, Validate};
use crate::message;
use crate::oracle::{self, EquivalenceOracle};

/// Compares two timestamp-like values by their local date and time parts.
///
/// Zoned inputs are resolved into the mapping's [`LocalZone`] when the mapping
/// is built; zone-less inputs are taken as already local. Date and time parts
/// are compared independently and either can be suppressed, not both.
#[derive(Clone)]
pub struct DateTimeMapping {
    core: ScalarCore<Timestamp>,
    flags: FlagSet<DateTimeFlag>,
    local: (Option<DateTimeValue>, Option<DateTimeValue>),
}

impl DateTimeMapping {
    pub fn new(
        source: Option<impl Into<Timestamp>>,
        destination: Option<impl Into<Timestamp>>,
        flags: impl IntoIterator<Item = DateTimeFlag>,
        zone: LocalZone,
    ) -> Result<Self, ReconcileError> {
        Self::configured(source, destination, flags, zone, &DefaultFlags::none())
    }

    pub fn configured(
        source: Option<impl Into<Timestamp>>,
        destination: Option<impl Into<Timestamp>>,
        flags: impl IntoIterator<Item = DateTimeFlag>,
        zone: LocalZone,
        defaults: &DefaultFlags,
    ) -> Result<Self, ReconcileError> {
        let flags = FlagSet::resolve(flags, &defaults.date_time)?;
        zone.validate()?;
        let core = ScalarCore::new(source.map(Into::into), destination.map(Into::into));
        let local = (
            core.source
                .as_ref()
                .map(|ts| DateTimeValue::from_timestamp(ts, &zone))
                .transpose()?,
            core.destination
                .as_ref()
                .map(|ts| DateTimeValue::from_timestamp(ts, &zone))
                .transpose()?,
        );
        Ok(Self { core, flags, local })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.core.name = name.into();
        self
    }

    pub fn with_oracle(mut self, oracle: impl EquivalenceOracle<Timestamp> + 'static) -> Self {
        self.core.set_oracle(oracle);
        self
    }

    pub fn with_oracle_fn<F>(self, f: F) -> Self
    where
        F: Fn(Option<&Timestamp>, Option<&Timestamp>) -> bool + Send + Sync + 'static,
    {
        self.with_oracle(oracle::from_fn(f))
    }

    pub fn flags(&self) -> &FlagSet<DateTimeFlag> {
        &self.flags
    }

    /// Local (date, time) of the source, if present.
    pub fn source_local(&self) -> Option<&DateTimeValue> {
        self.local.0.as_ref()
    }

    pub fn destination_local(&self) -> Option<&DateTimeValue> {
        self.local.1.as_ref()
    }
}

impl Validate for DateTimeMapping {
    fn name(&self) -> &str {
        &self.core.name
    }

    fn kind(&self) -> MappingKind {
        MappingKind::DateTime
    }

    fn validate(&self) -> Option<String> {
        if let Precheck::Decided(equal) = self.core.precheck() {
            return if equal {
                None
            } else {
                Some(self.core.raw_mismatch())
            };
        }
        let (source, destination) = match &self.local {
            (Some(s), Some(d)) => (s, d),
            _ => return Some(self.core.raw_mismatch()),
        };
        let date_ok = self.flags.contains(DateTimeFlag::IgnoreDate) || source.same_date(destination);
        let time_ok = self.flags.contains(DateTimeFlag::IgnoreTime) || source.same_time(destination);
        if date_ok && time_ok {
            None
        } else {
            Some(message::mismatch(source, destination))
        }
    }
}

impl fmt::Debug for DateTimeMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateTimeMapping")
            .field("core", &self.core)
            .field("flags", &self.flags)
            .field("local", &self.local)
            .finish()
    }
}
