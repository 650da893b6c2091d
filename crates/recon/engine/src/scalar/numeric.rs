use std::fmt;

use recon_types::{DefaultFlags, FlagSet, NumericFlag, ReconcileError};
use rust_decimal::Decimal;

use super::ScalarCore;
use crate::mapping::{MappingKind, Validate};
use crate::oracle::{self, EquivalenceOracle};

/// Compares two decimals, by default including their scale.
///
/// `1.50` and `1.5` are different values unless [`NumericFlag::IgnorePrecision`]
/// is set. Comparison never goes through binary floating point.
#[derive(Clone)]
pub struct NumericMapping {
    core: ScalarCore<Decimal>,
    flags: FlagSet<NumericFlag>,
}

impl NumericMapping {
    pub fn new(
        source: Option<Decimal>,
        destination: Option<Decimal>,
        flags: impl IntoIterator<Item = NumericFlag>,
    ) -> Result<Self, ReconcileError> {
        Self::configured(source, destination, flags, &DefaultFlags::none())
    }

    pub fn configured(
        source: Option<Decimal>,
        destination: Option<Decimal>,
        flags: impl IntoIterator<Item = NumericFlag>,
        defaults: &DefaultFlags,
    ) -> Result<Self, ReconcileError> {
        let flags = FlagSet::resolve(flags, &defaults.numeric)?;
        let core = ScalarCore::new(source, destination);
        Ok(Self { core, flags })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.core.name = name.into();
        self
    }

    pub fn with_oracle(mut self, oracle: impl EquivalenceOracle<Decimal> + 'static) -> Self {
        self.core.set_oracle(oracle);
        self
    }

    pub fn with_oracle_fn<F>(self, f: F) -> Self
    where
        F: Fn(Option<&Decimal>, Option<&Decimal>) -> bool + Send + Sync + 'static,
    {
        self.with_oracle(oracle::from_fn(f))
    }

    pub fn flags(&self) -> &FlagSet<NumericFlag> {
        &self.flags
    }

    pub fn source(&self) -> Option<&Decimal> {
        self.core.source.as_ref()
    }

    pub fn destination(&self) -> Option<&Decimal> {
        self.core.destination.as_ref()
    }

    fn equal(&self, source: &Decimal, destination: &Decimal) -> bool {
        if self.flags.contains(NumericFlag::IgnorePrecision) {
            source == destination
        } else {
            source == destination && source.scale() == destination.scale()
        }
    }
}

impl Validate for NumericMapping {
    fn name(&self) -> &str {
        &self.core.name
    }

    fn kind(&self) -> MappingKind {
        MappingKind::Numeric
    }

    fn validate(&self) -> Option<String> {
        self.core.verdict(|s, d| self.equal(s, d))
    }
}

impl fmt::Debug for NumericMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumericMapping")
            .field("core", &self.core)
            .field("flags", &self.flags)
            .finish()
    }
}
