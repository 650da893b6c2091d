use std::fmt;


use super::ScalarCore;
use crate::mapping::{MappingKind, Validate};
use crate::oracle::{self, EquivalenceOracle};

/// Compares any two values with structural equality. Carries no flags.
#[derive(Clone)]
pub struct EquatableMapping<T> {
    core: ScalarCore<T>,
}

/// Integer comparison is plain equality.
pub type LongMapping = EquatableMapping<i64>;

impl<T> EquatableMapping<T>
where
    T: PartialEq + fmt::Display + Send + Sync + 'static,
{
    pub fn new(source: Option<T>, destination: Option<T>) -> Self {
        let core = ScalarCore::new(source, destination);
        Self { core }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.core.name = name.into();
        self
    }

    pub fn with_oracle(mut self, oracle: impl EquivalenceOracle<T> + 'static) -> Self {
        self.core.set_oracle(oracle);
        self
    }

    pub fn with_oracle_fn<F>(self, f: F) -> Self
    where
        F: Fn(Option<&T>, Option<&T>) -> bool + Send + Sync + 'static,
    {
        self.with_oracle(oracle::from_fn(f))
    }

    pub fn source(&self) -> Option<&T> {
        self.core.source.as_ref()
    }

    pub fn destination(&self) -> Option<&T> {
        self.core.destination.as_ref()
    }
}

impl<T> Validate for EquatableMapping<T>
where
    T: PartialEq + fmt::Display + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.core.name
    }

    fn kind(&self) -> MappingKind {
        MappingKind::Equatable
    }

    fn validate(&self) -> Option<String> {
        self.core.verdict(|s, d| s == d)
    }
}

impl<T: fmt::Debug> fmt::Debug for EquatableMapping<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EquatableMapping")
            .field("core", &self.core)
            .finish()
    }
}
