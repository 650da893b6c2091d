//! Scalar validators, one per value family.
//!
//! All families share the same first stage: with an oracle the oracle alone
//! decides on the raw values; without one, nulls are resolved before any
//! typed comparison (both null matches, exactly one null mismatches).

mod datetime;
mod equatable;
mod numeric;
mod string;

pub use datetime::DateTimeMapping;
pub use equatable::{EquatableMapping, LongMapping};
pub use numeric::NumericMapping;
pub use string::StringMapping;

use std::fmt;
use std::sync::Arc;

use recon_types::display_opt;

use crate::message;
use crate::oracle::{EquivalenceOracle, SharedOracle};

/// Outcome of the null/oracle stage.
pub(crate) enum Precheck<'a, T> {
    Decided(bool),
    Compare(&'a T, &'a T),
}

/// Source, destination, name and oracle common to every scalar family.
#[derive(Clone)]
pub(crate) struct ScalarCore<T> {
    pub(crate) source: Option<T>,
    pub(crate) destination: Option<T>,
    pub(crate) name: String,
    pub(crate) oracle: Option<SharedOracle<T>>,
}

impl<T: fmt::Display + 'static> ScalarCore<T> {
    pub(crate) fn new(source: Option<T>, destination: Option<T>) -> Self {
        let name = message::scalar_name(
            display_opt(source.as_ref()),
            display_opt(destination.as_ref()),
        );
        Self {
            source,
            destination,
            name,
            oracle: None,
        }
    }

    pub(crate) fn set_oracle(&mut self, oracle: impl EquivalenceOracle<T> + 'static) {
        self.oracle = Some(Arc::new(oracle));
    }

    pub(crate) fn precheck(&self) -> Precheck<'_, T> {
        if let Some(oracle) = &self.oracle {
            return Precheck::Decided(
                oracle.equivalent(self.source.as_ref(), self.destination.as_ref()),
            );
        }
        match (&self.source, &self.destination) {
            (None, None) => Precheck::Decided(true),
            (Some(s), Some(d)) => Precheck::Compare(s, d),
            _ => Precheck::Decided(false),
        }
    }

    /// Run the shared stage, falling back to `compare` for two present values.
    pub(crate) fn verdict(&self, compare: impl FnOnce(&T, &T) -> bool) -> Option<String> {
        let equal = match self.precheck() {
            Precheck::Decided(equal) => equal,
            Precheck::Compare(s, d) => compare(s, d),
        };
        if equal {
            None
        } else {
            Some(self.raw_mismatch())
        }
    }

    pub(crate) fn raw_mismatch(&self) -> String {
        message::mismatch(
            display_opt(self.source.as_ref()),
            display_opt(self.destination.as_ref()),
        )
    }
}

impl<T: fmt::Debug> fmt::Debug for ScalarCore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarCore")
            .field("name", &self.name)
            .field("source", &self.source)
            .field("destination", &self.destination)
            .field("oracle", &self.oracle.is_some())
            .finish()
    }
}
