//! Caller-supplied equivalence overriding default equality.
//!
//! An oracle sees the raw values handed to the mapping: nulls are passed
//! through as `None`, and no flag-driven transform (trim, case folding,
//! precision) has been applied yet.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{Duration, NaiveDateTime};
use recon_types::{DateTimeValue, LocalZone, Timestamp};
use rust_decimal::Decimal;

/// Decides whether a source value is equivalent to a destination value.
pub trait EquivalenceOracle<T: ?Sized>: Send + Sync {
    fn equivalent(&self, source: Option<&T>, destination: Option<&T>) -> bool;
}

/// Oracle shared between clones of a mapping.
pub type SharedOracle<T> = Arc<dyn EquivalenceOracle<T>>;

/// Adapts a closure into an [`EquivalenceOracle`].
pub struct FnOracle<T: ?Sized, F> {
    f: F,
    _marker: PhantomData<fn(&T)>,
}

impl<T: ?Sized, F> EquivalenceOracle<T> for FnOracle<T, F>
where
    F: Fn(Option<&T>, Option<&T>) -> bool + Send + Sync,
{
    fn equivalent(&self, source: Option<&T>, destination: Option<&T>) -> bool {
        (self.f)(source, destination)
    }
}

impl<T: ?Sized, F> fmt::Debug for FnOracle<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnOracle")
    }
}

pub fn from_fn<T: ?Sized, F>(f: F) -> FnOracle<T, F>
where
    F: Fn(Option<&T>, Option<&T>) -> bool + Send + Sync,
{
    FnOracle {
        f,
        _marker: PhantomData,
    }
}

/// Treats decimals within an absolute tolerance as equal. Two nulls are
/// equal; a null never equals a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecimalTolerance {
    pub tolerance: Decimal,
}

impl DecimalTolerance {
    pub fn new(tolerance: Decimal) -> Self {
        Self {
            tolerance: tolerance.abs(),
        }
    }
}

impl EquivalenceOracle<Decimal> for DecimalTolerance {
    fn equivalent(&self, source: Option<&Decimal>, destination: Option<&Decimal>) -> bool {
        match (source, destination) {
            (None, None) => true,
            // A difference too large to represent is beyond any tolerance.
            (Some(s), Some(d)) => s
                .checked_sub(*d)
                .is_some_and(|diff| diff.abs() <= self.tolerance),
            _ => false,
        }
    }
}

/// Decimals are equal only with the same value and the same scale, so
/// `1.50` and `1.5` differ. `Decimal`'s own `Eq` ignores scale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecimalScale;

impl EquivalenceOracle<Decimal> for DecimalScale {
    fn equivalent(&self, source: Option<&Decimal>, destination: Option<&Decimal>) -> bool {
        match (source, destination) {
            (None, None) => true,
            (Some(s), Some(d)) => s == d && s.scale() == d.scale(),
            _ => false,
        }
    }
}

/// Treats timestamps at most `max_skew` apart (after resolving both into
/// `zone`) as equal. Date-only or time-only inputs compare exactly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateTimeTolerance {
    pub max_skew: Duration,
    pub zone: LocalZone,
}

impl DateTimeTolerance {
    pub fn new(max_skew: Duration, zone: LocalZone) -> Self {
        Self { max_skew, zone }
    }

    fn local(&self, ts: &Timestamp) -> Option<DateTimeValue> {
        DateTimeValue::from_timestamp(ts, &self.zone).ok()
    }
}

impl EquivalenceOracle<Timestamp> for DateTimeTolerance {
    fn equivalent(&self, source: Option<&Timestamp>, destination: Option<&Timestamp>) -> bool {
        let (s, d) = match (source, destination) {
            (None, None) => return true,
            (Some(s), Some(d)) => (s, d),
            _ => return false,
        };
        match (self.local(s), self.local(d)) {
            (Some(s), Some(d)) => match (combine(&s), combine(&d)) {
                (Some(s), Some(d)) => (s - d).abs() <= self.max_skew,
                _ => s == d,
            },
            _ => false,
        }
    }
}

fn combine(value: &DateTimeValue) -> Option<NaiveDateTime> {
    Some(value.date?.and_time(value.time?))
}
