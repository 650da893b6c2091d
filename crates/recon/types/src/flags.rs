use std::collections::BTreeSet;
use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::error::ReconcileError;

/// A policy toggle belonging to one validator family.
///
/// Each family declares the pairs of flags that cannot be combined; the check
/// runs when a mapping is constructed, never during validation.
pub trait Flag: Copy + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Family name used in error messages.
    const FAMILY: &'static str;
    /// Mutually exclusive flag pairs.
    const EXCLUSIVE: &'static [(Self, Self)];

    fn as_str(&self) -> &'static str;
}

/// Flags for decimal comparisons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NumericFlag {
    /// Compare by value only: `1.50` equals `1.5`.
    IgnorePrecision,
}

impl Flag for NumericFlag {
    const FAMILY: &'static str = "numeric";
    const EXCLUSIVE: &'static [(Self, Self)] = &[];

    fn as_str(&self) -> &'static str {
        match self {
            Self::IgnorePrecision => "IGNORE_PRECISION",
        }
    }
}

/// Flags for collection reconciliation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollectionFlag {
    /// De-duplicate both sides before matching.
    IgnoreDuplicates,
    /// Drop null entries from both sides before matching.
    IgnoreNulls,
    /// Compare entries pairwise by position.
    OrderMatters,
    /// Every destination entry must appear in the source; extra source entries are fine.
    SourceContainsDestination,
    /// Every source entry must appear in the destination; extra destination entries are fine.
    DestinationContainsSource,
}

impl Flag for CollectionFlag {
    const FAMILY: &'static str = "collection";
    const EXCLUSIVE: &'static [(Self, Self)] =
        &[(Self::SourceContainsDestination, Self::DestinationContainsSource)];

    fn as_str(&self) -> &'static str {
        match self {
            Self::IgnoreDuplicates => "IGNORE_DUPLICATES",
            Self::IgnoreNulls => "IGNORE_NULLS",
            Self::OrderMatters => "ORDER_MATTERS",
            Self::SourceContainsDestination => "SOURCE_CONTAINS_DESTINATION",
            Self::DestinationContainsSource => "DESTINATION_CONTAINS_SOURCE",
        }
    }
}

/// Flags for date/time comparisons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DateTimeFlag {
    IgnoreDate,
    IgnoreTime,
}

impl Flag for DateTimeFlag {
    const FAMILY: &'static str = "date/time";
    const EXCLUSIVE: &'static [(Self, Self)] = &[(Self::IgnoreDate, Self::IgnoreTime)];

    fn as_str(&self) -> &'static str {
        match self {
            Self::IgnoreDate => "IGNORE_DATE",
            Self::IgnoreTime => "IGNORE_TIME",
        }
    }
}

/// Flags for string comparisons. Source and destination transforms are
/// applied independently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StringFlag {
    IgnoreCase,
    NormalizeSource,
    NormalizeDestination,
    TrimSource,
    TrimDestination,
    XmlEscapeSource,
    XmlEscapeDestination,
}

impl Flag for StringFlag {
    const FAMILY: &'static str = "string";
    const EXCLUSIVE: &'static [(Self, Self)] = &[];

    fn as_str(&self) -> &'static str {
        match self {
            Self::IgnoreCase => "IGNORE_CASE",
            Self::NormalizeSource => "NORMALIZE_SOURCE",
            Self::NormalizeDestination => "NORMALIZE_DESTINATION",
            Self::TrimSource => "TRIM_SOURCE",
            Self::TrimDestination => "TRIM_DESTINATION",
            Self::XmlEscapeSource => "XML_ESCAPE_SOURCE",
            Self::XmlEscapeDestination => "XML_ESCAPE_DESTINATION",
        }
    }
}

macro_rules! display_via_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_via_as_str!(NumericFlag, CollectionFlag, DateTimeFlag, StringFlag);

/// An ordered set of flags of one family.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagSet<F: Ord>(BTreeSet<F>);

impl<F: Ord> Default for FlagSet<F> {
    fn default() -> Self {
        Self(BTreeSet::new())
    }
}

impl<F: Flag> FlagSet<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, flag: F) -> bool {
        self.0.contains(&flag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = F> + '_ {
        self.0.iter().copied()
    }

    pub fn with(mut self, flag: F) -> Self {
        self.0.insert(flag);
        self
    }

    pub fn union(&self, other: &FlagSet<F>) -> FlagSet<F> {
        Self(self.0.union(&other.0).copied().collect())
    }

    /// Reject mutually exclusive combinations.
    pub fn validate(&self) -> Result<(), ReconcileError> {
        for (first, second) in F::EXCLUSIVE {
            if self.contains(*first) && self.contains(*second) {
                return Err(ReconcileError::ConflictingFlags {
                    family: F::FAMILY,
                    first: first.to_string(),
                    second: second.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Union per-call flags with the configured defaults and validate the result.
    pub fn resolve(
        per_call: impl IntoIterator<Item = F>,
        defaults: &FlagSet<F>,
    ) -> Result<FlagSet<F>, ReconcileError> {
        let resolved = per_call.into_iter().collect::<FlagSet<F>>().union(defaults);
        resolved.validate()?;
        Ok(resolved)
    }
}

impl<F: Flag> FromIterator<F> for FlagSet<F> {
    fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<F: Flag> fmt::Display for FlagSet<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(|flag| flag.as_str()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}
