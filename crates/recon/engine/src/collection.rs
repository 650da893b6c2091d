//! Collection reconciliation.
//!
//! Decision tree, in order:
//!
//! 1. whole-collection null check
//! 2. `IGNORE_DUPLICATES` de-duplication (first occurrence wins), otherwise an
//!    ordered working copy
//! 3. `IGNORE_NULLS` stripping
//! 4. `ORDER_MATTERS`: pairwise by position, stopping once the contained side
//!    is exhausted
//! 5. otherwise a greedy multiset match in input order
//!
//! Working copies are vectors of borrowed entries with consumed markers; the
//! caller's collections are never touched.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use recon_types::{
    display_list, display_opt, CollectionFlag, DefaultFlags, FlagSet, ReconcileError,
};
use serde::{Deserialize, Serialize};

use crate::adapter::DestinationRows;
use crate::mapping::{MappingKind, Validate};
use crate::message;
use crate::oracle::{self, EquivalenceOracle, SharedOracle};

/// Repr used in default names for lists that cannot be named by a single value.
pub const UNKNOWN_REPR: &str = "UNKNOWN";

/// One discrepancy found while reconciling two collections.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryDiff<T> {
    /// Exactly one of the two collections is null. Holds the rendered lists.
    CollectionNull {
        source: String,
        destination: String,
    },
    /// Entries at the same position differ (ordered comparison).
    Position {
        index: usize,
        source: Option<T>,
        destination: Option<T>,
    },
    /// A source entry has no counterpart in the destination.
    MissingFromDestination(Option<T>),
    /// A destination entry has no counterpart in the source.
    MissingFromSource(Option<T>),
}

impl<T: fmt::Display> fmt::Display for EntryDiff<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CollectionNull {
                source,
                destination,
            } => f.write_str(&message::mismatch(source, destination)),
            Self::Position {
                index,
                source,
                destination,
            } => f.write_str(&message::position_mismatch(
                *index,
                display_opt(source.as_ref()),
                display_opt(destination.as_ref()),
            )),
            Self::MissingFromDestination(entry) => {
                f.write_str(&message::missing_from_destination(display_opt(entry.as_ref())))
            }
            Self::MissingFromSource(entry) => {
                f.write_str(&message::missing_from_source(display_opt(entry.as_ref())))
            }
        }
    }
}

/// Reconciles a source collection against a destination collection.
///
/// Entries pair up by `T`'s `Eq` unless an oracle is set. `rust_decimal`'s
/// `Eq` ignores scale: collect [`Value`](recon_types::Value) entries, or set
/// [`DecimalScale`](crate::oracle::DecimalScale), to keep `1.50` and `1.5`
/// apart. `IGNORE_DUPLICATES` always de-duplicates by `Eq`.
#[derive(Clone)]
pub struct CollectionMapping<T> {
    source: Option<Vec<Option<T>>>,
    destination: Option<Vec<Option<T>>>,
    destination_rows: Option<DestinationRows>,
    flags: FlagSet<CollectionFlag>,
    name: String,
    oracle: Option<SharedOracle<T>>,
}

impl<T> CollectionMapping<T>
where
    T: Clone + Eq + Hash + fmt::Display + Send + Sync + 'static,
{
    pub fn new(
        source: Option<Vec<Option<T>>>,
        destination: Option<Vec<Option<T>>>,
        flags: impl IntoIterator<Item = CollectionFlag>,
    ) -> Result<Self, ReconcileError> {
        Self::configured(source, destination, flags, &DefaultFlags::none())
    }

    pub fn configured(
        source: Option<Vec<Option<T>>>,
        destination: Option<Vec<Option<T>>>,
        flags: impl IntoIterator<Item = CollectionFlag>,
        defaults: &DefaultFlags,
    ) -> Result<Self, ReconcileError> {
        let flags = FlagSet::resolve(flags, &defaults.collection)?;
        let name = format!(
            "{} -> {}",
            list_repr(source.as_deref()),
            list_repr(destination.as_deref())
        );
        Ok(Self {
            source,
            destination,
            destination_rows: None,
            flags,
            name,
            oracle: None,
        })
    }

    /// Convenience constructor for collections without null entries.
    pub fn of_values(
        source: Vec<T>,
        destination: Vec<T>,
        flags: impl IntoIterator<Item = CollectionFlag>,
    ) -> Result<Self, ReconcileError> {
        Self::new(
            Some(source.into_iter().map(Some).collect()),
            Some(destination.into_iter().map(Some).collect()),
            flags,
        )
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_oracle(mut self, oracle: impl EquivalenceOracle<T> + 'static) -> Self {
        self.oracle = Some(Arc::new(oracle));
        self
    }

    pub fn with_oracle_fn<F>(self, f: F) -> Self
    where
        F: Fn(Option<&T>, Option<&T>) -> bool + Send + Sync + 'static,
    {
        self.with_oracle(oracle::from_fn(f))
    }

    /// Attach the destination rows the destination values were projected from.
    pub fn with_destination_rows(mut self, rows: DestinationRows) -> Self {
        self.destination_rows = Some(rows);
        self
    }

    pub fn flags(&self) -> &FlagSet<CollectionFlag> {
        &self.flags
    }

    pub fn source(&self) -> Option<&[Option<T>]> {
        self.source.as_deref()
    }

    pub fn destination(&self) -> Option<&[Option<T>]> {
        self.destination.as_deref()
    }

    pub fn destination_rows(&self) -> Option<&DestinationRows> {
        self.destination_rows.as_ref()
    }

    /// Union `other`'s source values into this mapping's sources and join the
    /// names. Values already present are not added twice, so multiplicity
    /// across sources is lost: `[X]` and `[X]` absorb into `[X]`, which only
    /// matches a destination `[X, X]` under `IGNORE_DUPLICATES`.
    pub(crate) fn absorb(&mut self, other: CollectionMapping<T>) {
        if let Some(incoming) = other.source {
            let sources = self.source.get_or_insert_with(Vec::new);
            for value in incoming {
                if !sources.contains(&value) {
                    sources.push(value);
                }
            }
        }
        self.name = format!("{} & {}", self.name, other.name);
    }

    /// All discrepancies, in the order they were found.
    pub fn diffs(&self) -> Vec<EntryDiff<T>> {
        let (source, destination) = match (&self.source, &self.destination) {
            (None, None) => return Vec::new(),
            (Some(s), Some(d)) => (s, d),
            (s, d) => {
                return vec![EntryDiff::CollectionNull {
                    source: render_list(s.as_deref()),
                    destination: render_list(d.as_deref()),
                }]
            }
        };

        let mut source = self.working_copy(source);
        let mut destination = self.working_copy(destination);
        if self.flags.contains(CollectionFlag::IgnoreNulls) {
            source.retain(Option::is_some);
            destination.retain(Option::is_some);
        }

        if self.flags.contains(CollectionFlag::OrderMatters) {
            self.ordered(&source, &destination)
        } else {
            self.unordered(&source, &destination)
        }
    }

    fn working_copy<'a>(&self, values: &'a [Option<T>]) -> Vec<Option<&'a T>> {
        if self.flags.contains(CollectionFlag::IgnoreDuplicates) {
            let mut seen = HashSet::new();
            values
                .iter()
                .map(Option::as_ref)
                .filter(|v| seen.insert(*v))
                .collect()
        } else {
            values.iter().map(Option::as_ref).collect()
        }
    }

    fn equal(&self, source: Option<&T>, destination: Option<&T>) -> bool {
        match &self.oracle {
            Some(oracle) => oracle.equivalent(source, destination),
            None => source == destination,
        }
    }

    fn ordered(&self, source: &[Option<&T>], destination: &[Option<&T>]) -> Vec<EntryDiff<T>> {
        let contained_len = if self.flags.contains(CollectionFlag::SourceContainsDestination) {
            Some(destination.len())
        } else if self.flags.contains(CollectionFlag::DestinationContainsSource) {
            Some(source.len())
        } else {
            None
        };

        let len = source.len().max(destination.len());
        let mut diffs = Vec::new();
        for index in 0..len {
            if contained_len.is_some_and(|limit| index >= limit) {
                break;
            }
            let s = source.get(index).copied().flatten();
            let d = destination.get(index).copied().flatten();
            if !self.equal(s, d) {
                diffs.push(EntryDiff::Position {
                    index,
                    source: s.cloned(),
                    destination: d.cloned(),
                });
            }
        }
        diffs
    }

    fn unordered(&self, source: &[Option<&T>], destination: &[Option<&T>]) -> Vec<EntryDiff<T>> {
        let mut source_used = vec![false; source.len()];
        let mut destination_used = vec![false; destination.len()];
        let mut diffs = Vec::new();

        // Every source entry must be found unless the source is the superset.
        if !self.flags.contains(CollectionFlag::SourceContainsDestination) {
            for (i, s) in source.iter().enumerate() {
                let hit = (0..destination.len())
                    .find(|&j| !destination_used[j] && self.equal(*s, destination[j]));
                match hit {
                    Some(j) => {
                        destination_used[j] = true;
                        source_used[i] = true;
                    }
                    None => diffs.push(EntryDiff::MissingFromDestination(s.cloned())),
                }
            }
        }

        // Unconsumed destination entries must be found unless the destination
        // is the superset.
        if !self.flags.contains(CollectionFlag::DestinationContainsSource) {
            for (j, d) in destination.iter().enumerate() {
                if destination_used[j] {
                    continue;
                }
                let hit =
                    (0..source.len()).find(|&i| !source_used[i] && self.equal(source[i], *d));
                match hit {
                    Some(i) => {
                        source_used[i] = true;
                        destination_used[j] = true;
                    }
                    None => diffs.push(EntryDiff::MissingFromSource(d.cloned())),
                }
            }
        }

        diffs
    }
}

impl<T> Validate for CollectionMapping<T>
where
    T: Clone + Eq + Hash + fmt::Display + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> MappingKind {
        MappingKind::Collection
    }

    fn validate(&self) -> Option<String> {
        let diffs = self.diffs();
        if diffs.is_empty() {
            return None;
        }
        let rendered: Vec<String> = diffs.iter().map(ToString::to_string).collect();
        Some(rendered.join("\n"))
    }
}

impl<T: fmt::Debug> fmt::Debug for CollectionMapping<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionMapping")
            .field("name", &self.name)
            .field("source", &self.source)
            .field("destination", &self.destination)
            .field("destination_rows", &self.destination_rows)
            .field("flags", &self.flags)
            .field("oracle", &self.oracle.is_some())
            .finish()
    }
}

fn render_list<T: fmt::Display>(values: Option<&[Option<T>]>) -> String {
    match values {
        Some(values) => display_list(values),
        None => display_opt::<T>(None),
    }
}

/// Name fragment for a literal list: the quoted value when there is exactly
/// one, `UNKNOWN` otherwise.
pub(crate) fn list_repr<T: fmt::Display>(values: Option<&[Option<T>]>) -> String {
    match values {
        Some([single]) => format!("'{}'", display_opt(single.as_ref())),
        Some(_) => UNKNOWN_REPR.to_string(),
        None => display_opt::<T>(None),
    }
}
