//! Consolidation pass.
//!
//! Collection mappings that share a destination identity are merged into one
//! before validation, so a destination checked from several sources reports
//! once against the union of those sources.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use recon_types::ReconcileError;
use tracing::{debug, info};

use crate::adapter::DestinationRows;
use crate::collection::CollectionMapping;
use crate::mapping::Validate;

/// Destination identity two mappings must share to be merged.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConsolidationKey<T> {
    /// The destination was read from these rows of this column.
    Rows(DestinationRows),
    /// The destination has no row identity; its values are the identity.
    Values(Option<Vec<Option<T>>>),
}

impl<T> ConsolidationKey<T>
where
    T: Clone + Eq + Hash + fmt::Display + Send + Sync + 'static,
{
    pub fn of(mapping: &CollectionMapping<T>) -> Self {
        match mapping.destination_rows() {
            Some(rows) if !rows.is_empty() && !rows.column.is_empty() => Self::Rows(rows.clone()),
            _ => Self::Values(mapping.destination().map(<[Option<T>]>::to_vec)),
        }
    }
}

/// Merge mappings with the same [`ConsolidationKey`].
///
/// The first mapping seen for a key survives and absorbs the sources of every
/// later one; names are joined with `" & "`. Sources are unioned as sets, so
/// a value repeated across merged sources counts once. Survivors keep
/// first-occurrence order. An empty batch is rejected.
pub fn consolidate<T>(
    mappings: Vec<CollectionMapping<T>>,
) -> Result<Vec<CollectionMapping<T>>, ReconcileError>
where
    T: Clone + Eq + Hash + fmt::Display + Send + Sync + 'static,
{
    if mappings.is_empty() {
        return Err(ReconcileError::EmptyBatch);
    }

    let incoming = mappings.len();
    let mut survivors: Vec<CollectionMapping<T>> = Vec::with_capacity(incoming);
    let mut by_key: HashMap<ConsolidationKey<T>, usize> = HashMap::new();

    for mapping in mappings {
        let key = ConsolidationKey::of(&mapping);
        match by_key.get(&key) {
            Some(&slot) => {
                debug!(
                    into = %survivors[slot].name(),
                    merged = %mapping.name(),
                    "Consolidating mapping"
                );
                survivors[slot].absorb(mapping);
            }
            None => {
                by_key.insert(key, survivors.len());
                survivors.push(mapping);
            }
        }
    }

    info!(
        incoming,
        surviving = survivors.len(),
        "Consolidation complete"
    );
    Ok(survivors)
}
