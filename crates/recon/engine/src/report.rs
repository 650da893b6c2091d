//! Batch validation.
//!
//! Mismatches stay data: a dirty report is still `Ok`. Callers that want a
//! failing run to be an error ask for it with [`ReconciliationReport::into_result`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::mapping::{MappingKind, Validate};

/// One mismatching mapping.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub name: String,
    pub kind: MappingKind,
    pub diff: String,
}

/// Outcome of validating a batch of mappings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    /// Number of mappings validated.
    pub checked: usize,
    /// Mismatches, in batch order.
    pub entries: Vec<ReportEntry>,
}

impl ReconciliationReport {
    pub fn is_clean(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn mismatches(&self) -> usize {
        self.entries.len()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// `Ok(self)` when clean, otherwise a [`ReconcileFailure`] carrying the report.
    pub fn into_result(self) -> Result<Self, ReconcileFailure> {
        if self.is_clean() {
            Ok(self)
        } else {
            Err(ReconcileFailure { report: self })
        }
    }
}

impl fmt::Display for ReconciliationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Reconciliation {} at {}: {} checked, {} mismatched",
            self.run_id,
            self.generated_at.to_rfc3339(),
            self.checked,
            self.entries.len()
        )?;
        for entry in &self.entries {
            writeln!(f, "[{}] {}", entry.kind, entry.name)?;
            for line in entry.diff.lines() {
                writeln!(f, "    {}", line)?;
            }
        }
        Ok(())
    }
}

/// A batch that did not reconcile.
#[derive(Debug, thiserror::Error)]
#[error("reconciliation failed: {} of {} mappings mismatched", .report.entries.len(), .report.checked)]
pub struct ReconcileFailure {
    pub report: ReconciliationReport,
}

/// Validate every mapping and collect the mismatches.
pub fn validate_all<I, V>(mappings: I) -> ReconciliationReport
where
    I: IntoIterator<Item = V>,
    V: Validate,
{
    let run_id = Uuid::new_v4();
    let mut checked = 0;
    let mut entries = Vec::new();

    for mapping in mappings {
        checked += 1;
        if let Some(diff) = mapping.validate() {
            warn!(%run_id, mapping = %mapping.name(), kind = %mapping.kind(), "Mapping mismatch");
            entries.push(ReportEntry {
                name: mapping.name().to_string(),
                kind: mapping.kind(),
                diff,
            });
        }
    }

    info!(%run_id, checked, mismatched = entries.len(), "Batch validated");
    ReconciliationReport {
        run_id,
        generated_at: Utc::now(),
        checked,
        entries,
    }
}
