use serde::{Deserialize, Serialize};

/// Broad classification of a [`ReconcileError`].
///
/// Mismatches between source and destination are never errors; they are
/// reported as diff strings. Everything that does surface as an error is a
/// caller mistake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// A mapping or batch was built with invalid arguments.
    InvalidArgument,
    /// Configuration could not be read or parsed.
    Configuration,
}

/// Errors raised while constructing mappings or loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("conflicting {family} flags: {first} and {second} cannot be combined")]
    ConflictingFlags {
        family: &'static str,
        first: String,
        second: String,
    },
    #[error("missing required input: {0}")]
    MissingInput(String),
    #[error("consolidation requires at least one mapping")]
    EmptyBatch,
    #[error("unknown column '{column}' in {source_name}")]
    UnknownColumn { source_name: String, column: String },
    #[error("value kind mismatch: expected {expected}, found {found}")]
    ValueKindMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("{side} side projects {count} values where exactly one was expected")]
    AmbiguousScalar { side: &'static str, count: usize },
    #[error("invalid zone offset: {0} seconds")]
    InvalidZoneOffset(i32),
    #[error("configuration error: {0}")]
    Config(String),
}

impl ReconcileError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Configuration,
            _ => ErrorKind::InvalidArgument,
        }
    }
}

impl From<serde_json::Error> for ReconcileError {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<serde_yaml::Error> for ReconcileError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<std::io::Error> for ReconcileError {
    fn from(e: std::io::Error) -> Self {
        Self::Config(e.to_string())
    }
}
