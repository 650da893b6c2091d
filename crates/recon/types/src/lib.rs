#![deny(unsafe_code)]
//! # recon-types
//!
//! Shared primitives for the reconciliation engine.
//!
//! ## Key Types
//!
//! - [`Flag`] / [`FlagSet`] — per-family policy toggles with construction-time
//!   conflict checks
//! - [`Value`] / [`Timestamp`] — typed scalars handed over by record sources
//! - [`DateTimeValue`] / [`LocalZone`] — zone-free (date, time) pairs
//! - [`ReconcileConfig`] / [`DefaultFlags`] — explicit default-flag configuration
//! - [`ReconcileError`] — construction and configuration failures

pub mod config;
pub mod datetime;
pub mod error;
pub mod flags;
pub mod value;

pub use config::{DefaultFlags, LoggingConfig, ReconcileConfig};
pub use datetime::{DateTimeValue, LocalZone};
pub use error::{ErrorKind, ReconcileError};
pub use flags::{CollectionFlag, DateTimeFlag, Flag, FlagSet, NumericFlag, StringFlag};
pub use value::{display_list, display_opt, Timestamp, Value, NULL_DISPLAY};
