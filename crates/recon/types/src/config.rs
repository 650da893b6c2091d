//! Configuration for reconciliation runs.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::datetime::LocalZone;
use crate::error::ReconcileError;
use crate::flags::{CollectionFlag, DateTimeFlag, FlagSet, NumericFlag, StringFlag};

/// Flags applied to every mapping of a family, on top of its per-call flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultFlags {
    #[serde(default)]
    pub numeric: FlagSet<NumericFlag>,
    #[serde(default)]
    pub collection: FlagSet<CollectionFlag>,
    #[serde(default)]
    pub date_time: FlagSet<DateTimeFlag>,
    #[serde(default)]
    pub string: FlagSet<StringFlag>,
}

impl DefaultFlags {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_numeric(mut self, flag: NumericFlag) -> Self {
        self.numeric = self.numeric.with(flag);
        self
    }

    pub fn with_collection(mut self, flag: CollectionFlag) -> Self {
        self.collection = self.collection.with(flag);
        self
    }

    pub fn with_date_time(mut self, flag: DateTimeFlag) -> Self {
        self.date_time = self.date_time.with(flag);
        self
    }

    pub fn with_string(mut self, flag: StringFlag) -> Self {
        self.string = self.string.with(flag);
        self
    }

    /// Reject default sets that could never produce a valid mapping.
    pub fn validate(&self) -> Result<(), ReconcileError> {
        self.numeric.validate()?;
        self.collection.validate()?;
        self.date_time.validate()?;
        self.string.validate()
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level, used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Top-level reconciliation configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Per-family default flags
    #[serde(default)]
    pub defaults: DefaultFlags,

    /// Zone that zoned timestamps resolve into
    #[serde(default)]
    pub local_zone: LocalZone,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ReconcileConfig {
    /// Tolerant settings for migrations where formatting drift is expected.
    pub fn lenient() -> Self {
        Self {
            defaults: DefaultFlags::none()
                .with_numeric(NumericFlag::IgnorePrecision)
                .with_collection(CollectionFlag::IgnoreDuplicates)
                .with_string(StringFlag::TrimSource)
                .with_string(StringFlag::TrimDestination)
                .with_string(StringFlag::IgnoreCase),
            ..Default::default()
        }
    }

    /// Settings for exact replicas: collections must also agree on order.
    pub fn strict() -> Self {
        Self {
            defaults: DefaultFlags::none().with_collection(CollectionFlag::OrderMatters),
            ..Default::default()
        }
    }

    pub fn with_local_zone(mut self, zone: LocalZone) -> Self {
        self.local_zone = zone;
        self
    }

    pub fn validate(&self) -> Result<(), ReconcileError> {
        self.defaults.validate()?;
        self.local_zone.validate()
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ReconcileError> {
        let config: Self = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(contents: &str) -> Result<Self, ReconcileError> {
        let config: Self = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file; `.json` files are read as JSON,
    /// anything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReconcileError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(&contents)?
        } else {
            Self::from_yaml_str(&contents)?
        };
        tracing::debug!(path = %path.display(), "Loaded reconciliation config");
        Ok(config)
    }
}
