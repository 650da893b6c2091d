//! The common mapping capability and a closed enum over value-typed families.

use std::fmt;

use recon_types::Value;
use serde::{Deserialize, Serialize};

use crate::collection::CollectionMapping;
use crate::scalar::{DateTimeMapping, EquatableMapping, LongMapping, NumericMapping, StringMapping};

/// The family a mapping belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingKind {
    Numeric,
    Equatable,
    String,
    DateTime,
    Collection,
}

impl MappingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Equatable => "equatable",
            Self::String => "string",
            Self::DateTime => "date_time",
            Self::Collection => "collection",
        }
    }
}

impl fmt::Display for MappingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that can be reconciled.
///
/// `validate` returns `None` when source and destination agree and a
/// human-readable diff otherwise. It must not mutate the mapping and must
/// return the same answer every time it is called.
pub trait Validate {
    fn name(&self) -> &str;

    fn kind(&self) -> MappingKind;

    fn validate(&self) -> Option<String>;

    fn is_match(&self) -> bool {
        self.validate().is_none()
    }
}

impl<V: Validate + ?Sized> Validate for &V {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn kind(&self) -> MappingKind {
        (**self).kind()
    }

    fn validate(&self) -> Option<String> {
        (**self).validate()
    }
}

impl<V: Validate + ?Sized> Validate for Box<V> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn kind(&self) -> MappingKind {
        (**self).kind()
    }

    fn validate(&self) -> Option<String> {
        (**self).validate()
    }
}

/// A mapping of any built-in family, for heterogeneous batches.
#[derive(Clone, Debug)]
pub enum Mapping {
    Numeric(NumericMapping),
    Long(LongMapping),
    Equatable(EquatableMapping<Value>),
    String(StringMapping),
    DateTime(DateTimeMapping),
    Collection(CollectionMapping<Value>),
}

impl Mapping {
    fn inner(&self) -> &dyn Validate {
        match self {
            Self::Numeric(m) => m,
            Self::Long(m) => m,
            Self::Equatable(m) => m,
            Self::String(m) => m,
            Self::DateTime(m) => m,
            Self::Collection(m) => m,
        }
    }
}

impl Validate for Mapping {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn kind(&self) -> MappingKind {
        self.inner().kind()
    }

    fn validate(&self) -> Option<String> {
        self.inner().validate()
    }
}

macro_rules! mapping_from {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Mapping {
                fn from(mapping: $ty) -> Self {
                    Self::$variant(mapping)
                }
            }
        )*
    };
}

mapping_from! {
    Numeric => NumericMapping,
    Long => LongMapping,
    Equatable => EquatableMapping<Value>,
    String => StringMapping,
    DateTime => DateTimeMapping,
    Collection => CollectionMapping<Value>,
}
