use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ReconcileError;

/// Rendering of an absent value in diff messages.
pub const NULL_DISPLAY: &str = "(NULL)";

/// Render an optional value, using [`NULL_DISPLAY`] for `None`.
pub fn display_opt<T: fmt::Display + ?Sized>(value: Option<&T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => NULL_DISPLAY.to_string(),
    }
}

/// Render a list of optional values as `[a, b, (NULL)]`.
pub fn display_list<T: fmt::Display>(values: &[Option<T>]) -> String {
    let rendered: Vec<String> = values.iter().map(|v| display_opt(v.as_ref())).collect();
    format!("[{}]", rendered.join(", "))
}

/// Any timestamp-like input accepted by the date/time family.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Timestamp {
    /// An instant with an explicit offset.
    Zoned(DateTime<FixedOffset>),
    /// An instant in UTC.
    Utc(DateTime<Utc>),
    /// A zone-less date and time, treated as already local.
    Naive(NaiveDateTime),
    /// A date without a time component.
    Date(NaiveDate),
    /// A time without a date component.
    Time(NaiveTime),
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zoned(dt) => write!(f, "{}", dt.to_rfc3339()),
            Self::Utc(dt) => write!(f, "{}", dt.to_rfc3339()),
            Self::Naive(dt) => write!(f, "{}", dt),
            Self::Date(d) => write!(f, "{}", d),
            Self::Time(t) => write!(f, "{}", t),
        }
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Self::Zoned(dt)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::Utc(dt)
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(dt: NaiveDateTime) -> Self {
        Self::Naive(dt)
    }
}

impl From<NaiveDate> for Timestamp {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<NaiveTime> for Timestamp {
    fn from(t: NaiveTime) -> Self {
        Self::Time(t)
    }
}

/// A typed scalar as produced by a record source.
///
/// Equality is structural: decimals compare by mantissa and scale, so
/// `Decimal(1.50)` and `Decimal(1.5)` differ, as they do for the numeric
/// validator without `IGNORE_PRECISION`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    Decimal(Decimal),
    Long(i64),
    Text(String),
    Bool(bool),
    Timestamp(Timestamp),
}

impl Value {
    /// Name of the variant, used in kind-mismatch errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Decimal(_) => "decimal",
            Self::Long(_) => "long",
            Self::Text(_) => "text",
            Self::Bool(_) => "bool",
            Self::Timestamp(_) => "timestamp",
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Decimal(d) => Some(*d),
            Self::Long(l) => Some(Decimal::from(*l)),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            Self::Long(l) => Some(*l),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&Timestamp> {
        match self {
            Self::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }

    /// Project an optional value onto the decimal family.
    pub fn expect_decimal(value: Option<&Value>) -> Result<Option<Decimal>, ReconcileError> {
        value
            .map(|v| {
                v.as_decimal().ok_or(ReconcileError::ValueKindMismatch {
                    expected: "decimal",
                    found: v.kind_name(),
                })
            })
            .transpose()
    }

    pub fn expect_long(value: Option<&Value>) -> Result<Option<i64>, ReconcileError> {
        value
            .map(|v| {
                v.as_long().ok_or(ReconcileError::ValueKindMismatch {
                    expected: "long",
                    found: v.kind_name(),
                })
            })
            .transpose()
    }

    pub fn expect_text(value: Option<&Value>) -> Result<Option<String>, ReconcileError> {
        value
            .map(|v| {
                v.as_text()
                    .map(str::to_string)
                    .ok_or(ReconcileError::ValueKindMismatch {
                        expected: "text",
                        found: v.kind_name(),
                    })
            })
            .transpose()
    }

    pub fn expect_timestamp(value: Option<&Value>) -> Result<Option<Timestamp>, ReconcileError> {
        value
            .map(|v| {
                v.as_timestamp()
                    .cloned()
                    .ok_or(ReconcileError::ValueKindMismatch {
                        expected: "timestamp",
                        found: v.kind_name(),
                    })
            })
            .transpose()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Decimal(a), Self::Decimal(b)) => {
                a.mantissa() == b.mantissa() && a.scale() == b.scale()
            }
            (Self::Long(a), Self::Long(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Timestamp(a), Self::Timestamp(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Decimal(d) => {
                d.mantissa().hash(state);
                d.scale().hash(state);
            }
            Self::Long(l) => l.hash(state),
            Self::Text(s) => s.hash(state),
            Self::Bool(b) => b.hash(state),
            Self::Timestamp(ts) => ts.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decimal(d) => write!(f, "{}", d),
            Self::Long(l) => write!(f, "{}", l),
            Self::Text(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Timestamp(ts) => write!(f, "{}", ts),
        }
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Self::Decimal(d)
    }
}

impl From<i64> for Value {
    fn from(l: i64) -> Self {
        Self::Long(l)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Timestamp> for Value {
    fn from(ts: Timestamp) -> Self {
        Self::Timestamp(ts)
    }
}
