use std::fmt;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::ReconcileError;
use crate::value::Timestamp;

/// The zone that zoned timestamps are resolved into before comparison.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LocalZone {
    /// The process's local time zone.
    #[default]
    System,
    /// A fixed UTC offset, east of Greenwich.
    Fixed { offset_seconds: i32 },
}

impl LocalZone {
    pub fn utc() -> Self {
        Self::Fixed { offset_seconds: 0 }
    }

    /// Check that a fixed offset is representable.
    pub fn validate(&self) -> Result<(), ReconcileError> {
        match self {
            Self::System => Ok(()),
            Self::Fixed { offset_seconds } => FixedOffset::east_opt(*offset_seconds)
                .map(|_| ())
                .ok_or(ReconcileError::InvalidZoneOffset(*offset_seconds)),
        }
    }

    fn to_local<Tz: TimeZone>(&self, dt: &DateTime<Tz>) -> Result<NaiveDateTime, ReconcileError> {
        match self {
            Self::System => Ok(dt.with_timezone(&Local).naive_local()),
            Self::Fixed { offset_seconds } => {
                let offset = FixedOffset::east_opt(*offset_seconds)
                    .ok_or(ReconcileError::InvalidZoneOffset(*offset_seconds))?;
                Ok(dt.with_timezone(&offset).naive_local())
            }
        }
    }
}

/// A zone-free (date, time) pair.
///
/// Either half may be absent when the input only carried the other one.
/// All zone reconciliation happens in [`DateTimeValue::from_timestamp`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateTimeValue {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
}

impl DateTimeValue {
    pub fn new(date: Option<NaiveDate>, time: Option<NaiveTime>) -> Self {
        Self { date, time }
    }

    /// Resolve a timestamp into the given local zone and split it.
    pub fn from_timestamp(ts: &Timestamp, zone: &LocalZone) -> Result<Self, ReconcileError> {
        let local = match ts {
            Timestamp::Zoned(dt) => zone.to_local(dt)?,
            Timestamp::Utc(dt) => zone.to_local(dt)?,
            Timestamp::Naive(dt) => *dt,
            Timestamp::Date(d) => return Ok(Self::new(Some(*d), None)),
            Timestamp::Time(t) => return Ok(Self::new(None, Some(*t))),
        };
        Ok(Self::new(Some(local.date()), Some(local.time())))
    }

    pub fn same_date(&self, other: &Self) -> bool {
        self.date == other.date
    }

    pub fn same_time(&self, other: &Self) -> bool {
        self.time == other.time
    }
}

impl fmt::Display for DateTimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.date, self.time) {
            (Some(d), Some(t)) => write!(f, "{} {}", d, t),
            (Some(d), None) => write!(f, "{}", d),
            (None, Some(t)) => write!(f, "{}", t),
            (None, None) => f.write_str("(EMPTY)"),
        }
    }
}
