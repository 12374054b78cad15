//! Calendar values: dates, times and date-times.
//!
//! TOML has four date/time shapes (local date, local time, local date-time,
//! offset date-time). The native model folds the last two into
//! [`Datetime`], whose offset is optional.
//!
//! Native calendar values carry microsecond precision. TOML times carry
//! nanoseconds, so decoding truncates the sub-microsecond remainder and
//! encoding widens microseconds back to nanoseconds.
//!
//! ```rust
//! use chrono::{FixedOffset, NaiveDate};
//! use toml_native::{Calendar, Datetime};
//!
//! let naive = NaiveDate::from_ymd_opt(1979, 5, 27)
//!     .unwrap()
//!     .and_hms_opt(7, 32, 0)
//!     .unwrap();
//! let offset = FixedOffset::west_opt(7 * 3600).unwrap();
//! let dt = Calendar::DateTime(Datetime::with_offset(naive, offset));
//! assert_eq!(dt.to_string(), "1979-05-27T07:32:00-07:00");
//! ```

use crate::{Error, KeyPath, Result};
use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike,
    Utc,
};
use std::fmt;
use toml::value::{Date, Offset, Time};

/// Reserved key the `toml` crate uses to carry a datetime through serde.
pub(crate) const DATETIME_FIELD: &str = "$__toml_private_datetime";

const NANOS_PER_SECOND: u32 = 1_000_000_000;
const NANOS_PER_MICRO: u32 = 1_000;

/// A date-time with an optional UTC offset.
///
/// `naive` is the wall-clock reading as written in the document; `offset`
/// is `None` for a TOML local date-time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Datetime {
    pub naive: NaiveDateTime,
    pub offset: Option<FixedOffset>,
}

impl Datetime {
    /// A date-time without an offset (TOML local date-time).
    #[must_use]
    pub const fn local(naive: NaiveDateTime) -> Self {
        Datetime {
            naive,
            offset: None,
        }
    }

    /// A date-time at a fixed UTC offset (TOML offset date-time).
    #[must_use]
    pub const fn with_offset(naive: NaiveDateTime, offset: FixedOffset) -> Self {
        Datetime {
            naive,
            offset: Some(offset),
        }
    }

    /// The offset in whole minutes east of UTC, if any.
    #[must_use]
    pub fn offset_minutes(&self) -> Option<i32> {
        self.offset.map(|o| o.local_minus_utc() / 60)
    }

    /// Converts to an offset-aware chrono value. Returns `None` for local
    /// date-times.
    #[must_use]
    pub fn to_chrono(&self) -> Option<DateTime<FixedOffset>> {
        self.offset
            .and_then(|offset| offset.from_local_datetime(&self.naive).single())
    }
}

impl From<NaiveDateTime> for Datetime {
    fn from(naive: NaiveDateTime) -> Self {
        Datetime::local(naive)
    }
}

impl From<DateTime<FixedOffset>> for Datetime {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Datetime::with_offset(dt.naive_local(), *dt.offset())
    }
}

impl From<DateTime<Utc>> for Datetime {
    fn from(dt: DateTime<Utc>) -> Self {
        Datetime::from(dt.fixed_offset())
    }
}

impl fmt::Display for Datetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}T{}", self.naive.date(), self.naive.time())?;
        match self.offset {
            None => Ok(()),
            Some(offset) if offset.local_minus_utc() == 0 => f.write_str("Z"),
            Some(offset) => write!(f, "{}", offset),
        }
    }
}

/// One of the three native calendar shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Calendar {
    DateTime(Datetime),
    Date(NaiveDate),
    Time(NaiveTime),
}

impl Calendar {
    /// Converts a parsed TOML datetime into a native calendar value.
    ///
    /// Nanoseconds are truncated to whole microseconds. Any combination of
    /// fields the TOML grammar cannot produce is an internal error.
    pub fn from_toml(datetime: &toml::value::Datetime) -> Result<Self> {
        match (datetime.date, datetime.time, datetime.offset) {
            (Some(date), Some(time), offset) => {
                let naive = NaiveDateTime::new(date_from_toml(date)?, time_from_toml(time)?);
                Ok(Calendar::DateTime(Datetime {
                    naive,
                    offset: offset.map(offset_from_toml).transpose()?,
                }))
            }
            (Some(date), None, None) => date_from_toml(date).map(Calendar::Date),
            (None, Some(time), None) => time_from_toml(time).map(Calendar::Time),
            _ => Err(Error::internal(format!(
                "unrecognized datetime node `{}`",
                datetime
            ))),
        }
    }

    /// Converts into a TOML datetime node.
    ///
    /// The date-time arm is matched first: it is the only shape that carries
    /// both a date and a time, and it must never be narrowed to either.
    pub fn to_toml(&self, at: &KeyPath) -> Result<toml::value::Datetime> {
        match self {
            Calendar::DateTime(dt) => Ok(toml::value::Datetime {
                date: Some(date_to_toml(dt.naive.date(), at)?),
                time: Some(time_to_toml(dt.naive.time())),
                offset: dt.offset.map(|o| offset_to_toml(o, at)).transpose()?,
            }),
            Calendar::Date(date) => Ok(toml::value::Datetime {
                date: Some(date_to_toml(*date, at)?),
                time: None,
                offset: None,
            }),
            Calendar::Time(time) => Ok(toml::value::Datetime {
                date: None,
                time: Some(time_to_toml(*time)),
                offset: None,
            }),
        }
    }

    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Calendar::DateTime(Datetime { offset: None, .. }) => "local date-time",
            Calendar::DateTime(_) => "offset date-time",
            Calendar::Date(_) => "date",
            Calendar::Time(_) => "time",
        }
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Calendar::DateTime(dt) => write!(f, "{}", dt),
            Calendar::Date(date) => write!(f, "{}", date),
            Calendar::Time(time) => write!(f, "{}", time),
        }
    }
}

impl From<Datetime> for Calendar {
    fn from(dt: Datetime) -> Self {
        Calendar::DateTime(dt)
    }
}

impl From<NaiveDate> for Calendar {
    fn from(date: NaiveDate) -> Self {
        Calendar::Date(date)
    }
}

impl From<NaiveTime> for Calendar {
    fn from(time: NaiveTime) -> Self {
        Calendar::Time(time)
    }
}

fn date_from_toml(date: Date) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(
        i32::from(date.year),
        u32::from(date.month),
        u32::from(date.day),
    )
    .ok_or_else(|| Error::internal(format!("parser produced an invalid date `{}`", date)))
}

fn time_from_toml(time: Time) -> Result<NaiveTime> {
    let micros = time.nanosecond / NANOS_PER_MICRO;
    // chrono spells the leap second 60 as second 59 plus one extra second.
    let parsed = if time.second == 60 {
        NaiveTime::from_hms_micro_opt(
            u32::from(time.hour),
            u32::from(time.minute),
            59,
            micros + NANOS_PER_SECOND / NANOS_PER_MICRO,
        )
    } else {
        NaiveTime::from_hms_micro_opt(
            u32::from(time.hour),
            u32::from(time.minute),
            u32::from(time.second),
            micros,
        )
    };
    parsed.ok_or_else(|| Error::internal(format!("parser produced an invalid time `{}`", time)))
}

fn offset_from_toml(offset: Offset) -> Result<FixedOffset> {
    let seconds = match offset {
        Offset::Z => 0,
        Offset::Custom { minutes } => i32::from(minutes) * 60,
    };
    FixedOffset::east_opt(seconds)
        .ok_or_else(|| Error::internal(format!("parser produced an invalid offset `{}`", offset)))
}

fn date_to_toml(date: NaiveDate, at: &KeyPath) -> Result<Date> {
    let year = u16::try_from(date.year())
        .ok()
        .filter(|year| *year <= 9999)
        .ok_or_else(|| {
            Error::unsupported_type_because(
                &date.to_string(),
                at,
                "TOML dates need a year between 0000 and 9999",
            )
        })?;
    Ok(Date {
        year,
        month: date.month() as u8,
        day: date.day() as u8,
    })
}

fn time_to_toml(time: NaiveTime) -> Time {
    let (second, nanos) = if time.nanosecond() >= NANOS_PER_SECOND {
        (time.second() + 1, time.nanosecond() - NANOS_PER_SECOND)
    } else {
        (time.second(), time.nanosecond())
    };
    Time {
        hour: time.hour() as u8,
        minute: time.minute() as u8,
        second: second as u8,
        nanosecond: nanos / NANOS_PER_MICRO * NANOS_PER_MICRO,
    }
}

/// Sub-minute offsets are truncated, not rounded.
fn offset_to_toml(offset: FixedOffset, at: &KeyPath) -> Result<Offset> {
    match offset.local_minus_utc() / 60 {
        0 => Ok(Offset::Z),
        minutes => i16::try_from(minutes)
            .map(|minutes| Offset::Custom { minutes })
            .map_err(|_| Error::unsupported_type(&offset.to_string(), at)),
    }
}
