//! Conversion between calendar values and the integer representation stored
//! by date, time and timestamp arrays.
//!
//! - dates are `i32` days since 1970-01-01;
//! - times are `i64` microseconds since midnight;
//! - timestamps are `i64` counts of a [`TimeUnit`] since the epoch, with one
//!   [`Timezone`] per array.
//!
//! Encoding truncates precision below the target unit (floor division on the
//! epoch offset); decoding is exact.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset as _,
    TimeZone as _, Timelike,
};

use crate::{ArrayError, TimeUnit};

/// Days from 0001-01-01 (day 1 of the common era) to 1970-01-01.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

pub const MICROS_PER_DAY: i64 = 86_400_000_000;

const NANOS_PER_SECOND: u32 = 1_000_000_000;

pub fn encode_date(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - EPOCH_DAYS_FROM_CE
}

/// Returns `None` when `days` lies outside the calendar range.
pub fn decode_date(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(EPOCH_DAYS_FROM_CE)?)
}

pub fn encode_time(time: NaiveTime) -> i64 {
    // A leap second is folded into the preceding second.
    let micros = (time.nanosecond() % NANOS_PER_SECOND) / 1_000;
    i64::from(time.num_seconds_from_midnight()) * 1_000_000 + i64::from(micros)
}

/// Returns `None` unless `0 <= micros < MICROS_PER_DAY`.
pub fn decode_time(micros: i64) -> Option<NaiveTime> {
    if !(0..MICROS_PER_DAY).contains(&micros) {
        return None;
    }
    let seconds = u32::try_from(micros / 1_000_000).ok()?;
    let nanos = u32::try_from(micros % 1_000_000).ok()? * 1_000;
    NaiveTime::from_num_seconds_from_midnight_opt(seconds, nanos)
}

/// Encodes a UTC wall-clock datetime as a count of `unit` since the epoch.
///
/// Returns `None` when the result overflows `i64`.
pub fn encode_timestamp(utc: NaiveDateTime, unit: TimeUnit) -> Option<i64> {
    let utc = utc.and_utc();
    let nanos = i64::from(utc.timestamp_subsec_nanos() % NANOS_PER_SECOND);
    utc.timestamp()
        .checked_mul(unit.per_second())?
        .checked_add(nanos / unit.nanos_per_unit())
}

/// Decodes a count of `unit` since the epoch into a UTC wall-clock datetime.
///
/// Returns `None` when the instant is outside the calendar range.
pub fn decode_timestamp(value: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let per_second = unit.per_second();
    let seconds = value.div_euclid(per_second);
    let nanos = value.rem_euclid(per_second) * unit.nanos_per_unit();
    DateTime::from_timestamp(seconds, u32::try_from(nanos).ok()?).map(|dt| dt.naive_utc())
}

/// Formats an offset as `±HH:MM`, with `:SS` appended when non-zero.
pub fn format_offset(offset: FixedOffset) -> String {
    let total = offset.local_minus_utc();
    let sign = if total < 0 { '-' } else { '+' };
    let total = total.unsigned_abs();
    let (hours, minutes, seconds) = (total / 3600, total / 60 % 60, total % 60);
    if seconds == 0 {
        format!("{sign}{hours:02}:{minutes:02}")
    } else {
        format!("{sign}{hours:02}:{minutes:02}:{seconds:02}")
    }
}

/// Parses `±HH`, `±HHMM` or `±HH:MM`.
fn parse_fixed_offset(name: &str) -> Option<FixedOffset> {
    let sign = match name.as_bytes().first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let rest = &name[1..];
    if !rest.is_ascii() {
        return None;
    }
    let (hours, minutes) = match rest.len() {
        2 => (rest, "00"),
        4 => (&rest[..2], &rest[2..]),
        5 if rest.as_bytes()[2] == b':' => (&rest[..2], &rest[3..]),
        _ => return None,
    };
    let digits = |s: &str| -> Option<i32> {
        s.bytes()
            .all(|b| b.is_ascii_digit())
            .then(|| s.parse().ok())
            .flatten()
    };
    let (hours, minutes) = (digits(hours)?, digits(minutes)?);
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Zone {
    Fixed(FixedOffset),
    Named(chrono_tz::Tz),
}

/// Timezone shared by every element of a timestamp array.
///
/// Either a fixed offset (`+01:00`) or an IANA name (`Europe/Paris`). The
/// original string is kept verbatim since it is part of the data type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timezone {
    name: String,
    zone: Zone,
}

impl Timezone {
    pub fn parse(name: &str) -> Result<Self, ArrayError> {
        let zone = match parse_fixed_offset(name) {
            Some(offset) => Zone::Fixed(offset),
            None => Zone::Named(
                chrono_tz::Tz::from_str(name)
                    .map_err(|_| ArrayError::InvalidTimezone(name.to_string()))?,
            ),
        };
        Ok(Self {
            name: name.to_string(),
            zone,
        })
    }

    pub fn fixed(offset: FixedOffset) -> Self {
        Self {
            name: format_offset(offset),
            zone: Zone::Fixed(offset),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// UTC offset of this zone at the given UTC instant.
    pub fn offset_at(&self, utc: &NaiveDateTime) -> FixedOffset {
        match self.zone {
            Zone::Fixed(offset) => offset,
            Zone::Named(tz) => tz.offset_from_utc_datetime(utc).fix(),
        }
    }
}

impl FromStr for Timezone {
    type Err = ArrayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for Timezone {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Element of a timestamp array: a naive wall-clock datetime, or a datetime
/// with a UTC offset.
#[derive(Debug, Clone, Copy)]
pub enum TimestampValue {
    Naive(NaiveDateTime),
    Zoned(DateTime<FixedOffset>),
}

impl TimestampValue {
    /// The instant as a UTC wall-clock datetime; naive values are read as UTC.
    pub fn naive_utc(&self) -> NaiveDateTime {
        match self {
            TimestampValue::Naive(dt) => *dt,
            TimestampValue::Zoned(dt) => dt.naive_utc(),
        }
    }

    pub fn offset(&self) -> Option<FixedOffset> {
        match self {
            TimestampValue::Naive(_) => None,
            TimestampValue::Zoned(dt) => Some(*dt.offset()),
        }
    }

    /// Encodes this value for an array with the given unit and timezone.
    ///
    /// Zoned values must carry the zone's offset at their instant; naive
    /// values are only accepted when the array has no timezone.
    pub(crate) fn encode(
        &self,
        index: usize,
        unit: TimeUnit,
        timezone: Option<&Timezone>,
    ) -> Result<i64, ArrayError> {
        let mismatch = |expected: &str, found: String| ArrayError::TimezoneMismatch {
            index,
            expected: expected.to_string(),
            found,
        };
        let utc = match (self, timezone) {
            (TimestampValue::Naive(dt), None) => *dt,
            (TimestampValue::Zoned(dt), Some(tz)) => {
                let utc = dt.naive_utc();
                if tz.offset_at(&utc) != *dt.offset() {
                    return Err(mismatch(tz.name(), format_offset(*dt.offset())));
                }
                utc
            }
            (TimestampValue::Naive(_), Some(tz)) => {
                return Err(mismatch(tz.name(), "naive".to_string()));
            }
            (TimestampValue::Zoned(dt), None) => {
                return Err(mismatch("naive", format_offset(*dt.offset())));
            }
        };
        encode_timestamp(utc, unit).ok_or(ArrayError::TimestampOverflow { index, unit })
    }

    /// Inverse of [`TimestampValue::encode`]; `None` when out of range.
    pub(crate) fn decode(
        value: i64,
        unit: TimeUnit,
        timezone: Option<&Timezone>,
    ) -> Option<TimestampValue> {
        let utc = decode_timestamp(value, unit)?;
        Some(match timezone {
            None => TimestampValue::Naive(utc),
            Some(tz) => {
                TimestampValue::Zoned(DateTime::from_naive_utc_and_offset(utc, tz.offset_at(&utc)))
            }
        })
    }
}

/// Two values are equal when they denote the same instant with the same
/// offset (or are both naive with the same wall clock).
impl PartialEq for TimestampValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TimestampValue::Naive(a), TimestampValue::Naive(b)) => a == b,
            (TimestampValue::Zoned(a), TimestampValue::Zoned(b)) => {
                a == b && a.offset() == b.offset()
            }
            _ => false,
        }
    }
}

impl Eq for TimestampValue {}

impl From<NaiveDateTime> for TimestampValue {
    fn from(value: NaiveDateTime) -> Self {
        TimestampValue::Naive(value)
    }
}

impl From<DateTime<FixedOffset>> for TimestampValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        TimestampValue::Zoned(value)
    }
}

impl Display for TimestampValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TimestampValue::Naive(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
            TimestampValue::Zoned(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f%:z")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_fixed_offset_accepts_common_forms() {
        let one_hour = FixedOffset::east_opt(3600);
        assert_eq!(parse_fixed_offset("+01"), one_hour);
        assert_eq!(parse_fixed_offset("+0100"), one_hour);
        assert_eq!(parse_fixed_offset("+01:00"), one_hour);
        assert_eq!(parse_fixed_offset("-05:30"), FixedOffset::west_opt(5 * 3600 + 1800));
    }

    #[test]
    fn parse_fixed_offset_rejects_malformed_input() {
        assert_eq!(parse_fixed_offset("01:00"), None);
        assert_eq!(parse_fixed_offset("+1:00"), None);
        assert_eq!(parse_fixed_offset("+01:60"), None);
        assert_eq!(parse_fixed_offset("+-1:00"), None);
        assert_eq!(parse_fixed_offset("+"), None);
    }

    #[test]
    fn format_offset_renders_seconds_only_when_present() {
        assert_eq!(format_offset(FixedOffset::east_opt(0).unwrap()), "+00:00");
        assert_eq!(format_offset(FixedOffset::west_opt(3600).unwrap()), "-01:00");
        assert_eq!(format_offset(FixedOffset::east_opt(3661).unwrap()), "+01:01:01");
    }
}
