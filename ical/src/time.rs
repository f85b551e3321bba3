// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Time values and their iCalendar textual forms.
//!
//! A time is written either as a UTC value (`:19970714T173000Z`) or as a
//! wall-clock value qualified by a zone name (`;TZID=America/New_York:19970714T133000`).
//! Zone abbreviations such as `EST` are never written, as they cannot be
//! mapped back to a zone.

mod parser;

use std::panic::Location;

use jiff::tz::{Offset, TimeZone};
use jiff::{Timestamp, Zoned, civil};

use crate::diagnostic::{NaiveTimeWarning, TracingSink, WarningSink};
use crate::error::{Error, Result};
use crate::keyword::KW_TZID;

const FORMAT_UTC: &str = "%Y%m%dT%H%M%SZ";
const FORMAT_LOCAL: &str = "%Y%m%dT%H%M%S";

/// A point in time as carried by schedule properties.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeValue {
    /// An instant flagged as UTC.
    Utc(Timestamp),

    /// An instant in a named time zone.
    Zoned(Zoned),

    /// A wall-clock value without any zone information.
    Floating(civil::DateTime),
}

impl TimeValue {
    /// The instant this value denotes, reading floating values as UTC.
    #[must_use]
    pub fn to_utc(&self) -> Timestamp {
        match self {
            TimeValue::Utc(ts) => *ts,
            TimeValue::Zoned(zoned) => zoned.timestamp(),
            TimeValue::Floating(dt) => floating_as_utc(*dt),
        }
    }

    /// The IANA name of the zone, if the value carries one.
    #[must_use]
    pub fn zone_name(&self) -> Option<&str> {
        match self {
            TimeValue::Zoned(zoned) => zoned.time_zone().iana_name(),
            TimeValue::Utc(_) | TimeValue::Floating(_) => None,
        }
    }

    /// Whether the value is flagged as UTC.
    #[must_use]
    pub const fn is_utc(&self) -> bool {
        matches!(self, TimeValue::Utc(_))
    }
}

impl From<Timestamp> for TimeValue {
    fn from(ts: Timestamp) -> Self {
        TimeValue::Utc(ts)
    }
}

impl From<Zoned> for TimeValue {
    fn from(zoned: Zoned) -> Self {
        TimeValue::Zoned(zoned)
    }
}

impl From<civil::DateTime> for TimeValue {
    fn from(dt: civil::DateTime) -> Self {
        TimeValue::Floating(dt)
    }
}

fn floating_as_utc(dt: civil::DateTime) -> Timestamp {
    // only fails at the very edges of the civil range
    Offset::UTC.to_timestamp(dt).unwrap_or(if dt.year() < 0 {
        Timestamp::MIN
    } else {
        Timestamp::MAX
    })
}

/// Format a time as `YYYYMMDDThhmmssZ` after converting it to UTC.
#[must_use]
pub fn format_utc(time: &TimeValue) -> String {
    time.to_utc().strftime(FORMAT_UTC).to_string()
}

/// Format a time with its leading separator, reporting naive values to `tracing`.
///
/// See [`format_with`].
#[track_caller]
#[must_use]
pub fn format(time: &TimeValue, force_utc: bool) -> String {
    format_with(time, force_utc, &mut TracingSink)
}

/// Format a time with its leading separator, as it follows a property name.
///
/// - With `force_utc`, the time is converted to UTC first: `:YYYYMMDDThhmmssZ`.
/// - A zoned time keeps its wall clock and names the zone:
///   `;TZID=<zone>:YYYYMMDDThhmmss`.
/// - A UTC time is written as `:YYYYMMDDThhmmssZ`.
/// - Anything else has no usable zone. It is assumed to be UTC and a
///   [`NaiveTimeWarning`] pointing at the caller goes to `sink`.
#[track_caller]
pub fn format_with<S>(time: &TimeValue, force_utc: bool, sink: &mut S) -> String
where
    S: WarningSink + ?Sized,
{
    if force_utc {
        return format!(":{}", format_utc(time));
    }

    match time {
        TimeValue::Utc(ts) => format!(":{}", ts.strftime(FORMAT_UTC)),
        TimeValue::Zoned(zoned) => match zoned.time_zone().iana_name() {
            Some(tzid) => format!(";{KW_TZID}={tzid}:{}", zoned.strftime(FORMAT_LOCAL)),
            None => assume_utc(zoned.datetime(), zoned.timestamp(), sink),
        },
        TimeValue::Floating(dt) => assume_utc(*dt, floating_as_utc(*dt), sink),
    }
}

#[track_caller]
fn assume_utc<S>(wall_clock: civil::DateTime, instant: Timestamp, sink: &mut S) -> String
where
    S: WarningSink + ?Sized,
{
    sink.warn(NaiveTimeWarning {
        location: Location::caller(),
        time: wall_clock,
    });
    format!(":{}", instant.strftime(FORMAT_UTC))
}

/// Parse a time value, optionally qualified by a `TZID`.
///
/// Without a zone name the value is read as a floating date-time, or as UTC
/// when it ends in `Z`. With a zone name the value is placed in that zone.
/// A zone name that cannot be resolved is logged and ignored, and the value
/// is read as if no zone had been given.
///
/// ## Errors
///
/// Returns [`Error::InvalidTime`] if the value is not `YYYYMMDD`,
/// `YYYYMMDDThhmmss` or `YYYYMMDDThhmmssZ`.
pub fn parse(text: &str, tzid: Option<&str>) -> Result<TimeValue> {
    let Some(tzid) = tzid.map(str::trim).filter(|tzid| !tzid.is_empty()) else {
        return parse_plain(text);
    };

    let tz = match TimeZone::get(tzid) {
        Ok(tz) => tz,
        Err(err) => {
            tracing::warn!(tzid, %err, "unknown timezone, parsing without it");
            return parse_plain(text);
        }
    };

    match parse_plain(text)? {
        TimeValue::Utc(ts) => Ok(TimeValue::Zoned(ts.to_zoned(tz))),
        TimeValue::Floating(dt) => match dt.to_zoned(tz) {
            Ok(zoned) => Ok(TimeValue::Zoned(zoned)),
            Err(err) => {
                tracing::warn!(tzid, %err, "time out of range in timezone, parsing without it");
                Ok(TimeValue::Floating(dt))
            }
        },
        zoned @ TimeValue::Zoned(_) => Ok(zoned),
    }
}

fn parse_plain(text: &str) -> Result<TimeValue> {
    let text = text.trim();
    let raw = parser::parse_date_time(text).map_err(|reason| Error::InvalidTime {
        value: text.to_owned(),
        reason,
    })?;

    if !raw.utc {
        return Ok(TimeValue::Floating(raw.datetime));
    }

    Offset::UTC
        .to_timestamp(raw.datetime)
        .map(TimeValue::Utc)
        .map_err(|err| Error::InvalidTime {
            value: text.to_owned(),
            reason: err.to_string(),
        })
}

/// Format a number of seconds as `PT[<h>H][<m>M][<s>S]`.
///
/// Components that are zero are left out, so zero seconds is the bare `PT`.
#[must_use]
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3_600;
    let minutes = seconds % 3_600 / 60;
    let seconds = seconds % 60;

    let mut repr = String::from("PT");
    if hours > 0 {
        repr.push_str(&format!("{hours}H"));
    }
    if minutes > 0 {
        repr.push_str(&format!("{minutes}M"));
    }
    if seconds > 0 {
        repr.push_str(&format!("{seconds}S"));
    }
    repr
}

/// Parse a duration into whole seconds.
///
/// Accepts everything [`format_duration`] writes, plus day and week
/// components (`P1DT2H`, `P2W`).
///
/// ## Errors
///
/// Returns [`Error::InvalidDuration`] for malformed or negative durations.
pub fn parse_duration(text: &str) -> Result<u64> {
    let text = text.trim();
    parser::parse_duration(text).map_err(|reason| Error::InvalidDuration {
        value: text.to_owned(),
        reason,
    })
}
