// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Schedule content lines: `DTSTART`, `DTEND`, `RDATE`, `EXDATE`, `DURATION`
//! and `RRULE`.

use std::str::FromStr;

use strum::IntoEnumIterator;

use crate::diagnostic::{TracingSink, WarningSink};
use crate::error::{Error, Result};
use crate::keyword::{KW_DTEND, KW_DTSTART, KW_DURATION, KW_EXDATE, KW_RDATE, KW_RRULE, KW_TZID};
use crate::rrule::{RecurrenceRule, decode_rule, encode_rule};
use crate::time::{self, TimeValue};

/// Fields of a schedule as read from its content lines.
///
/// `DURATION` is read but not kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleFieldSet {
    /// `DTSTART`
    pub start_time: Option<TimeValue>,
    /// `DTEND`
    pub end_time: Option<TimeValue>,
    /// `RDATE` values, in input order
    pub rtimes: Vec<TimeValue>,
    /// `EXDATE` values, in input order
    pub extimes: Vec<TimeValue>,
    /// `RRULE` values, in input order
    pub rrules: Vec<RecurrenceRule>,
}

impl ScheduleFieldSet {
    /// Write the fields as content lines, reporting naive times to `tracing`.
    ///
    /// See [`ScheduleFieldSet::to_ical_with`].
    #[track_caller]
    #[must_use]
    pub fn to_ical(&self, force_utc: bool) -> String {
        self.to_ical_with(force_utc, &mut TracingSink)
    }

    /// Write the fields as `\n`-separated content lines.
    ///
    /// Lines come in the order `DTSTART`, `RRULE`, `RDATE`, `EXDATE`, `DTEND`,
    /// with one line per rule and per time. Times are written by
    /// [`time::format_with`], so naive times go to `sink` as warnings.
    #[track_caller]
    pub fn to_ical_with<S>(&self, force_utc: bool, sink: &mut S) -> String
    where
        S: WarningSink + ?Sized,
    {
        let mut lines = Vec::new();
        if let Some(start) = &self.start_time {
            let value = time::format_with(start, force_utc, sink);
            lines.push(format!("{KW_DTSTART}{value}"));
        }
        for rule in &self.rrules {
            lines.push(format!("{KW_RRULE}:{}", encode_rule(rule)));
        }
        for rtime in &self.rtimes {
            let value = time::format_with(rtime, force_utc, sink);
            lines.push(format!("{KW_RDATE}{value}"));
        }
        for extime in &self.extimes {
            let value = time::format_with(extime, force_utc, sink);
            lines.push(format!("{KW_EXDATE}{value}"));
        }
        if let Some(end) = &self.end_time {
            let value = time::format_with(end, force_utc, sink);
            lines.push(format!("{KW_DTEND}{value}"));
        }
        lines.join("\n")
    }
}

impl FromStr for ScheduleFieldSet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_schedule(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumIter)]
enum ScheduleProperty {
    DtStart,
    DtEnd,
    RDate,
    ExDate,
    Duration,
    RRule,
}

impl ScheduleProperty {
    const fn as_str(self) -> &'static str {
        match self {
            ScheduleProperty::DtStart => KW_DTSTART,
            ScheduleProperty::DtEnd => KW_DTEND,
            ScheduleProperty::RDate => KW_RDATE,
            ScheduleProperty::ExDate => KW_EXDATE,
            ScheduleProperty::Duration => KW_DURATION,
            ScheduleProperty::RRule => KW_RRULE,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::iter().find(|prop| prop.as_str() == name)
    }
}

/// Parse schedule text into its fields.
///
/// Each line is `NAME[;PARAM...]:VALUE`. Lines may end in `\n` or `\r\n`,
/// and folded lines (continuations starting with a space or tab) are joined
/// first. A `TZID` parameter applies to every value of its line. Unknown
/// properties, lines without a value and `DURATION` are skipped.
///
/// ## Errors
///
/// Returns an error if a time value cannot be read or an `RRULE` value
/// fails to decode; see [`time::parse`] and [`decode_rule`].
pub fn parse_schedule(text: &str) -> Result<ScheduleFieldSet> {
    let mut fields = ScheduleFieldSet::default();

    for line in unfold(text) {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }

        let Some((head, value)) = line.split_once(':') else {
            tracing::debug!(line, "skipping content line without a value");
            continue;
        };

        let mut params = head.split(';');
        let name = params.next().unwrap_or_default();
        let tzid = params.find_map(|param| {
            param
                .strip_prefix(KW_TZID)
                .and_then(|rest| rest.strip_prefix('='))
        });

        let Some(property) = ScheduleProperty::from_name(name) else {
            tracing::debug!(name, "skipping unrecognized property");
            continue;
        };

        match property {
            ScheduleProperty::DtStart => fields.start_time = Some(time::parse(value, tzid)?),
            ScheduleProperty::DtEnd => fields.end_time = Some(time::parse(value, tzid)?),
            ScheduleProperty::RDate => fields.rtimes.extend(parse_times(value, tzid)?),
            ScheduleProperty::ExDate => fields.extimes.extend(parse_times(value, tzid)?),
            // TODO: carry DURATION into the field set once schedules can take it
            ScheduleProperty::Duration => match time::parse_duration(value) {
                Ok(seconds) => tracing::debug!(seconds, "dropping DURATION"),
                Err(err) => tracing::debug!(%err, "dropping unreadable DURATION"),
            },
            ScheduleProperty::RRule => fields.rrules.push(decode_rule(value)?),
        }
    }

    Ok(fields)
}

fn parse_times(value: &str, tzid: Option<&str>) -> Result<Vec<TimeValue>> {
    value.split(',').map(|v| time::parse(v, tzid)).collect()
}

/// Join folded content lines (RFC 5545 Section 3.1).
fn unfold(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for raw in text.lines() {
        match (raw.strip_prefix([' ', '\t']), lines.last_mut()) {
            (Some(rest), Some(prev)) => prev.push_str(rest),
            _ => lines.push(raw.to_owned()),
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use jiff::civil;

    use super::*;

    #[test]
    fn unfolds_continuation_lines() {
        let lines = unfold("RRULE:FREQ=WEEKLY;\r\n BYDAY=MO\r\nDTSTART:20240101T000000Z\n");
        assert_eq!(lines, ["RRULE:FREQ=WEEKLY;BYDAY=MO", "DTSTART:20240101T000000Z"]);
    }

    #[test]
    fn finds_tzid_among_params() {
        let fields =
            parse_schedule("DTSTART;VALUE=DATE-TIME;TZID=Bogus/Zone:20240101T090000").unwrap();
        assert_eq!(
            fields.start_time,
            Some(TimeValue::Floating(civil::date(2024, 1, 1).at(9, 0, 0, 0)))
        );
    }

    #[test]
    fn skips_unknown_and_valueless_lines() {
        let src = "SUMMARY:Standup\nEXRULE:FREQ=DAILY\nGARBAGE\n\nDURATION:PT1H";
        let fields = parse_schedule(src).unwrap();
        assert_eq!(fields, ScheduleFieldSet::default());
    }

    #[test]
    fn tolerates_any_duration() {
        for src in ["DURATION:PT1H30M", "DURATION:P1W", "DURATION:soon", "DURATION;X=1:-PT5M"] {
            assert_eq!(
                parse_schedule(src),
                Ok(ScheduleFieldSet::default()),
                "Failed for {src}"
            );
        }
    }

    #[test]
    fn property_names_are_exact() {
        assert_eq!(
            ScheduleProperty::from_name("RDATE"),
            Some(ScheduleProperty::RDate)
        );
        assert_eq!(ScheduleProperty::from_name("rdate"), None);
    }
}
