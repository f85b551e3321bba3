// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! `RRULE` value encoding.

use crate::rrule::{DEFAULT_INTERVAL, RecurrenceRule, RulePart, RuleParts, Terminator, Validation};
use crate::time::{self, TimeValue};

/// Encode a rule as an `RRULE` value.
///
/// Parts are written as `FREQ`, `INTERVAL` (unless it is 1), `COUNT` or
/// `UNTIL`, `WKST`, then one `BY*` part per validation in the order the
/// validations were added. Plain and occurrence-qualified weekdays share
/// the `BYDAY` part.
#[must_use]
pub fn encode_rule(rule: &RecurrenceRule) -> String {
    let mut parts = RuleParts::new();
    parts
        .entry(RulePart::Freq.as_str())
        .push(rule.rule_type.to_string());

    if rule.interval != DEFAULT_INTERVAL {
        parts
            .entry(RulePart::Interval.as_str())
            .push(rule.interval.to_string());
    }

    match rule.terminator {
        Some(Terminator::Count(count)) => {
            parts
                .entry(RulePart::Count.as_str())
                .push(count.to_string());
        }
        Some(Terminator::Until(until)) => {
            parts
                .entry(RulePart::Until.as_str())
                .push(time::format_utc(&TimeValue::Utc(until)));
        }
        None => {}
    }

    if let Some(week_start) = rule.week_start {
        parts
            .entry(RulePart::Wkst.as_str())
            .push(week_start.code().to_owned());
    }

    for validation in &rule.validations {
        match validation {
            Validation::SecondOfMinute(v) => push_all(parts.entry(RulePart::BySecond.as_str()), v),
            Validation::MinuteOfHour(v) => push_all(parts.entry(RulePart::ByMinute.as_str()), v),
            Validation::HourOfDay(v) => push_all(parts.entry(RulePart::ByHour.as_str()), v),
            Validation::DayOfMonth(v) => push_all(parts.entry(RulePart::ByMonthDay.as_str()), v),
            Validation::MonthOfYear(v) => push_all(parts.entry(RulePart::ByMonth.as_str()), v),
            Validation::DayOfYear(v) => push_all(parts.entry(RulePart::ByYearDay.as_str()), v),
            Validation::Day(days) => parts
                .entry(RulePart::ByDay.as_str())
                .extend(days.iter().map(|day| day.code().to_owned())),
            Validation::DayOfWeek(occurrences) => parts.entry(RulePart::ByDay.as_str()).extend(
                occurrences.iter().flat_map(|(day, offsets)| {
                    offsets.iter().map(move |offset| format!("{offset}{day}"))
                }),
            ),
            Validation::Unsupported(name) => {
                tracing::debug!(%name, "skipping unsupported rule part");
            }
        }
    }

    parts.render()
}

fn push_all(values: &mut Vec<String>, numbers: &[i32]) {
    values.extend(numbers.iter().map(ToString::to_string));
}
