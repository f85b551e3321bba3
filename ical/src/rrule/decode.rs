// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! `RRULE` value decoding.

use crate::error::{Error, Result};
use crate::rrule::{
    DEFAULT_INTERVAL, Frequency, RecurrenceRule, RulePart, Terminator, Validation, ValidationSet,
    WeekDay,
};
use crate::time;

/// Decode an `RRULE` value.
///
/// Parts may come in any order. Integers are read leniently: the leading
/// integer of a value is used and a value without one reads as 0. `BYSETPOS`
/// is ignored, and any part this codec does not know is kept as
/// [`Validation::Unsupported`]. When both `COUNT` and `UNTIL` are given, the
/// later one wins.
///
/// ## Errors
///
/// - [`Error::EmptyRule`] if `text` is blank.
/// - [`Error::MalformedComponent`] if a part has no `=` or an empty value.
/// - [`Error::InvalidInterval`] if `INTERVAL` is not a positive integer.
/// - [`Error::MissingFrequency`] / [`Error::UnknownFrequency`] for a missing
///   or unrecognized `FREQ`.
/// - [`Error::InvalidWeekday`] for a bad `WKST` or `BYDAY` day code.
/// - [`Error::InvalidTime`] for an unreadable `UNTIL`.
pub fn decode_rule(text: &str) -> Result<RecurrenceRule> {
    if text.trim().is_empty() {
        return Err(Error::EmptyRule);
    }

    let mut rule_type = None;
    let mut interval = DEFAULT_INTERVAL;
    let mut terminator = None;
    let mut week_start = None;
    let mut validations = ValidationSet::new();

    for component in text.trim_end_matches(';').split(';') {
        let Some((name, value)) = component.split_once('=') else {
            return Err(Error::MalformedComponent {
                component: component.to_owned(),
            });
        };
        let value = value.trim();
        if value.is_empty() {
            return Err(Error::MalformedComponent {
                component: component.to_owned(),
            });
        }

        let Some(part) = RulePart::from_name(name) else {
            validations.insert(Validation::Unsupported(name.to_owned()));
            continue;
        };

        match part {
            RulePart::Freq => rule_type = Some(value.parse::<Frequency>()?),
            RulePart::Interval => {
                interval = lenient_int(value);
                if interval == 0 {
                    return Err(Error::InvalidInterval {
                        value: value.to_owned(),
                    });
                }
            }
            RulePart::Count => terminator = Some(Terminator::Count(lenient_int(value))),
            RulePart::Until => {
                let until = time::parse(value, None)?.to_utc();
                terminator = Some(Terminator::Until(until));
            }
            RulePart::Wkst => week_start = Some(value.parse::<WeekDay>()?),
            RulePart::BySecond => validations.insert(Validation::SecondOfMinute(int_list(value))),
            RulePart::ByMinute => validations.insert(Validation::MinuteOfHour(int_list(value))),
            RulePart::ByHour => validations.insert(Validation::HourOfDay(int_list(value))),
            RulePart::ByMonthDay => validations.insert(Validation::DayOfMonth(int_list(value))),
            RulePart::ByMonth => validations.insert(Validation::MonthOfYear(int_list(value))),
            RulePart::ByYearDay => validations.insert(Validation::DayOfYear(int_list(value))),
            RulePart::ByDay => decode_by_day(value, &mut validations)?,
            RulePart::BySetPos => tracing::debug!(value, "ignoring BYSETPOS"),
        }
    }

    Ok(RecurrenceRule {
        rule_type: rule_type.ok_or(Error::MissingFrequency)?,
        interval,
        terminator,
        week_start,
        validations,
    })
}

/// Split `BYDAY` into plain weekdays and occurrence-qualified weekdays.
///
/// A plain day is only kept while the same day has no occurrence entry, and
/// an occurrence entry removes a plain day recorded earlier. So `MO,2MO` and
/// `2MO,MO` both leave `MO` as occurrence-only.
fn decode_by_day(value: &str, validations: &mut ValidationSet) -> Result<()> {
    let mut days: Vec<WeekDay> = Vec::new();
    let mut occurrences: Vec<(WeekDay, Vec<i32>)> = Vec::new();

    for token in value.split(',') {
        let token = token.trim();
        let (offset, code) = split_day_code(token)?;
        let day = code.parse::<WeekDay>()?;

        if offset.is_empty() {
            let has_occurrence = occurrences.iter().any(|(d, _)| *d == day);
            if !has_occurrence && !days.contains(&day) {
                days.push(day);
            }
        } else {
            let offset = lenient_int(offset);
            match occurrences.iter_mut().find(|(d, _)| *d == day) {
                Some((_, offsets)) => offsets.push(offset),
                None => occurrences.push((day, vec![offset])),
            }
            days.retain(|d| *d != day);
        }
    }

    if !days.is_empty() {
        validations.insert(Validation::Day(days));
    }
    if !occurrences.is_empty() {
        validations.insert(Validation::DayOfWeek(occurrences));
    }
    Ok(())
}

/// Split a `BYDAY` token into its occurrence prefix and trailing day code.
fn split_day_code(token: &str) -> Result<(&str, &str)> {
    match token.char_indices().rev().nth(1) {
        Some((at, _)) => Ok(token.split_at(at)),
        None => Err(Error::InvalidWeekday {
            code: token.to_owned(),
        }),
    }
}

fn int_list(value: &str) -> Vec<i32> {
    value.split(',').map(lenient_int).collect()
}

fn lenient_int<T>(value: &str) -> T
where
    T: lexical::FromLexical + Default,
{
    lexical::parse_partial::<T, _>(value.trim()).map_or_else(|_| T::default(), |(n, _)| n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_rule() {
        assert_eq!(decode_rule(""), Err(Error::EmptyRule));
        assert_eq!(decode_rule("  "), Err(Error::EmptyRule));
    }

    #[test]
    fn rejects_component_without_value() {
        assert_eq!(
            decode_rule("FREQ"),
            Err(Error::MalformedComponent {
                component: "FREQ".to_owned()
            })
        );
        assert!(matches!(
            decode_rule("FREQ=DAILY;;COUNT=2"),
            Err(Error::MalformedComponent { .. })
        ));
    }

    #[test]
    fn rejects_component_with_empty_value() {
        for src in ["FREQ=DAILY;COUNT=", "FREQ=DAILY;INTERVAL=", "FREQ=DAILY;BYHOUR= ", "FREQ="] {
            assert!(
                matches!(decode_rule(src), Err(Error::MalformedComponent { .. })),
                "Decode {src} should fail"
            );
        }
        assert_eq!(
            decode_rule("FREQ=DAILY;COUNT="),
            Err(Error::MalformedComponent {
                component: "COUNT=".to_owned()
            })
        );
    }

    #[test]
    fn rejects_non_positive_interval() {
        for (src, value) in [
            ("FREQ=DAILY;INTERVAL=0", "0"),
            ("FREQ=DAILY;INTERVAL=-2", "-2"),
            ("FREQ=DAILY;INTERVAL=abc", "abc"),
        ] {
            assert_eq!(
                decode_rule(src),
                Err(Error::InvalidInterval {
                    value: value.to_owned()
                }),
                "Failed for {src}"
            );
        }
        assert_eq!(decode_rule("FREQ=DAILY;INTERVAL=3").unwrap().interval, 3);
    }

    #[test]
    fn tolerates_trailing_separator() {
        let rule = decode_rule("FREQ=DAILY;COUNT=2;").unwrap();
        assert_eq!(rule.terminator, Some(Terminator::Count(2)));
    }

    #[test]
    fn requires_known_frequency() {
        assert_eq!(decode_rule("COUNT=2"), Err(Error::MissingFrequency));
        assert!(matches!(
            decode_rule("FREQ=FORTNIGHTLY"),
            Err(Error::UnknownFrequency { .. })
        ));
        assert_eq!(decode_rule("FREQ=daily").unwrap().rule_type, Frequency::Daily);
    }

    #[test]
    fn reads_integers_leniently() {
        assert_eq!(lenient_int::<i32>("-1"), -1);
        assert_eq!(lenient_int::<i32>(" 12 "), 12);
        assert_eq!(lenient_int::<i32>("3x"), 3);
        assert_eq!(lenient_int::<i32>("abc"), 0);
        assert_eq!(lenient_int::<u32>(""), 0);
    }

    #[test]
    fn splits_day_code() {
        assert_eq!(split_day_code("MO").unwrap(), ("", "MO"));
        assert_eq!(split_day_code("-1FR").unwrap(), ("-1", "FR"));
        assert_eq!(split_day_code("+2TU").unwrap(), ("+2", "TU"));
        assert!(split_day_code("M").is_err());
        assert!(split_day_code("").is_err());
    }

    #[test]
    fn by_day_separates_plain_and_occurrence_days() {
        let rule = decode_rule("FREQ=WEEKLY;BYDAY=MO,2TU,-1FR").unwrap();
        assert_eq!(rule.validations.days(), Some([WeekDay::Monday].as_slice()));
        assert_eq!(
            rule.validations.days_of_week(),
            Some(
                [
                    (WeekDay::Tuesday, vec![2]),
                    (WeekDay::Friday, vec![-1])
                ]
                .as_slice()
            )
        );
    }

    #[test]
    fn by_day_occurrence_removes_earlier_plain_day() {
        let rule = decode_rule("FREQ=MONTHLY;BYDAY=TU,WE,2TU").unwrap();
        assert_eq!(rule.validations.days(), Some([WeekDay::Wednesday].as_slice()));
        assert_eq!(
            rule.validations.days_of_week(),
            Some([(WeekDay::Tuesday, vec![2])].as_slice())
        );
    }

    #[test]
    fn by_day_plain_day_after_occurrence_is_dropped() {
        // Order-dependent path: the plain TU is skipped because TU already has
        // an occurrence entry when it is read.
        let rule = decode_rule("FREQ=WEEKLY;BYDAY=2TU,TU").unwrap();
        assert_eq!(rule.validations.days(), None);
        assert_eq!(
            rule.validations.days_of_week(),
            Some([(WeekDay::Tuesday, vec![2])].as_slice())
        );
    }

    #[test]
    fn by_day_rejects_unknown_code() {
        assert_eq!(
            decode_rule("FREQ=WEEKLY;BYDAY=MO,XX"),
            Err(Error::InvalidWeekday {
                code: "XX".to_owned()
            })
        );
    }

    #[test]
    fn ignores_bysetpos_and_keeps_unknown_parts() {
        let rule = decode_rule("FREQ=MONTHLY;BYDAY=MO;BYSETPOS=-1;BYWEEKNO=20").unwrap();
        assert_eq!(rule.validations.len(), 2);
        assert_eq!(rule.validations.unsupported().collect::<Vec<_>>(), ["BYWEEKNO"]);
    }

    #[test]
    fn later_terminator_wins() {
        let rule = decode_rule("FREQ=DAILY;UNTIL=20240101T000000Z;COUNT=4").unwrap();
        assert_eq!(rule.terminator, Some(Terminator::Count(4)));
    }
}
