// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Recurrence rule model and its `RRULE` value codec.

mod decode;
mod encode;
mod parts;

use std::fmt::{self, Display};
use std::str::FromStr;

use jiff::Timestamp;
use strum::IntoEnumIterator;

use crate::error::{Error, Result};
use crate::keyword::{
    KW_DAY_FR, KW_DAY_MO, KW_DAY_SA, KW_DAY_SU, KW_DAY_TH, KW_DAY_TU, KW_DAY_WE, KW_RRULE_BYDAY,
    KW_RRULE_BYHOUR, KW_RRULE_BYMINUTE, KW_RRULE_BYMONTH, KW_RRULE_BYMONTHDAY, KW_RRULE_BYSECOND,
    KW_RRULE_BYSETPOS, KW_RRULE_BYYEARDAY, KW_RRULE_COUNT, KW_RRULE_FREQ, KW_RRULE_FREQ_DAILY,
    KW_RRULE_FREQ_HOURLY, KW_RRULE_FREQ_MINUTELY, KW_RRULE_FREQ_MONTHLY, KW_RRULE_FREQ_SECONDLY,
    KW_RRULE_FREQ_WEEKLY, KW_RRULE_FREQ_YEARLY, KW_RRULE_INTERVAL, KW_RRULE_UNTIL, KW_RRULE_WKST,
};

pub use decode::decode_rule;
pub use encode::encode_rule;
pub use parts::RuleParts;

/// Interval used when a rule has no `INTERVAL` part.
pub const DEFAULT_INTERVAL: u32 = 1;

/// Recurrence rule
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecurrenceRule {
    /// Frequency of recurrence
    pub rule_type: Frequency,
    /// Interval between recurrences
    pub interval: u32,
    /// How the recurrence ends, if it does
    pub terminator: Option<Terminator>,
    /// Start day of week
    pub week_start: Option<WeekDay>,
    /// Constraints on the generated occurrences
    pub validations: ValidationSet,
}

impl RecurrenceRule {
    /// Create a rule with the default interval, no terminator and no validations.
    #[must_use]
    pub fn new(rule_type: Frequency) -> Self {
        Self {
            rule_type,
            interval: DEFAULT_INTERVAL,
            terminator: None,
            week_start: None,
            validations: ValidationSet::new(),
        }
    }
}

impl FromStr for RecurrenceRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        decode_rule(s)
    }
}

impl Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", encode_rule(self))
    }
}

/// Recurrence frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[expect(missing_docs)]
pub enum Frequency {
    Secondly,
    Minutely,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// The `FREQ` keyword for this frequency.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Frequency::Secondly => KW_RRULE_FREQ_SECONDLY,
            Frequency::Minutely => KW_RRULE_FREQ_MINUTELY,
            Frequency::Hourly => KW_RRULE_FREQ_HOURLY,
            Frequency::Daily => KW_RRULE_FREQ_DAILY,
            Frequency::Weekly => KW_RRULE_FREQ_WEEKLY,
            Frequency::Monthly => KW_RRULE_FREQ_MONTHLY,
            Frequency::Yearly => KW_RRULE_FREQ_YEARLY,
        }
    }
}

impl Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive, so `weekly`, `Weekly` and `WEEKLY` all match.
impl FromStr for Frequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::iter()
            .find(|freq| freq.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownFrequency {
                value: s.to_owned(),
            })
    }
}

/// Day of the week, numbered from Sunday = 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter, strum::FromRepr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
#[expect(missing_docs)]
pub enum WeekDay {
    Sunday = 0,
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
}

impl WeekDay {
    /// Weekday number, 0 (Sunday) to 6 (Saturday).
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Weekday for a number, 0 (Sunday) to 6 (Saturday).
    #[must_use]
    pub fn from_index(index: u8) -> Option<Self> {
        Self::from_repr(index)
    }

    /// Two-letter iCalendar code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            WeekDay::Sunday => KW_DAY_SU,
            WeekDay::Monday => KW_DAY_MO,
            WeekDay::Tuesday => KW_DAY_TU,
            WeekDay::Wednesday => KW_DAY_WE,
            WeekDay::Thursday => KW_DAY_TH,
            WeekDay::Friday => KW_DAY_FR,
            WeekDay::Saturday => KW_DAY_SA,
        }
    }
}

impl Display for WeekDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for WeekDay {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::iter()
            .find(|day| day.code() == s)
            .ok_or_else(|| Error::InvalidWeekday { code: s.to_owned() })
    }
}

/// How a recurrence ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Terminator {
    /// After a number of occurrences.
    Count(u32),

    /// At an instant, inclusive.
    Until(Timestamp),
}

/// One constraint on the occurrences of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Validation {
    /// `BYSECOND`
    SecondOfMinute(Vec<i32>),
    /// `BYMINUTE`
    MinuteOfHour(Vec<i32>),
    /// `BYHOUR`
    HourOfDay(Vec<i32>),
    /// `BYMONTHDAY`
    DayOfMonth(Vec<i32>),
    /// `BYMONTH`
    MonthOfYear(Vec<i32>),
    /// `BYYEARDAY`
    DayOfYear(Vec<i32>),
    /// `BYDAY` entries without an occurrence offset
    Day(Vec<WeekDay>),
    /// `BYDAY` entries with occurrence offsets, e.g. `MO -> [2, -1]` for the
    /// second and the last Monday
    DayOfWeek(Vec<(WeekDay, Vec<i32>)>),
    /// A rule part this codec does not understand, kept by name so that
    /// whoever builds the schedule can reject the rule
    Unsupported(String),
}

impl Validation {
    /// The kind of this validation.
    #[must_use]
    pub fn kind(&self) -> ValidationKind {
        match self {
            Validation::SecondOfMinute(_) => ValidationKind::SecondOfMinute,
            Validation::MinuteOfHour(_) => ValidationKind::MinuteOfHour,
            Validation::HourOfDay(_) => ValidationKind::HourOfDay,
            Validation::DayOfMonth(_) => ValidationKind::DayOfMonth,
            Validation::MonthOfYear(_) => ValidationKind::MonthOfYear,
            Validation::DayOfYear(_) => ValidationKind::DayOfYear,
            Validation::Day(_) => ValidationKind::Day,
            Validation::DayOfWeek(_) => ValidationKind::DayOfWeek,
            Validation::Unsupported(name) => ValidationKind::Unsupported(name.clone()),
        }
    }
}

/// Key of a [`ValidationSet`] entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[expect(missing_docs)]
pub enum ValidationKind {
    SecondOfMinute,
    MinuteOfHour,
    HourOfDay,
    DayOfMonth,
    MonthOfYear,
    DayOfYear,
    Day,
    DayOfWeek,
    Unsupported(String),
}

/// Validations of a rule, at most one per kind, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationSet {
    entries: Vec<Validation>,
}

impl ValidationSet {
    /// Create an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add a validation. One of the same kind is replaced in place.
    pub fn insert(&mut self, validation: Validation) {
        let kind = validation.kind();
        match self.entries.iter_mut().find(|v| v.kind() == kind) {
            Some(slot) => *slot = validation,
            None => self.entries.push(validation),
        }
    }

    /// The validation of the given kind.
    #[must_use]
    pub fn get(&self, kind: &ValidationKind) -> Option<&Validation> {
        self.entries.iter().find(|v| v.kind() == *kind)
    }

    /// Plain weekdays (`day`).
    #[must_use]
    pub fn days(&self) -> Option<&[WeekDay]> {
        self.entries.iter().find_map(|v| match v {
            Validation::Day(days) => Some(days.as_slice()),
            _ => None,
        })
    }

    /// Occurrence-qualified weekdays (`day_of_week`).
    #[must_use]
    pub fn days_of_week(&self) -> Option<&[(WeekDay, Vec<i32>)]> {
        self.entries.iter().find_map(|v| match v {
            Validation::DayOfWeek(days) => Some(days.as_slice()),
            _ => None,
        })
    }

    /// Names of the rule parts recorded as unsupported.
    pub fn unsupported(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|v| match v {
            Validation::Unsupported(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Validation> {
        self.entries.iter()
    }

    /// Number of validations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no validations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a ValidationSet {
    type Item = &'a Validation;
    type IntoIter = std::slice::Iter<'a, Validation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Validation> for ValidationSet {
    fn from_iter<T: IntoIterator<Item = Validation>>(iter: T) -> Self {
        let mut set = Self::new();
        for validation in iter {
            set.insert(validation);
        }
        set
    }
}

/// Rule parts recognized by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumIter)]
enum RulePart {
    Freq,
    Interval,
    Count,
    Until,
    Wkst,
    BySecond,
    ByMinute,
    ByHour,
    ByDay,
    ByMonthDay,
    ByMonth,
    ByYearDay,
    BySetPos,
}

impl RulePart {
    const fn as_str(self) -> &'static str {
        match self {
            RulePart::Freq => KW_RRULE_FREQ,
            RulePart::Interval => KW_RRULE_INTERVAL,
            RulePart::Count => KW_RRULE_COUNT,
            RulePart::Until => KW_RRULE_UNTIL,
            RulePart::Wkst => KW_RRULE_WKST,
            RulePart::BySecond => KW_RRULE_BYSECOND,
            RulePart::ByMinute => KW_RRULE_BYMINUTE,
            RulePart::ByHour => KW_RRULE_BYHOUR,
            RulePart::ByDay => KW_RRULE_BYDAY,
            RulePart::ByMonthDay => KW_RRULE_BYMONTHDAY,
            RulePart::ByMonth => KW_RRULE_BYMONTH,
            RulePart::ByYearDay => KW_RRULE_BYYEARDAY,
            RulePart::BySetPos => KW_RRULE_BYSETPOS,
        }
    }

    /// Exact, case-sensitive lookup.
    fn from_name(name: &str) -> Option<Self> {
        Self::iter().find(|part| part.as_str() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyword::WEEKDAY_CODES;

    #[test]
    fn parses_frequency_any_case() {
        assert_eq!("WEEKLY".parse::<Frequency>().unwrap(), Frequency::Weekly);
        assert_eq!("weekly".parse::<Frequency>().unwrap(), Frequency::Weekly);
        assert_eq!("mOnThLy".parse::<Frequency>().unwrap(), Frequency::Monthly);
        assert_eq!(
            "FORTNIGHTLY".parse::<Frequency>(),
            Err(Error::UnknownFrequency {
                value: "FORTNIGHTLY".to_owned()
            })
        );
    }

    #[test]
    fn weekday_code_table() {
        let codes: Vec<_> = WeekDay::iter().map(WeekDay::code).collect();
        assert_eq!(codes, WEEKDAY_CODES);
        assert_eq!(codes, ["SU", "MO", "TU", "WE", "TH", "FR", "SA"]);
        for day in WeekDay::iter() {
            assert_eq!(WeekDay::from_index(day.index()), Some(day));
            assert_eq!(day.code().parse::<WeekDay>().unwrap(), day);
        }
        assert_eq!(WeekDay::from_index(7), None);
        assert!("mo".parse::<WeekDay>().is_err());
    }

    #[test]
    fn validation_set_replaces_same_kind_in_place() {
        let mut set = ValidationSet::new();
        set.insert(Validation::HourOfDay(vec![9]));
        set.insert(Validation::Day(vec![WeekDay::Monday]));
        set.insert(Validation::HourOfDay(vec![10, 11]));
        assert_eq!(set.len(), 2);
        let kinds: Vec<_> = set.iter().map(Validation::kind).collect();
        assert_eq!(kinds, [ValidationKind::HourOfDay, ValidationKind::Day]);
        assert_eq!(
            set.get(&ValidationKind::HourOfDay),
            Some(&Validation::HourOfDay(vec![10, 11]))
        );
        assert_eq!(set.days(), Some([WeekDay::Monday].as_slice()));
        assert_eq!(set.days_of_week(), None);
    }

    #[test]
    fn unsupported_entries_are_keyed_by_name() {
        let set: ValidationSet = [
            Validation::Unsupported("BYWEEKNO".to_owned()),
            Validation::Unsupported("X-FOO".to_owned()),
            Validation::Unsupported("BYWEEKNO".to_owned()),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.unsupported().collect::<Vec<_>>(), ["BYWEEKNO", "X-FOO"]);
    }

    #[test]
    fn rule_part_names() {
        assert_eq!(RulePart::from_name("BYMONTHDAY"), Some(RulePart::ByMonthDay));
        assert_eq!(RulePart::from_name("bymonthday"), None);
        assert_eq!(RulePart::from_name("BYWEEKNO"), None);
    }
}
